use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::constants::{DEFAULT_COST_RATE, DEFAULT_LOSS_LIMIT, DEFAULT_POSITION_LIMIT};
use crate::core::ConfigError;

/// Limits the gate enforces before any order is sent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLimits {
    /// Per-symbol cap on |position|
    pub position_limit: f64,

    /// Largest tolerated negative PnL (positive number)
    pub loss_limit: f64,

    /// Fraction of notional charged as projected slippage/fees
    pub cost_rate: f64,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            position_limit: DEFAULT_POSITION_LIMIT,
            loss_limit: DEFAULT_LOSS_LIMIT,
            cost_rate: DEFAULT_COST_RATE,
        }
    }
}

impl RiskLimits {
    pub fn new(position_limit: f64, loss_limit: f64) -> Self {
        Self {
            position_limit,
            loss_limit,
            ..Self::default()
        }
    }

    pub fn with_cost_rate(mut self, cost_rate: f64) -> Self {
        self.cost_rate = cost_rate;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.position_limit.is_finite() && self.position_limit > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "position_limit",
                value: self.position_limit,
            });
        }
        if !(self.loss_limit.is_finite() && self.loss_limit > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "loss_limit",
                value: self.loss_limit,
            });
        }
        if !(self.cost_rate.is_finite() && self.cost_rate >= 0.0) {
            return Err(ConfigError::Negative {
                field: "cost_rate",
                value: self.cost_rate,
            });
        }
        Ok(())
    }
}

/// Why the gate refused an order
///
/// A normal decision outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum RiskViolation {
    PositionLimitExceeded { projected: f64, limit: f64 },
    LossLimitBreached { projected_pnl: f64, limit: f64 },
    InvalidOrder { size: f64, price: f64 },
}

impl fmt::Display for RiskViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskViolation::PositionLimitExceeded { projected, limit } => {
                write!(
                    f,
                    "Projected position {} would exceed limit {}",
                    projected, limit
                )
            }
            RiskViolation::LossLimitBreached {
                projected_pnl,
                limit,
            } => {
                write!(
                    f,
                    "Projected PnL {} breaches loss limit -{}",
                    projected_pnl, limit
                )
            }
            RiskViolation::InvalidOrder { size, price } => {
                write!(f, "Order size {} / price {} is not a valid quantity", size, price)
            }
        }
    }
}

impl RiskViolation {
    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            RiskViolation::PositionLimitExceeded { .. } => "position_limit",
            RiskViolation::LossLimitBreached { .. } => "loss_limit",
            RiskViolation::InvalidOrder { .. } => "invalid_order",
        }
    }
}

/// Point-in-time copy of the ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub positions: BTreeMap<String, f64>,
    pub pnl: f64,
    pub fill_count: u64,
    pub traded_notional: f64,
}

impl LedgerSnapshot {
    pub fn position(&self, symbol: &str) -> f64 {
        self.positions.get(symbol).copied().unwrap_or(0.0)
    }
}
