//! Risk gate: pre-trade decision plus the position/PnL ledger
//!
//! The gate is the only owner of the ledger. `apply_fill` is the only
//! mutator and updates position and PnL together or not at all. The
//! execution loop holds the gate by value, so there is a single writer and
//! check-then-fill for one order never interleaves with another.
//!
//! PnL is realized cash flow only: selling adds proceeds, buying subtracts
//! cost. Open inventory is not marked to market.

use super::types::{LedgerSnapshot, RiskLimits, RiskViolation};
use crate::core::{ConfigError, FillError, Side};
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub struct RiskGate {
    limits: RiskLimits,
    positions: HashMap<String, f64>,
    pnl: f64,
    fill_count: u64,
    traded_notional: f64,
}

impl RiskGate {
    /// Create a gate with validated limits and an empty ledger
    pub fn new(limits: RiskLimits) -> Result<Self, ConfigError> {
        limits.validate()?;
        info!("Initialized RiskGate with limits: {:?}", limits);

        Ok(Self {
            limits,
            positions: HashMap::new(),
            pnl: 0.0,
            fill_count: 0,
            traded_notional: 0.0,
        })
    }

    /// Pure pre-trade decision for a buy of `size` at `price`
    ///
    /// Never mutates state, so repeated calls with an unchanged ledger agree.
    pub fn allowed(&self, symbol: &str, size: f64, price: f64) -> bool {
        self.check(symbol, Side::Buy, size, price).is_ok()
    }

    /// Side-aware pre-trade decision reporting which limit was hit
    ///
    /// - `|position ± size| > position_limit` rejects
    /// - `pnl - |size| * price * cost_rate < -loss_limit` rejects
    pub fn check(
        &self,
        symbol: &str,
        side: Side,
        size: f64,
        price: f64,
    ) -> Result<(), RiskViolation> {
        if !size.is_finite() || !price.is_finite() {
            return Err(RiskViolation::InvalidOrder { size, price });
        }

        let projected = self.position(symbol) + side.sign() * size;
        if projected.abs() > self.limits.position_limit {
            debug!(
                symbol,
                projected,
                limit = self.limits.position_limit,
                "risk check: position limit"
            );
            return Err(RiskViolation::PositionLimitExceeded {
                projected,
                limit: self.limits.position_limit,
            });
        }

        let projected_pnl = self.pnl - size.abs() * price * self.limits.cost_rate;
        if projected_pnl < -self.limits.loss_limit {
            debug!(
                symbol,
                projected_pnl,
                limit = self.limits.loss_limit,
                "risk check: loss limit"
            );
            return Err(RiskViolation::LossLimitBreached {
                projected_pnl,
                limit: self.limits.loss_limit,
            });
        }

        Ok(())
    }

    /// Book a confirmed fill
    ///
    /// `size` is an unsigned magnitude; direction comes only from `side`.
    /// Inputs are validated before anything is written.
    pub fn apply_fill(
        &mut self,
        symbol: &str,
        size: f64,
        price: f64,
        side: Side,
    ) -> Result<(), FillError> {
        if !(size.is_finite() && size > 0.0) {
            return Err(FillError::InvalidSize(size));
        }
        if !(price.is_finite() && price >= 0.0) {
            return Err(FillError::InvalidPrice(price));
        }

        let notional = size * price;
        let new_position = self.position(symbol) + side.sign() * size;
        let new_pnl = match side {
            Side::Sell => self.pnl + notional,
            Side::Buy => self.pnl - notional,
        };

        if new_position.abs() > self.limits.position_limit {
            warn!(
                symbol,
                position = new_position,
                limit = self.limits.position_limit,
                "fill takes position beyond limit"
            );
        }

        self.positions.insert(symbol.to_string(), new_position);
        self.pnl = new_pnl;
        self.fill_count += 1;
        self.traded_notional += notional;

        debug!(
            symbol,
            %side,
            size,
            price,
            position = new_position,
            pnl = new_pnl,
            "fill applied"
        );
        Ok(())
    }

    /// Net position for `symbol` (0 if never traded)
    #[inline]
    pub fn position(&self, symbol: &str) -> f64 {
        self.positions.get(symbol).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn pnl(&self) -> f64 {
        self.pnl
    }

    pub fn positions(&self) -> &HashMap<String, f64> {
        &self.positions
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    pub fn fill_count(&self) -> u64 {
        self.fill_count
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            positions: self
                .positions
                .iter()
                .map(|(symbol, qty)| (symbol.clone(), *qty))
                .collect(),
            pnl: self.pnl,
            fill_count: self.fill_count,
            traded_notional: self.traded_notional,
        }
    }
}

impl std::fmt::Debug for RiskGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskGate")
            .field("limits", &self.limits)
            .field("symbols", &self.positions.len())
            .field("pnl", &self.pnl)
            .field("fill_count", &self.fill_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gate(position_limit: f64, loss_limit: f64) -> RiskGate {
        RiskGate::new(RiskLimits::new(position_limit, loss_limit)).unwrap()
    }

    #[test]
    fn test_rejects_invalid_limits() {
        assert!(RiskGate::new(RiskLimits::new(-1.0, 100.0)).is_err());
        assert!(RiskGate::new(RiskLimits::new(10.0, 0.0)).is_err());
    }

    #[test]
    fn test_position_limit_boundary() {
        let mut gate = gate(10.0, 1_000_000.0);
        gate.apply_fill("X", 9.0, 1.0, Side::Buy).unwrap();

        for price in [0.01, 1.0, 250.0] {
            assert!(!gate.allowed("X", 2.0, price));
            assert!(gate.allowed("X", 1.0, price));
        }
    }

    #[test]
    fn test_absent_symbol_treated_as_flat() {
        let gate = gate(10.0, 100.0);
        assert_eq!(gate.position("NEVER"), 0.0);
        assert!(gate.allowed("NEVER", 10.0, 1.0));
        assert!(!gate.allowed("NEVER", 10.5, 1.0));
    }

    #[test]
    fn test_cost_projection_within_loss_limit() {
        let gate = gate(1_000_000.0, 100.0);
        // projected_pnl = 0 - 1000 * 1 * 0.001 = -1.0 >= -100
        assert!(gate.allowed("X", 1000.0, 1.0));
    }

    #[test]
    fn test_cost_projection_breaches_loss_limit() {
        let mut gate = gate(1_000_000.0, 100.0);
        gate.apply_fill("X", 1.0, 99.5, Side::Buy).unwrap();
        // pnl = -99.5, cost of 1000 @ 1 = 1.0 → -100.5 < -100
        assert_eq!(
            gate.check("X", Side::Buy, 1000.0, 1.0),
            Err(RiskViolation::LossLimitBreached {
                projected_pnl: -100.5,
                limit: 100.0
            })
        );
    }

    #[test]
    fn test_allowed_is_pure() {
        let mut gate = gate(10.0, 100.0);
        gate.apply_fill("X", 3.0, 10.0, Side::Buy).unwrap();
        let before = gate.snapshot();

        let first = gate.allowed("X", 5.0, 10.0);
        let second = gate.allowed("X", 5.0, 10.0);
        assert_eq!(first, second);
        assert_eq!(gate.snapshot(), before);
    }

    #[test]
    fn test_sell_side_projection() {
        let gate = gate(10.0, 1_000.0);
        assert!(gate.check("X", Side::Sell, 10.0, 1.0).is_ok());
        assert!(matches!(
            gate.check("X", Side::Sell, 10.5, 1.0),
            Err(RiskViolation::PositionLimitExceeded { projected, .. }) if projected == -10.5
        ));
    }

    #[test]
    fn test_non_finite_order_rejected() {
        let gate = gate(10.0, 100.0);
        assert!(!gate.allowed("X", 1.0, f64::NAN));
        assert!(!gate.allowed("X", f64::INFINITY, 1.0));
    }

    #[test]
    fn test_apply_fill_buy_then_sell() {
        let mut gate = gate(100.0, 1_000.0);
        gate.apply_fill("XYZ", 1.0, 100.6, Side::Buy).unwrap();
        assert_eq!(gate.position("XYZ"), 1.0);
        assert_relative_eq!(gate.pnl(), -100.6);

        gate.apply_fill("XYZ", 1.0, 101.0, Side::Sell).unwrap();
        assert_eq!(gate.position("XYZ"), 0.0);
        assert_relative_eq!(gate.pnl(), 0.4, epsilon = 1e-9);
        assert_eq!(gate.fill_count(), 2);
        assert_relative_eq!(gate.snapshot().traded_notional, 201.6, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_fill_leaves_ledger_untouched() {
        let mut gate = gate(100.0, 1_000.0);
        gate.apply_fill("XYZ", 2.0, 10.0, Side::Buy).unwrap();
        let before = gate.snapshot();

        assert_eq!(
            gate.apply_fill("XYZ", 0.0, 10.0, Side::Buy),
            Err(FillError::InvalidSize(0.0))
        );
        assert!(matches!(
            gate.apply_fill("XYZ", 1.0, f64::NAN, Side::Sell),
            Err(FillError::InvalidPrice(_))
        ));
        assert_eq!(
            gate.apply_fill("XYZ", 1.0, -3.0, Side::Sell),
            Err(FillError::InvalidPrice(-3.0))
        );
        assert_eq!(gate.snapshot(), before);
    }
}
