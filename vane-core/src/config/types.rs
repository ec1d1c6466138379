use super::constants::*;
use crate::core::ConfigError;
use crate::risk::RiskLimits;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub risk: RiskConfig,
    pub queue: QueueConfig,
    pub engine: EngineConfig,
    pub gateway: GatewayConfig,
    pub feed: FeedConfig,
    pub logging: LoggingConfig,
}

/// Risk gate limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub position_limit: f64,
    pub loss_limit: f64,
    pub cost_rate: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            position_limit: DEFAULT_POSITION_LIMIT,
            loss_limit: DEFAULT_LOSS_LIMIT,
            cost_rate: DEFAULT_COST_RATE,
        }
    }
}

impl RiskConfig {
    pub fn limits(&self) -> RiskLimits {
        RiskLimits::new(self.position_limit, self.loss_limit).with_cost_rate(self.cost_rate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum buffered events before the oldest is overwritten
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// What the loop does when the gateway yields no acknowledgement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log, count, and carry on with the next event
    #[default]
    Skip,
    /// Stop the loop and hand the error to the caller
    Halt,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "halt" => Ok(Self::Halt),
            _ => Err(ConfigError::UnknownFailurePolicy(s.to_string())),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Halt => write!(f, "halt"),
        }
    }
}

/// Execution loop and strategy parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub batch_size: usize,
    pub spread_threshold: f64,
    pub order_size: f64,
    pub order_timeout_ms: u64,
    pub failure_policy: FailurePolicy,
    pub dedup_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            spread_threshold: DEFAULT_SPREAD_THRESHOLD,
            order_size: DEFAULT_ORDER_SIZE,
            order_timeout_ms: DEFAULT_ORDER_TIMEOUT_MS,
            failure_policy: FailurePolicy::Skip,
            dedup_window: DEFAULT_DEDUP_WINDOW,
        }
    }
}

impl EngineConfig {
    pub fn order_timeout(&self) -> Duration {
        Duration::from_millis(self.order_timeout_ms)
    }
}

/// Simulated gateway parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub latency_ns: u64,
    /// Width of the uniform jitter centred on `latency_ns` (0 = deterministic)
    pub latency_jitter_ns: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_LATENCY_NS)
    }
}

impl GatewayConfig {
    pub fn new(latency_ns: u64) -> Self {
        Self {
            latency_ns,
            latency_jitter_ns: 0,
        }
    }
}

/// Synthetic feed parameters (demo binary only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub symbol: String,
    pub interval_us: u64,
    pub seed: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_FEED_SYMBOL.to_string(),
            interval_us: DEFAULT_FEED_INTERVAL_US,
            seed: None,
        }
    }
}

impl FeedConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_micros(self.interval_us)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// "trace", "debug", "info", "warn" or "error"
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
