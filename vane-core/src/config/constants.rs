//! Default values for every recognised configuration option

// ===== RISK LIMITS =====

/// Per-symbol cap on |position|
pub const DEFAULT_POSITION_LIMIT: f64 = 1_000_000.0;

/// Largest tolerated negative PnL
pub const DEFAULT_LOSS_LIMIT: f64 = 100_000.0;

/// Projected slippage/fees per unit notional (10 bps)
pub const DEFAULT_COST_RATE: f64 = 0.001;

// ===== QUEUE MANAGEMENT =====

/// Event queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 4096;

/// Events drained per loop iteration
pub const DEFAULT_BATCH_SIZE: usize = 16;

// ===== STRATEGY =====

/// Minimum ask - bid before the spread strategy buys
pub const DEFAULT_SPREAD_THRESHOLD: f64 = 0.5;

/// Units per order
pub const DEFAULT_ORDER_SIZE: f64 = 1.0;

// ===== ORDER GATEWAY =====

/// Mean simulated ack latency: 50μs
pub const DEFAULT_GATEWAY_LATENCY_NS: u64 = 50_000;

/// Upper bound on waiting for any single ack
pub const DEFAULT_ORDER_TIMEOUT_MS: u64 = 1_000;

/// Recent requests a simulated gateway keeps for inspection
pub const DEFAULT_SUBMISSION_LOG: usize = 1_024;

/// Recently applied order ids remembered for duplicate-ack suppression
pub const DEFAULT_DEDUP_WINDOW: usize = 1_024;

// ===== FEED =====

pub const DEFAULT_FEED_SYMBOL: &str = "XYZ";

/// Synthetic feed tick interval: 1ms
pub const DEFAULT_FEED_INTERVAL_US: u64 = 1_000;
