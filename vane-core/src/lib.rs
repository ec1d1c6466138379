//! Vane Core - Risk-Gated Order Pipeline
//!
//! A minimal trading loop: a market-event buffer, a risk gate, and an order
//! submission path.
//!
//! ## Architecture
//!
//! ```text
//! producer ──put──▶ EventQueue ──get_batch──▶ ExecutionLoop ──▶ Strategy
//!                  (overwrite                      │
//!                   oldest)                        ├──▶ RiskGate::check
//!                                                  ├──▶ OrderGateway::send_order
//!                                                  └──▶ RiskGate::apply_fill
//! ```
//!
//! - **Lock-free** bounded queue between producer and consumer
//! - **Single writer** ledger owned by the loop
//! - **Cooperative** tokio tasks with cancellation at every suspension point
//!
//! ## Core Modules
//! - `core`: identifiers, side, error taxonomy
//! - `data`: market events, the event queue, synthetic feed
//! - `risk`: risk gate and position/PnL ledger
//! - `execution`: order gateway trait and simulated gateway
//! - `engine`: execution loop and strategy trait
//! - `config`: layered configuration
//! - `monitoring`: Prometheus metrics
//! - `utils`: logging setup

pub mod config;
pub mod core;
pub mod data;
pub mod engine;
pub mod execution;
pub mod monitoring;
pub mod risk;
pub mod utils;

pub use core::{ConfigError, EngineError, FillError, GatewayError, OrderId, Side};
pub use data::{EventQueue, MarketEvent};
pub use engine::{ExecutionLoop, LoopConfig, Strategy};
pub use execution::{AckStatus, OrderAck, OrderGateway, OrderRequest, SimulatedGateway};
pub use risk::{RiskGate, RiskLimits};

// Re-export error types
pub use anyhow::{Error, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::core::{OrderId, Side};
    pub use crate::data::{EventQueue, MarketEvent, SharedEventQueue};
    pub use crate::engine::{ExecutionLoop, LoopConfig, Strategy};
    pub use crate::execution::{AckStatus, OrderAck, OrderGateway, OrderRequest, SimulatedGateway};
    pub use crate::risk::{RiskGate, RiskLimits};
    pub use crate::{Error, Result};
}
