//! Core types for the order pipeline
//!
//! - `OrderId`: gateway-assigned order identifier
//! - `Side`: BUY / SELL
//! - Error taxonomy (`ConfigError`, `GatewayError`, `FillError`, `EngineError`)

pub mod errors;
pub mod types;

// Re-export commonly used types
pub use errors::{ConfigError, EngineError, FillError, GatewayError};
pub use types::{now_ns, OrderId, Side};
