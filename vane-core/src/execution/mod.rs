pub mod simulated;
pub mod types;

pub use simulated::{SimulatedFillMode, SimulatedGateway};
pub use types::{AckStatus, OrderAck, OrderRequest};

use crate::core::GatewayError;
use async_trait::async_trait;
use std::fmt;

/// Execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Simulated fills (paper trading, demos, tests)
    Simulated,
    /// Real venue connectivity
    Live,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Simulated => write!(f, "SIMULATED"),
            ExecutionMode::Live => write!(f, "LIVE"),
        }
    }
}

/// Order gateway - abstraction over order submission
///
/// Implementations: [`SimulatedGateway`] in this crate; live venues are
/// external and must honour the same contract.
///
/// A call may suspend for network latency but resolves exactly once: either a
/// terminal [`OrderAck`] (which may be a rejection or a partial fill) or a
/// [`GatewayError`] when no trustworthy answer exists. Callers bound the wait
/// themselves; see the execution loop's order timeout.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit one order and wait for its acknowledgement
    async fn send_order(&self, request: &OrderRequest) -> Result<OrderAck, GatewayError>;

    /// Gateway name for logging
    fn name(&self) -> &'static str;

    fn execution_mode(&self) -> ExecutionMode;
}
