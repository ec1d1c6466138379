//! Execution engine
//!
//! [`ExecutionLoop`] ties the pieces together: it drains the
//! [`EventQueue`](crate::data::EventQueue), asks a [`Strategy`] what to trade,
//! gates each order through the [`RiskGate`](crate::risk::RiskGate), submits it
//! through an [`OrderGateway`](crate::execution::OrderGateway) and books the
//! confirmed fill.

pub mod dedup;
pub mod execution_loop;
pub mod traits;

pub use dedup::AckDeduplicator;
pub use execution_loop::{AckOutcome, ExecutionLoop, LoopConfig, LoopStats};
pub use traits::Strategy;
