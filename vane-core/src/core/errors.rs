//! Error types for the order pipeline
//!
//! A risk rejection is not an error: it is reported as a
//! [`RiskViolation`](crate::risk::RiskViolation) value and the event is
//! skipped. Everything here is a genuine failure.

use std::time::Duration;
use thiserror::Error;

/// Invalid configuration, raised at construction time and never mid-loop
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be a non-negative finite number, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("unknown failure policy '{0}', expected 'skip' or 'halt'")]
    UnknownFailurePolicy(String),
}

/// The order gateway failed to produce an acknowledgement
///
/// Distinct from a rejected ack: a rejection is a terminal answer from the
/// venue, while these mean no trustworthy answer arrived at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("no acknowledgement within {0:?}")]
    Timeout(Duration),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("submission abandoned by shutdown")]
    Cancelled,
}

/// A fill that cannot be applied to the ledger
///
/// Raised before any mutation, so the ledger is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FillError {
    #[error("fill size must be positive and finite, got {0}")]
    InvalidSize(f64),

    #[error("fill price must be non-negative and finite, got {0}")]
    InvalidPrice(f64),
}

/// Errors that terminate the execution loop
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("order gateway failure: {0}")]
    Gateway(#[from] GatewayError),

    #[error("ledger update failed: {0}")]
    Fill(#[from] FillError),
}
