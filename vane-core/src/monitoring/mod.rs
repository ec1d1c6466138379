//! Monitoring
//!
//! Prometheus metric families for the execution loop. Exposition is left to
//! the caller; the demo binary prints [`EngineMetrics::render`] on exit.

pub mod metrics;

pub use metrics::EngineMetrics;
