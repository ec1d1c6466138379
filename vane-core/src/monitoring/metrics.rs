//! Prometheus metrics for the order pipeline
//!
//! Provides metrics for:
//! - Queue health (depth, overflow evictions)
//! - Trading activity (orders, fills, venue rejections)
//! - Risk (gate rejections, pnl, positions)
//! - Gateway health (failures, ack latency)

use anyhow::{Context, Result};
use prometheus::{
    Encoder, Gauge, GaugeVec, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge,
    Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use tracing::info;

const NAMESPACE: &str = "vane";

/// Metric families updated by the execution loop
#[derive(Clone)]
pub struct EngineMetrics {
    registry: Arc<Registry>,

    /// Events drained from the queue
    pub events_total: IntCounter,
    /// Current queue depth
    pub queue_depth: IntGauge,
    /// Events dropped on overflow since start
    pub queue_evictions: IntGauge,

    /// Orders submitted, by side
    pub orders_total: IntCounterVec,
    /// Fills applied, by status (ACK / PARTIAL)
    pub fills_total: IntCounterVec,
    /// Venue rejections
    pub order_rejections_total: IntCounter,
    /// Acks ignored because their order was already applied
    pub duplicate_acks_total: IntCounter,

    /// Orders refused by the risk gate, by reason
    pub risk_rejections_total: IntCounterVec,
    /// Realized PnL
    pub pnl: Gauge,
    /// Net position, by symbol
    pub position: GaugeVec,

    /// Submissions with no ack, by kind (timeout / transport / cancelled)
    pub gateway_failures_total: IntCounterVec,
    /// Submit-to-ack latency in seconds
    pub ack_latency_seconds: Histogram,
}

impl EngineMetrics {
    /// Create all metric families on a fresh registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Arc::new(Registry::new());

        let events_total = IntCounter::with_opts(
            Opts::new("events_total", "Market events drained from the queue").namespace(NAMESPACE),
        )?;
        registry.register(Box::new(events_total.clone()))?;

        let queue_depth = IntGauge::with_opts(
            Opts::new("queue_depth", "Events currently buffered").namespace(NAMESPACE),
        )?;
        registry.register(Box::new(queue_depth.clone()))?;

        let queue_evictions = IntGauge::with_opts(
            Opts::new(
                "queue_evictions",
                "Events overwritten because the queue was full",
            )
            .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(queue_evictions.clone()))?;

        let orders_total = IntCounterVec::new(
            Opts::new("orders_total", "Orders submitted to the gateway").namespace(NAMESPACE),
            &["side"],
        )?;
        registry.register(Box::new(orders_total.clone()))?;

        let fills_total = IntCounterVec::new(
            Opts::new("fills_total", "Fills applied to the ledger").namespace(NAMESPACE),
            &["status"],
        )?;
        registry.register(Box::new(fills_total.clone()))?;

        let order_rejections_total = IntCounter::with_opts(
            Opts::new("order_rejections_total", "Orders rejected by the venue")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(order_rejections_total.clone()))?;

        let duplicate_acks_total = IntCounter::with_opts(
            Opts::new(
                "duplicate_acks_total",
                "Acks ignored because their order was already applied",
            )
            .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(duplicate_acks_total.clone()))?;

        let risk_rejections_total = IntCounterVec::new(
            Opts::new("risk_rejections_total", "Orders refused by the risk gate")
                .namespace(NAMESPACE),
            &["reason"],
        )?;
        registry.register(Box::new(risk_rejections_total.clone()))?;

        let pnl = Gauge::with_opts(Opts::new("pnl", "Realized PnL").namespace(NAMESPACE))?;
        registry.register(Box::new(pnl.clone()))?;

        let position = GaugeVec::new(
            Opts::new("position", "Net position per symbol").namespace(NAMESPACE),
            &["symbol"],
        )?;
        registry.register(Box::new(position.clone()))?;

        let gateway_failures_total = IntCounterVec::new(
            Opts::new(
                "gateway_failures_total",
                "Order submissions that produced no acknowledgement",
            )
            .namespace(NAMESPACE),
            &["kind"],
        )?;
        registry.register(Box::new(gateway_failures_total.clone()))?;

        let ack_latency_seconds = Histogram::with_opts(
            HistogramOpts::new("ack_latency_seconds", "Order submit-to-ack latency")
                .namespace(NAMESPACE)
                .buckets(vec![
                    0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0,
                ]),
        )?;
        registry.register(Box::new(ack_latency_seconds.clone()))?;

        info!("Prometheus metrics registry initialized");

        Ok(Self {
            registry,
            events_total,
            queue_depth,
            queue_evictions,
            orders_total,
            fills_total,
            order_rejections_total,
            duplicate_acks_total,
            risk_rejections_total,
            pnl,
            position,
            gateway_failures_total,
            ack_latency_seconds,
        })
    }

    /// Get the underlying Prometheus registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("Failed to encode metrics")?;
        String::from_utf8(buffer).context("Metrics output is not UTF-8")
    }
}

impl std::fmt::Debug for EngineMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineMetrics").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registries_are_independent() {
        let a = EngineMetrics::new().unwrap();
        let b = EngineMetrics::new().unwrap();
        a.events_total.inc();
        assert_eq!(a.events_total.get(), 1);
        assert_eq!(b.events_total.get(), 0);
    }

    #[test]
    fn test_render_contains_namespaced_families() {
        let metrics = EngineMetrics::new().unwrap();
        metrics.orders_total.with_label_values(&["BUY"]).inc();
        metrics.risk_rejections_total.with_label_values(&["position_limit"]).inc();
        metrics.queue_evictions.set(3);

        let text = metrics.render().unwrap();
        assert!(text.contains("vane_orders_total{side=\"BUY\"} 1"));
        assert!(text.contains("vane_risk_rejections_total{reason=\"position_limit\"} 1"));
        assert!(text.contains("vane_queue_evictions 3"));
    }
}
