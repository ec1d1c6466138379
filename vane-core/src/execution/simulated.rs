//! Simulated order gateway for paper trading, demos and tests
//!
//! Waits a configurable mean latency (with optional uniform jitter around it)
//! and answers according to its [`SimulatedFillMode`]. The default mode fills every limit
//! order completely at its limit price, echoing the request.

use super::{AckStatus, ExecutionMode, OrderAck, OrderGateway, OrderRequest};
use crate::config::constants::DEFAULT_SUBMISSION_LOG;
use crate::config::GatewayConfig;
use crate::core::{now_ns, GatewayError, OrderId};
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// How the simulated venue answers
#[derive(Debug, Clone, PartialEq)]
pub enum SimulatedFillMode {
    /// Fill the whole order at its limit price
    Full,
    /// Fill `ratio` (0, 1) of the order at its limit price
    Partial { ratio: f64 },
    /// Reject every order
    Reject { reason: String },
}

impl Default for SimulatedFillMode {
    fn default() -> Self {
        Self::Full
    }
}

pub struct SimulatedGateway {
    latency: Duration,
    jitter: Duration,
    mode: SimulatedFillMode,
    next_order_id: AtomicU64,
    /// Most recent requests, bounded by `log_capacity`
    submitted: Mutex<VecDeque<OrderRequest>>,
    log_capacity: usize,
    total_submitted: AtomicU64,
    rng: Mutex<StdRng>,
}

impl SimulatedGateway {
    /// Create a gateway that always fills after `latency`
    pub fn new(latency: Duration) -> Self {
        Self::with_mode(latency, SimulatedFillMode::Full)
    }

    pub fn with_mode(latency: Duration, mode: SimulatedFillMode) -> Self {
        info!(
            "Initialized SimulatedGateway (latency: {:?}, mode: {:?})",
            latency, mode
        );
        Self {
            latency,
            jitter: Duration::ZERO,
            mode,
            next_order_id: AtomicU64::new(1),
            submitted: Mutex::new(VecDeque::new()),
            log_capacity: DEFAULT_SUBMISSION_LOG,
            total_submitted: AtomicU64::new(0),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(Duration::from_nanos(config.latency_ns))
            .with_jitter(Duration::from_nanos(config.latency_jitter_ns))
    }

    /// Spread each delay uniformly over `latency ± jitter / 2`
    ///
    /// The configured latency stays the mean.
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Make jitter reproducible
    pub fn with_seed(self, seed: u64) -> Self {
        *self.rng.lock() = StdRng::seed_from_u64(seed);
        self
    }

    /// Keep at most `capacity` recent requests (at least one)
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity.max(1);
        self
    }

    /// The most recent requests still in the log, oldest first
    pub fn submitted(&self) -> Vec<OrderRequest> {
        self.submitted.lock().iter().cloned().collect()
    }

    /// Drain the log
    pub fn take_submitted(&self) -> Vec<OrderRequest> {
        self.submitted.lock().drain(..).collect()
    }

    /// Requests received over the gateway's lifetime, including ones
    /// already dropped from the log
    pub fn submitted_count(&self) -> usize {
        self.total_submitted.load(Ordering::Relaxed) as usize
    }

    fn record(&self, request: &OrderRequest) {
        self.total_submitted.fetch_add(1, Ordering::Relaxed);
        let mut log = self.submitted.lock();
        while log.len() >= self.log_capacity {
            log.pop_front();
        }
        log.push_back(request.clone());
    }

    fn delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.latency;
        }
        let offset = self.rng.lock().gen_range(0..self.jitter.as_nanos() as u64);
        self.latency.saturating_sub(self.jitter / 2) + Duration::from_nanos(offset)
    }

    fn decide(&self, request: &OrderRequest) -> AckStatus {
        let Some(price) = request.price else {
            return AckStatus::Rejected {
                reason: "simulated venue has no book for market orders".to_string(),
            };
        };

        match &self.mode {
            SimulatedFillMode::Full => AckStatus::Filled {
                filled_quantity: request.size,
                fill_price: price,
            },
            SimulatedFillMode::Partial { ratio } => AckStatus::PartiallyFilled {
                filled_quantity: request.size * ratio.clamp(0.0, 1.0),
                fill_price: price,
            },
            SimulatedFillMode::Reject { reason } => AckStatus::Rejected {
                reason: reason.clone(),
            },
        }
    }
}

#[async_trait]
impl OrderGateway for SimulatedGateway {
    async fn send_order(&self, request: &OrderRequest) -> Result<OrderAck, GatewayError> {
        self.record(request);
        let order_id = OrderId::new(self.next_order_id.fetch_add(1, Ordering::Relaxed));

        let delay = self.delay();
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }

        let status = self.decide(request);
        debug!(%order_id, %request, status = status.as_str(), "simulated ack");
        Ok(OrderAck::for_request(order_id, request, status, now_ns()))
    }

    fn name(&self) -> &'static str {
        "simulated"
    }

    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Simulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Side;

    #[tokio::test(start_paused = true)]
    async fn test_full_fill_echoes_request_after_latency() {
        let gateway = SimulatedGateway::new(Duration::from_micros(50));
        let request = OrderRequest::limit("XYZ", Side::Buy, 1.0, 100.6);

        let start = tokio::time::Instant::now();
        let ack = gateway.send_order(&request).await.unwrap();
        assert!(start.elapsed() >= Duration::from_micros(50));

        assert_eq!(ack.order_id, OrderId::new(1));
        assert_eq!(
            ack.status,
            AckStatus::Filled {
                filled_quantity: 1.0,
                fill_price: 100.6
            }
        );
        assert_eq!(ack.symbol, "XYZ");
        assert_eq!(ack.side, Side::Buy);
        assert_eq!(ack.size, 1.0);
        assert_eq!(ack.price, Some(100.6));
        assert_eq!(gateway.submitted(), vec![request]);
    }

    #[tokio::test]
    async fn test_order_ids_are_unique() {
        let gateway = SimulatedGateway::new(Duration::ZERO);
        let request = OrderRequest::limit("XYZ", Side::Sell, 2.0, 10.0);
        let a = gateway.send_order(&request).await.unwrap();
        let b = gateway.send_order(&request).await.unwrap();
        assert_ne!(a.order_id, b.order_id);
        assert_eq!(gateway.submitted_count(), 2);
    }

    #[tokio::test]
    async fn test_partial_and_reject_modes() {
        let request = OrderRequest::limit("XYZ", Side::Buy, 4.0, 10.0);

        let partial =
            SimulatedGateway::with_mode(Duration::ZERO, SimulatedFillMode::Partial { ratio: 0.25 });
        let ack = partial.send_order(&request).await.unwrap();
        assert_eq!(ack.status.fill(), Some((1.0, 10.0)));

        let reject = SimulatedGateway::with_mode(
            Duration::ZERO,
            SimulatedFillMode::Reject {
                reason: "halted".to_string(),
            },
        );
        let ack = reject.send_order(&request).await.unwrap();
        assert!(ack.status.is_rejected());
    }

    #[tokio::test]
    async fn test_market_order_rejected() {
        let gateway = SimulatedGateway::new(Duration::ZERO);
        let ack = gateway
            .send_order(&OrderRequest::market("XYZ", Side::Buy, 1.0))
            .await
            .unwrap();
        assert!(ack.status.is_rejected());
    }

    #[tokio::test(start_paused = true)]
    async fn test_jitter_centred_on_latency() {
        let gateway = SimulatedGateway::new(Duration::from_millis(10))
            .with_jitter(Duration::from_millis(4))
            .with_seed(11);
        let request = OrderRequest::limit("XYZ", Side::Buy, 1.0, 1.0);

        let mut total = Duration::ZERO;
        for _ in 0..200 {
            let start = tokio::time::Instant::now();
            gateway.send_order(&request).await.unwrap();
            let elapsed = start.elapsed();
            // Timers fire on millisecond ticks, so allow one tick of rounding up
            assert!(elapsed >= Duration::from_millis(8));
            assert!(elapsed <= Duration::from_millis(13));
            total += elapsed;
        }

        let mean_ms = total.as_secs_f64() * 1_000.0 / 200.0;
        assert!((9.0..=11.5).contains(&mean_ms), "mean {mean_ms}ms");
    }

    #[test]
    fn test_jitter_never_underflows() {
        let gateway = SimulatedGateway::new(Duration::from_micros(10))
            .with_jitter(Duration::from_millis(1))
            .with_seed(3);
        for _ in 0..100 {
            assert!(gateway.delay() < Duration::from_millis(1));
        }
    }

    #[tokio::test]
    async fn test_submission_log_is_bounded() {
        let gateway = SimulatedGateway::new(Duration::ZERO).with_log_capacity(8);
        for i in 0..10_000 {
            let request = OrderRequest::limit("XYZ", Side::Buy, 1.0, i as f64);
            gateway.send_order(&request).await.unwrap();
        }

        assert_eq!(gateway.submitted_count(), 10_000);
        let recent = gateway.submitted();
        assert_eq!(recent.len(), 8);
        assert_eq!(recent[0].price, Some(9_992.0));
        assert_eq!(recent[7].price, Some(9_999.0));

        assert_eq!(gateway.take_submitted().len(), 8);
        assert!(gateway.submitted().is_empty());
        assert_eq!(gateway.submitted_count(), 10_000);
    }

    #[test]
    fn test_from_config() {
        let gateway = SimulatedGateway::from_config(&GatewayConfig::default());
        assert_eq!(gateway.latency, Duration::from_nanos(50_000));
        assert_eq!(gateway.jitter, Duration::ZERO);
        assert_eq!(gateway.name(), "simulated");
        assert_eq!(gateway.execution_mode(), ExecutionMode::Simulated);
    }
}
