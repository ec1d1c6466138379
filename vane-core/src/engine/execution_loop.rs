//! Execution Loop - drains events, gates orders, books fills
//!
//! ## Iteration
//!
//! ```text
//!              EventQueue::get_batch(batch_size)
//!                          │
//!                          ▼  (FIFO, one event at a time)
//!                 ┌─────────────────┐
//!                 │ Strategy::      │──── None ───▶ next event
//!                 │ on_event()      │
//!                 └─────────────────┘
//!                          │ OrderRequest
//!                          ▼
//!                 ┌─────────────────┐
//!                 │ RiskGate::check │──── Violation ─▶ skip (counted)
//!                 └─────────────────┘
//!                          │ allowed
//!                          ▼
//!                 ┌─────────────────┐   timeout / transport
//!                 │ OrderGateway::  │──────────────────────▶ FailurePolicy
//!                 │ send_order()    │   (skip or halt)
//!                 └─────────────────┘
//!                          │ OrderAck
//!                          ▼
//!                 ┌─────────────────┐
//!                 │ dedup by id     │──── seen ───▶ ignore (counted)
//!                 └─────────────────┘
//!                          │
//!            Filled / PartiallyFilled      Rejected
//!                          │                   │
//!                          ▼                   ▼
//!              RiskGate::apply_fill()     no mutation
//!              (confirmed qty/price)
//!                          │
//!                          ▼
//!                  yield_now() ◀── every iteration, even when idle
//! ```
//!
//! At most one order is in flight, so the ledger read by `check` is always the
//! ledger the previous fill left behind. Cancellation is observed before
//! every batch, while awaiting an ack, and at the yield point. An ack that
//! loses the race against cancellation is abandoned and never touches the
//! ledger. Events already dequeued when the loop halts or shuts down are
//! kept and processed first by the next `run_once`.

use super::dedup::AckDeduplicator;
use super::traits::Strategy;
use crate::config::{EngineConfig, FailurePolicy};
use crate::core::{ConfigError, EngineError, FillError, GatewayError, Side};
use crate::data::{MarketEvent, SequenceCheck, SequenceTracker, SharedEventQueue};
use crate::execution::{AckStatus, OrderAck, OrderGateway};
use crate::monitoring::EngineMetrics;
use crate::risk::{LedgerSnapshot, RiskGate};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Loop parameters
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// Events drained per iteration
    pub batch_size: usize,
    /// Upper bound on waiting for a single ack
    pub order_timeout: Duration,
    pub failure_policy: FailurePolicy,
    /// Order ids remembered for duplicate-ack suppression
    pub dedup_window: usize,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for LoopConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            order_timeout: config.order_timeout(),
            failure_policy: config.failure_policy,
            dedup_window: config.dedup_window,
        }
    }
}

impl LoopConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroCount {
                field: "batch_size",
            });
        }
        if self.dedup_window == 0 {
            return Err(ConfigError::ZeroCount {
                field: "dedup_window",
            });
        }
        if self.order_timeout.is_zero() {
            return Err(ConfigError::ZeroCount {
                field: "order_timeout",
            });
        }
        Ok(())
    }
}

/// Counters accumulated over the life of a loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    pub iterations: u64,
    pub events: u64,
    pub signals: u64,
    pub risk_rejections: u64,
    pub orders_sent: u64,
    pub fills: u64,
    pub partial_fills: u64,
    pub order_rejections: u64,
    pub duplicate_acks: u64,
    pub gateway_failures: u64,
    /// Orders whose ack was abandoned because of shutdown
    pub abandoned_orders: u64,
    pub sequence_gaps: u64,
    pub sequence_regressions: u64,
}

/// What handling one ack did to the ledger
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AckOutcome {
    /// Fill booked with the confirmed quantity
    Applied { quantity: f64, price: f64 },
    /// Venue rejected the order; ledger untouched
    Rejected,
    /// Venue confirmed zero quantity; ledger untouched
    NothingFilled,
    /// Ack for an order already handled; ledger untouched
    Duplicate,
}

/// Generic execution loop
///
/// Type parameters:
/// - `S`: strategy deciding what to trade
/// - `G`: order gateway (may be `dyn OrderGateway`)
///
/// Owns the [`RiskGate`], which makes it the ledger's single writer.
pub struct ExecutionLoop<S: Strategy, G: OrderGateway + ?Sized> {
    queue: SharedEventQueue,
    /// Dequeued events not yet processed; drained before the queue
    pending: VecDeque<MarketEvent>,
    strategy: S,
    gateway: Arc<G>,
    risk: RiskGate,
    config: LoopConfig,
    dedup: AckDeduplicator,
    sequences: SequenceTracker,
    stats: LoopStats,
    metrics: Option<EngineMetrics>,
}

impl<S: Strategy, G: OrderGateway + ?Sized> ExecutionLoop<S, G> {
    pub fn new(
        queue: SharedEventQueue,
        strategy: S,
        gateway: Arc<G>,
        risk: RiskGate,
        config: LoopConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        info!(
            "Initializing execution loop: {} + {} ({}), batch_size={}, timeout={:?}, policy={}",
            strategy.name(),
            gateway.name(),
            gateway.execution_mode(),
            config.batch_size,
            config.order_timeout,
            config.failure_policy
        );

        Ok(Self {
            queue,
            pending: VecDeque::new(),
            strategy,
            gateway,
            risk,
            dedup: AckDeduplicator::new(config.dedup_window),
            sequences: SequenceTracker::new(),
            stats: LoopStats::default(),
            metrics: None,
            config,
        })
    }

    /// Publish counters to a Prometheus registry
    pub fn with_metrics(mut self, metrics: EngineMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Run until `cancel` fires or a gateway failure halts the loop
    ///
    /// Takes `&mut self` so the caller keeps the ledger and stats afterwards
    /// and can decide whether to resume after a halt.
    pub async fn run(&mut self, cancel: &CancellationToken) -> Result<(), EngineError> {
        info!("Execution loop started");

        let result = loop {
            if cancel.is_cancelled() {
                break Ok(());
            }

            if let Err(e) = self.run_once(cancel).await {
                break Err(e);
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break Ok(()),
                _ = tokio::task::yield_now() => {}
            }
        };

        match &result {
            Ok(()) => info!(stats = ?self.stats, "Execution loop stopped"),
            Err(e) => error!(error = %e, stats = ?self.stats, "Execution loop halted"),
        }
        result
    }

    /// Drain one batch and process it in FIFO order
    ///
    /// Events left over from a batch interrupted by a halt or by cancellation
    /// are processed first, before anything new is taken from the queue.
    /// Returns the number of events processed.
    pub async fn run_once(&mut self, cancel: &CancellationToken) -> Result<usize, EngineError> {
        self.stats.iterations += 1;

        if self.pending.is_empty() && !cancel.is_cancelled() {
            self.pending.extend(self.queue.get_batch(self.config.batch_size));
        }
        if let Some(metrics) = &self.metrics {
            metrics.queue_depth.set(self.queue.size() as i64);
            metrics.queue_evictions.set(self.queue.evicted() as i64);
        }

        let mut processed = 0;
        while !cancel.is_cancelled() {
            let Some(event) = self.pending.pop_front() else {
                break;
            };
            if let Err(e) = self.process_event(event, cancel).await {
                if !self.pending.is_empty() {
                    warn!(
                        carried = self.pending.len(),
                        "loop halted mid-batch, events kept for resume"
                    );
                }
                return Err(e);
            }
            processed += 1;
        }

        if !self.pending.is_empty() {
            debug!(carried = self.pending.len(), "shutdown mid-batch, events kept for resume");
        }
        Ok(processed)
    }

    async fn process_event(
        &mut self,
        event: MarketEvent,
        cancel: &CancellationToken,
    ) -> Result<(), EngineError> {
        self.stats.events += 1;
        if let Some(metrics) = &self.metrics {
            metrics.events_total.inc();
        }

        match self.sequences.observe(&event.symbol, event.sequence) {
            SequenceCheck::Gap { .. } => self.stats.sequence_gaps += 1,
            SequenceCheck::Regression { .. } => self.stats.sequence_regressions += 1,
            SequenceCheck::First | SequenceCheck::InOrder => {}
        }

        let Some(request) = self.strategy.on_event(&event) else {
            return Ok(());
        };
        self.stats.signals += 1;

        // Market orders are checked against the touch they would cross
        let reference_price = request.price.unwrap_or(match request.side {
            Side::Buy => event.ask,
            Side::Sell => event.bid,
        });

        if let Err(violation) =
            self.risk
                .check(&request.symbol, request.side, request.size, reference_price)
        {
            self.stats.risk_rejections += 1;
            if let Some(metrics) = &self.metrics {
                metrics
                    .risk_rejections_total
                    .with_label_values(&[violation.kind()])
                    .inc();
            }
            debug!(%request, %violation, "order blocked by risk gate");
            return Ok(());
        }

        self.stats.orders_sent += 1;
        if let Some(metrics) = &self.metrics {
            metrics
                .orders_total
                .with_label_values(&[request.side.as_str()])
                .inc();
        }
        debug!(%request, sequence = event.sequence, "submitting order");

        let timeout = self.config.order_timeout;
        let submitted_at = Instant::now();
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GatewayError::Cancelled),
            result = tokio::time::timeout(timeout, self.gateway.send_order(&request)) => {
                result.unwrap_or(Err(GatewayError::Timeout(timeout)))
            }
        };

        match outcome {
            Ok(ack) => {
                if let Some(metrics) = &self.metrics {
                    metrics
                        .ack_latency_seconds
                        .observe(submitted_at.elapsed().as_secs_f64());
                }
                self.handle_ack(&ack)?;
                Ok(())
            }
            Err(GatewayError::Cancelled) => {
                self.stats.abandoned_orders += 1;
                self.record_gateway_failure("cancelled");
                warn!(%request, "shutdown while awaiting ack, order abandoned");
                Ok(())
            }
            Err(err) => {
                self.stats.gateway_failures += 1;
                self.record_gateway_failure(match err {
                    GatewayError::Timeout(_) => "timeout",
                    _ => "transport",
                });

                match self.config.failure_policy {
                    FailurePolicy::Skip => {
                        warn!(%request, error = %err, "order gateway failure, skipping");
                        Ok(())
                    }
                    FailurePolicy::Halt => {
                        error!(%request, error = %err, "order gateway failure, halting");
                        Err(err.into())
                    }
                }
            }
        }
    }

    /// Book one acknowledgement
    ///
    /// Only genuine fills mutate the ledger, using the confirmed quantity and
    /// price. Each order id is handled at most once.
    pub fn handle_ack(&mut self, ack: &OrderAck) -> Result<AckOutcome, FillError> {
        if !self.dedup.insert(ack.order_id) {
            self.stats.duplicate_acks += 1;
            if let Some(metrics) = &self.metrics {
                metrics.duplicate_acks_total.inc();
            }
            warn!(order_id = %ack.order_id, "duplicate ack ignored");
            return Ok(AckOutcome::Duplicate);
        }

        let (quantity, price) = match &ack.status {
            AckStatus::Rejected { reason } => {
                self.stats.order_rejections += 1;
                if let Some(metrics) = &self.metrics {
                    metrics.order_rejections_total.inc();
                }
                info!(order_id = %ack.order_id, symbol = %ack.symbol, reason = %reason, "order rejected");
                return Ok(AckOutcome::Rejected);
            }
            AckStatus::Filled {
                filled_quantity,
                fill_price,
            }
            | AckStatus::PartiallyFilled {
                filled_quantity,
                fill_price,
            } => (*filled_quantity, *fill_price),
        };

        if quantity == 0.0 {
            debug!(order_id = %ack.order_id, "ack confirmed zero quantity");
            return Ok(AckOutcome::NothingFilled);
        }
        if quantity > ack.size {
            warn!(
                order_id = %ack.order_id,
                filled = quantity,
                requested = ack.size,
                "venue confirmed more than requested"
            );
        }

        self.risk.apply_fill(&ack.symbol, quantity, price, ack.side)?;

        match ack.status {
            AckStatus::PartiallyFilled { .. } => self.stats.partial_fills += 1,
            _ => self.stats.fills += 1,
        }
        if let Some(metrics) = &self.metrics {
            metrics
                .fills_total
                .with_label_values(&[ack.status.as_str()])
                .inc();
            metrics.pnl.set(self.risk.pnl());
            metrics
                .position
                .with_label_values(&[ack.symbol.as_str()])
                .set(self.risk.position(&ack.symbol));
        }

        self.strategy.on_fill(ack);
        Ok(AckOutcome::Applied { quantity, price })
    }

    fn record_gateway_failure(&self, kind: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.gateway_failures_total.with_label_values(&[kind]).inc();
        }
    }

    pub fn risk(&self) -> &RiskGate {
        &self.risk
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.risk.snapshot()
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn queue(&self) -> &SharedEventQueue {
        &self.queue
    }

    /// Events already dequeued but not yet processed
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn metrics(&self) -> Option<&EngineMetrics> {
        self.metrics.as_ref()
    }

    /// Consume the loop, keeping only the ledger
    pub fn into_risk(self) -> RiskGate {
        self.risk
    }
}
