//! Shared fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vane_core::data::{EventQueue, MarketEvent, SharedEventQueue};
use vane_core::engine::{ExecutionLoop, LoopConfig, Strategy};
use vane_core::execution::{ExecutionMode, OrderAck, OrderGateway, OrderRequest};
use vane_core::risk::{RiskGate, RiskLimits};
use vane_core::{AckStatus, GatewayError, OrderId};
use vane_strategies::SpreadCapture;

/// One scripted gateway reply
#[derive(Debug, Clone)]
pub enum Reply {
    /// Answer with this status under a fresh order id
    Status(AckStatus),
    /// Answer with this status under a fixed order id
    StatusWithId(u64, AckStatus),
    /// Fail without an ack
    Fail(GatewayError),
    /// Never answer
    Stall,
}

/// Gateway that plays back a script, then fills everything at the limit price
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Reply>>,
    received: Mutex<Vec<OrderRequest>>,
    next_id: AtomicU64,
}

impl ScriptedGateway {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            received: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn received(&self) -> Vec<OrderRequest> {
        self.received.lock().clone()
    }

    fn fresh_id(&self) -> OrderId {
        OrderId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl OrderGateway for ScriptedGateway {
    async fn send_order(&self, request: &OrderRequest) -> Result<OrderAck, GatewayError> {
        self.received.lock().push(request.clone());
        let reply = self.script.lock().pop_front();

        let (order_id, status) = match reply {
            Some(Reply::Status(status)) => (self.fresh_id(), status),
            Some(Reply::StatusWithId(id, status)) => (OrderId::new(id), status),
            Some(Reply::Fail(err)) => return Err(err),
            Some(Reply::Stall) => return std::future::pending().await,
            None => (
                self.fresh_id(),
                AckStatus::Filled {
                    filled_quantity: request.size,
                    fill_price: request.price.unwrap_or_default(),
                },
            ),
        };

        tokio::time::sleep(Duration::from_millis(1)).await;
        Ok(OrderAck::for_request(order_id, request, status, 0))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }

    fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::Simulated
    }
}

/// Records the sequence of every event it sees and never trades
#[derive(Default)]
pub struct Recorder {
    pub seen: Vec<u64>,
}

impl Strategy for Recorder {
    fn on_event(&mut self, event: &MarketEvent) -> Option<OrderRequest> {
        self.seen.push(event.sequence);
        None
    }

    fn name(&self) -> &'static str {
        "Recorder"
    }
}

pub fn quote(bid: f64, ask: f64, sequence: u64) -> MarketEvent {
    MarketEvent::new(sequence, "XYZ", bid, ask, sequence)
}

/// Queue preloaded with `events`
pub fn queue_with(events: impl IntoIterator<Item = MarketEvent>) -> SharedEventQueue {
    let queue = EventQueue::shared(64).unwrap();
    for event in events {
        queue.put(event);
    }
    queue
}

pub fn empty_queue() -> SharedEventQueue {
    EventQueue::shared(64).unwrap()
}

pub fn loop_config(timeout: Duration) -> LoopConfig {
    LoopConfig {
        order_timeout: timeout,
        ..LoopConfig::default()
    }
}

/// Spread-capture loop (threshold 0.5, size 1) over `gateway`
pub fn spread_loop<G: OrderGateway>(
    queue: SharedEventQueue,
    gateway: Arc<G>,
    limits: RiskLimits,
    config: LoopConfig,
) -> ExecutionLoop<SpreadCapture, G> {
    let strategy = SpreadCapture::new(0.5, 1.0).unwrap();
    let risk = RiskGate::new(limits).unwrap();
    ExecutionLoop::new(queue, strategy, gateway, risk, config).unwrap()
}
