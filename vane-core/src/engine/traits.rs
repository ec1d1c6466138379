//! Strategy seam of the execution loop

use crate::data::MarketEvent;
use crate::execution::{OrderAck, OrderRequest};

/// Trading policy plugged into the execution loop
///
/// Sees each event once, in dequeue order, and may ask for one order. The
/// loop, not the strategy, decides whether the order is sent.
pub trait Strategy: Send {
    /// Produce at most one order request for this event
    fn on_event(&mut self, event: &MarketEvent) -> Option<OrderRequest>;

    /// Strategy name for logging
    fn name(&self) -> &'static str;

    /// Called after a fill for one of this strategy's orders hit the ledger
    fn on_fill(&mut self, _ack: &OrderAck) {}

    /// Reset strategy state
    fn reset(&mut self) {}
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn on_event(&mut self, event: &MarketEvent) -> Option<OrderRequest> {
        (**self).on_event(event)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn on_fill(&mut self, ack: &OrderAck) {
        (**self).on_fill(ack)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
