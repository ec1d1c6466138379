//! Bounded overwrite-on-full event buffer
//!
//! Stale quotes are worth less than fresh ones, so a full queue drops its
//! oldest event instead of blocking the producer. Every drop is counted.
//!
//! ```text
//!   put(E4) on a full queue of capacity 3
//!
//!   head                 tail          head           tail
//!   [ E1 | E2 | E3 ]  ──────▶  E1 ✗   [ E2 | E3 | E4 ]
//!                                 evicted += 1
//! ```
//!
//! Backed by `crossbeam::queue::ArrayQueue`, so a producer and a consumer may
//! run on different threads without a lock.

use super::MarketEvent;
use crate::core::ConfigError;
use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Shared handle used by producer and consumer tasks
pub type SharedEventQueue = Arc<EventQueue>;

pub struct EventQueue {
    buffer: ArrayQueue<MarketEvent>,
    evicted: AtomicU64,
}

impl EventQueue {
    /// Create a queue holding at most `capacity` events
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCount {
                field: "queue_capacity",
            });
        }

        Ok(Self {
            buffer: ArrayQueue::new(capacity),
            evicted: AtomicU64::new(0),
        })
    }

    /// Create a queue already wrapped for sharing between tasks
    pub fn shared(capacity: usize) -> Result<SharedEventQueue, ConfigError> {
        Self::new(capacity).map(Arc::new)
    }

    /// Append an event, evicting the oldest one if the queue is full
    ///
    /// Never blocks and never fails. Returns `true` if an event was evicted.
    #[inline]
    pub fn put(&self, event: MarketEvent) -> bool {
        match self.buffer.force_push(event) {
            Some(dropped) => {
                self.evicted.fetch_add(1, Ordering::Relaxed);
                trace!(
                    symbol = %dropped.symbol,
                    sequence = dropped.sequence,
                    "event queue full, evicted oldest event"
                );
                true
            }
            None => false,
        }
    }

    /// Remove up to `max_items` events from the head, oldest first
    ///
    /// Returns fewer (possibly zero) when the queue holds less.
    pub fn get_batch(&self, max_items: usize) -> Vec<MarketEvent> {
        let mut batch = Vec::with_capacity(max_items.min(self.buffer.len()));
        while batch.len() < max_items {
            match self.buffer.pop() {
                Some(event) => batch.push(event),
                None => break,
            }
        }
        batch
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Total number of events dropped on overflow since creation
    #[inline]
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("size", &self.size())
            .field("capacity", &self.capacity())
            .field("evicted", &self.evicted())
            .finish()
    }
}
