//! Synthetic market feed for demos and tests
//!
//! Produces quotes around a mid of 100 with a half-spread of 0.25 and a random
//! widening of the ask, so some events clear the default spread threshold and
//! some don't.

use super::{MarketEvent, SharedEventQueue};
use crate::core::now_ns;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Shape of the generated quotes
#[derive(Debug, Clone)]
pub struct FeedParams {
    pub symbol: String,
    pub base_price: f64,
    /// Mid wanders uniformly within `base_price ± mid_jitter`
    pub mid_jitter: f64,
    pub half_spread: f64,
    /// Extra ask widening drawn uniformly from `[0, max_ask_widening)`
    pub max_ask_widening: f64,
}

impl Default for FeedParams {
    fn default() -> Self {
        Self {
            symbol: "XYZ".to_string(),
            base_price: 100.0,
            mid_jitter: 1.0,
            half_spread: 0.25,
            max_ask_widening: 1.0,
        }
    }
}

/// Deterministic-when-seeded quote generator
pub struct SyntheticFeed {
    params: FeedParams,
    rng: StdRng,
    sequence: u64,
}

impl SyntheticFeed {
    pub fn new(params: FeedParams) -> Self {
        Self {
            params,
            rng: StdRng::from_entropy(),
            sequence: 0,
        }
    }

    pub fn with_seed(params: FeedParams, seed: u64) -> Self {
        Self {
            params,
            rng: StdRng::seed_from_u64(seed),
            sequence: 0,
        }
    }

    /// Generate the next event; sequence numbers start at 1
    pub fn next_event(&mut self) -> MarketEvent {
        self.sequence += 1;
        let p = &self.params;

        let mid = p.base_price + self.rng.gen_range(-p.mid_jitter..=p.mid_jitter);
        let widening = if p.max_ask_widening > 0.0 {
            self.rng.gen_range(0.0..p.max_ask_widening)
        } else {
            0.0
        };

        MarketEvent::new(
            now_ns(),
            p.symbol.clone(),
            mid - p.half_spread,
            mid + p.half_spread + widening,
            self.sequence,
        )
    }

    pub fn produced(&self) -> u64 {
        self.sequence
    }
}

/// Push events into `queue` every `interval` until `cancel` fires
///
/// Returns the number of events produced.
pub async fn run_producer(
    mut feed: SyntheticFeed,
    queue: SharedEventQueue,
    interval: Duration,
    cancel: CancellationToken,
) -> u64 {
    info!(
        symbol = %feed.params.symbol,
        interval_us = interval.as_micros() as u64,
        "feed producer started"
    );

    loop {
        let event = feed.next_event();
        if queue.put(event) {
            debug!(evicted = queue.evicted(), "producer overran consumer");
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    info!(produced = feed.produced(), "feed producer stopped");
    feed.produced()
}
