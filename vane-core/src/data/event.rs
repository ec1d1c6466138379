use serde::{Deserialize, Serialize};

/// Top-of-book update pushed by a feed producer
///
/// Immutable once built. The consumer reads it exactly once and never
/// reorders events within a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    pub timestamp_ns: u64,
    pub symbol: String,
    pub bid: f64,
    pub ask: f64,
    /// Monotonic per symbol; assigned by the producer
    pub sequence: u64,
}

impl MarketEvent {
    pub fn new(
        timestamp_ns: u64,
        symbol: impl Into<String>,
        bid: f64,
        ask: f64,
        sequence: u64,
    ) -> Self {
        Self {
            timestamp_ns,
            symbol: symbol.into(),
            bid,
            ask,
            sequence,
        }
    }

    #[inline(always)]
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    #[inline(always)]
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spread_and_mid() {
        let event = MarketEvent::new(1, "XYZ", 99.5, 100.6, 1);
        assert_relative_eq!(event.spread(), 1.1, epsilon = 1e-9);
        assert_relative_eq!(event.mid(), 100.05, epsilon = 1e-9);
    }
}
