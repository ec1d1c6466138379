//! Spread Capture Strategy
//!
//! Buys a fixed size at the ask whenever the quoted spread is wider than a
//! threshold. One request per qualifying event; whether it is sent is the
//! risk gate's call.

use anyhow::{bail, Result};
use vane_core::config::EngineConfig;
use vane_core::data::MarketEvent;
use vane_core::engine::Strategy;
use vane_core::execution::{OrderAck, OrderRequest};
use vane_core::Side;

pub struct SpreadCapture {
    spread_threshold: f64,
    order_size: f64,
    signals: u64,
    filled_quantity: f64,
}

impl SpreadCapture {
    pub fn new(spread_threshold: f64, order_size: f64) -> Result<Self> {
        if !(spread_threshold.is_finite() && spread_threshold >= 0.0) {
            bail!("spread_threshold must be non-negative, got {}", spread_threshold);
        }
        if !(order_size.is_finite() && order_size > 0.0) {
            bail!("order_size must be positive, got {}", order_size);
        }

        Ok(Self {
            spread_threshold,
            order_size,
            signals: 0,
            filled_quantity: 0.0,
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::new(config.spread_threshold, config.order_size)
    }

    pub fn spread_threshold(&self) -> f64 {
        self.spread_threshold
    }

    pub fn order_size(&self) -> f64 {
        self.order_size
    }

    /// Requests emitted so far
    pub fn signals(&self) -> u64 {
        self.signals
    }

    /// Quantity confirmed filled for this strategy's orders
    pub fn filled_quantity(&self) -> f64 {
        self.filled_quantity
    }

    /// A usable ask is all a buy needs; an empty bid side (0) still counts
    #[inline]
    fn is_tradeable(event: &MarketEvent) -> bool {
        event.bid.is_finite() && event.ask.is_finite() && event.ask > 0.0
    }
}

impl Strategy for SpreadCapture {
    fn on_event(&mut self, event: &MarketEvent) -> Option<OrderRequest> {
        if !Self::is_tradeable(event) {
            return None;
        }

        let spread = event.spread();
        if spread <= self.spread_threshold {
            return None;
        }

        self.signals += 1;
        tracing::trace!(
            symbol = %event.symbol,
            spread,
            threshold = self.spread_threshold,
            "spread wide enough, buying at ask"
        );
        Some(OrderRequest::limit(
            event.symbol.clone(),
            Side::Buy,
            self.order_size,
            event.ask,
        ))
    }

    fn name(&self) -> &'static str {
        "SpreadCapture"
    }

    fn on_fill(&mut self, ack: &OrderAck) {
        if let Some((quantity, _)) = ack.status.fill() {
            self.filled_quantity += quantity;
        }
    }

    fn reset(&mut self) {
        self.signals = 0;
        self.filled_quantity = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::{prop_assert, prop_assert_eq, proptest};
    use vane_core::execution::AckStatus;
    use vane_core::OrderId;

    fn event(bid: f64, ask: f64) -> MarketEvent {
        MarketEvent::new(1, "XYZ", bid, ask, 1)
    }

    #[test]
    fn test_wide_spread_buys_one_at_ask() {
        let mut strategy = SpreadCapture::new(0.5, 1.0).unwrap();
        let request = strategy.on_event(&event(99.5, 100.6)).unwrap();

        assert_eq!(request, OrderRequest::limit("XYZ", Side::Buy, 1.0, 100.6));
        assert_eq!(strategy.signals(), 1);
    }

    #[test]
    fn test_spread_at_threshold_is_ignored() {
        let mut strategy = SpreadCapture::new(0.5, 1.0).unwrap();
        assert!(strategy.on_event(&event(99.75, 100.25)).is_none());
        assert!(strategy.on_event(&event(100.0, 100.1)).is_none());
        assert_eq!(strategy.signals(), 0);
    }

    #[test]
    fn test_crossed_or_broken_quotes_ignored() {
        let mut strategy = SpreadCapture::new(0.0, 1.0).unwrap();
        assert!(strategy.on_event(&event(101.0, 100.0)).is_none());
        assert!(strategy.on_event(&event(f64::NAN, 100.0)).is_none());
        assert!(strategy.on_event(&event(99.0, 0.0)).is_none());
    }

    #[test]
    fn test_one_sided_quote_with_wide_spread_buys() {
        let mut strategy = SpreadCapture::new(0.5, 1.0).unwrap();
        let request = strategy.on_event(&event(0.0, 100.0)).unwrap();
        assert_eq!(request, OrderRequest::limit("XYZ", Side::Buy, 1.0, 100.0));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(SpreadCapture::new(-0.1, 1.0).is_err());
        assert!(SpreadCapture::new(0.5, 0.0).is_err());
        assert!(SpreadCapture::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_from_config_uses_defaults() {
        let strategy = SpreadCapture::from_config(&EngineConfig::default()).unwrap();
        assert_eq!(strategy.spread_threshold(), 0.5);
        assert_eq!(strategy.order_size(), 1.0);
    }

    #[test]
    fn test_on_fill_tracks_confirmed_quantity() {
        let mut strategy = SpreadCapture::new(0.5, 1.0).unwrap();
        let request = OrderRequest::limit("XYZ", Side::Buy, 1.0, 100.0);
        let partial = OrderAck::for_request(
            OrderId::new(1),
            &request,
            AckStatus::PartiallyFilled {
                filled_quantity: 0.25,
                fill_price: 100.0,
            },
            0,
        );
        strategy.on_fill(&partial);
        strategy.on_fill(&partial);
        assert_relative_eq!(strategy.filled_quantity(), 0.5);

        strategy.reset();
        assert_eq!(strategy.filled_quantity(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_signals_only_above_threshold(
            bid in 1.0f64..1_000.0,
            width in -5.0f64..5.0,
            threshold in 0.0f64..3.0,
        ) {
            let ask = bid + width;
            let mut strategy = SpreadCapture::new(threshold, 2.0).unwrap();

            match strategy.on_event(&event(bid, ask)) {
                Some(request) => {
                    prop_assert!(ask - bid > threshold);
                    prop_assert_eq!(request.side, Side::Buy);
                    prop_assert_eq!(request.size, 2.0);
                    prop_assert_eq!(request.price, Some(ask));
                }
                None => prop_assert!(ask - bid <= threshold || ask <= 0.0),
            }
        }
    }
}
