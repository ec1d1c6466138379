//! Vane Strategies - trading policies for the vane execution loop
//!
//! Strategies implement [`vane_core::engine::Strategy`]: they see each market
//! event once, in order, and may ask for an order. The loop's risk gate has
//! the final say.
//!
//! ## Available Strategies
//!
//! ### [`SpreadCapture`]
//!
//! Buys `order_size` at the ask whenever `ask - bid > spread_threshold`.
//!
//! ```rust
//! use vane_core::data::MarketEvent;
//! use vane_core::engine::Strategy;
//! use vane_strategies::SpreadCapture;
//!
//! let mut strategy = SpreadCapture::new(0.5, 1.0).unwrap();
//! let event = MarketEvent::new(0, "XYZ", 99.5, 100.6, 1);
//! let request = strategy.on_event(&event).unwrap();
//! assert_eq!(request.price, Some(100.6));
//! ```

pub mod spread_capture;

pub use spread_capture::SpreadCapture;
