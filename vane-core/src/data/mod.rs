//! Market data side of the pipeline
//!
//! - [`MarketEvent`]: top-of-book record pushed by a producer
//! - [`EventQueue`]: bounded overwrite-on-full buffer between producer and loop
//! - [`SequenceTracker`]: per-symbol gap/regression accounting
//! - [`feed`]: synthetic producer for demos and tests

pub mod event;
pub mod event_queue;
pub mod feed;
pub mod sequence;

pub use event::MarketEvent;
pub use event_queue::{EventQueue, SharedEventQueue};
pub use feed::{run_producer, FeedParams, SyntheticFeed};
pub use sequence::{SequenceCheck, SequenceTracker};
