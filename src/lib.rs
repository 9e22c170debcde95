//! # Freqsketch
//!
//! Frequent-items sketching for weighted streams in bounded memory.
//!
//! A [`Counter`](frequency::Counter) keeps a fixed number of counters for
//! the heaviest keys of a stream. Mass that does not fit is folded into a
//! shared offset, so every key, tracked or not, has a guaranteed
//! `lower <= true count <= upper` interval whose width is that offset.
//!
//! ## Features
//!
//! - **Weighted updates** in amortized constant time
//! - **Two-sided bounds** for every key via [`FrequencyBounds`](traits::FrequencyBounds)
//! - **Tunable rebalancing**: sample size and order statistic trade speed for accuracy
//! - **Mergeability**: counters built on separate shards combine into one
//!
//! ## Quick Start
//!
//! ```rust
//! use freqsketch::prelude::*;
//!
//! let mut counter = Counter::new(128);
//! for word in "the cat and the dog and the bird".split_whitespace() {
//!     counter.update(word, 1);
//! }
//! assert_eq!(counter.frequency("the"), (3, 3));
//! assert_eq!(counter.top_k(1)[0].0, "the");
//! ```
//!
//! ## Distributed Counting
//!
//! Counters are not shared between threads; keep one per worker and merge:
//!
//! ```rust
//! use freqsketch::frequency::Counter;
//!
//! let mut worker1 = Counter::new(1024);
//! let mut worker2 = Counter::new(1024);
//!
//! worker1.update("user_a", 3);
//! worker2.update("user_a", 4);
//! worker2.update("user_b", 1);
//!
//! worker1.merge(&worker2);
//! assert_eq!(worker1.frequency("user_a"), (7, 7));
//! assert_eq!(worker1.len(), 8);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: serialize [`CounterConfig`](frequency::CounterConfig) and
//!   [`FrequencyBounds`](traits::FrequencyBounds)

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod frequency;
pub mod traits;

mod selection;

pub use error::{Result, SketchError};
pub use selection::select;

pub mod prelude {
    pub use crate::error::SketchError;
    pub use crate::frequency::{Counter, CounterConfig, FrequentItems};
    pub use crate::select;
    pub use crate::traits::*;
}

pub use frequency::{Counter, CounterConfig, FrequentItems};
pub use traits::FrequencyBounds;
