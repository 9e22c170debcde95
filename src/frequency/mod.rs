//! Frequency estimation
//!
//! This module provides a bounded-memory counter that tracks the most
//! frequent keys of a weighted stream, and a mapping-style view over it.
//!
//! # Types
//!
//! - [`Counter`]: the frequent-items counter with sampled rebalancing
//! - [`FrequentItems`]: iteration, membership, lookup and union over a counter
//! - [`CounterConfig`]: construction parameters and their defaults
//!
//! # Example
//!
//! ```
//! use freqsketch::frequency::{Counter, CounterConfig};
//!
//! let mut counter = Counter::with_config(CounterConfig::new(128)).unwrap();
//!
//! counter.update("item1", 5);
//! counter.update("item2", 3);
//!
//! let bounds = counter.frequency("item1");
//! assert!(bounds.contains(5));
//! println!("item1 occurred between {} and {} times", bounds.lower, bounds.upper);
//! ```

mod config;
mod counter;
mod sketch;

pub use config::{CounterConfig, ResolvedConfig};
pub use counter::Counter;
pub use sketch::FrequentItems;
