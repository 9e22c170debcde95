//! Core traits for frequency sketches
//!
//! Every sketch implements the base [`Sketch`] trait. Sketches that answer
//! point-frequency queries add [`FrequencySketch`], and those that keep an
//! explicit set of tracked keys add [`HeavyHitters`]. The
//! [`FrequentItems`](crate::frequency::FrequentItems) façade is written
//! against these traits, so an alternate counter implementation only has to
//! implement them to be usable behind it.

use core::fmt::Debug;
use thiserror::Error;

/// Error during sketch merge operation
///
/// [`Counter`](crate::frequency::Counter) accepts any configuration on merge
/// and never returns this; it exists for counters that require matching
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// Sketches have incompatible configurations
    #[error("incompatible config: expected {expected}, found {found}")]
    IncompatibleConfig { expected: String, found: String },
}

/// Lower and upper bound on the true frequency of a key
///
/// For any key, `lower <= true frequency <= upper` holds regardless of
/// whether the key is currently tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrequencyBounds {
    /// Guaranteed minimum count
    pub lower: u64,
    /// Guaranteed maximum count
    pub upper: u64,
}

impl FrequencyBounds {
    /// Create new frequency bounds
    pub fn new(lower: u64, upper: u64) -> Self {
        debug_assert!(lower <= upper);
        Self { lower, upper }
    }

    /// Check if a count falls within bounds
    pub fn contains(&self, count: u64) -> bool {
        count >= self.lower && count <= self.upper
    }

    /// Width of the interval
    pub fn width(&self) -> u64 {
        self.upper - self.lower
    }

    /// Point estimate: the midpoint of the interval
    pub fn estimate(&self) -> u64 {
        self.lower + self.width() / 2
    }

    /// True when the count is known exactly
    pub fn is_exact(&self) -> bool {
        self.lower == self.upper
    }
}

impl From<FrequencyBounds> for (u64, u64) {
    fn from(bounds: FrequencyBounds) -> Self {
        (bounds.lower, bounds.upper)
    }
}

impl PartialEq<(u64, u64)> for FrequencyBounds {
    fn eq(&self, other: &(u64, u64)) -> bool {
        self.lower == other.0 && self.upper == other.1
    }
}

/// Core trait for all streaming sketches
pub trait Sketch: Clone + Debug {
    /// The type of item this sketch processes
    type Item: ?Sized;

    /// Add one occurrence of an item to the sketch
    fn insert(&mut self, item: &Self::Item);

    /// Merge another sketch into this one
    ///
    /// Returns an error if sketches are incompatible
    fn merge(&mut self, other: &Self) -> Result<(), MergeError>;

    /// Reset sketch to empty state
    fn clear(&mut self);

    /// Memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Total weight processed (the stream length)
    fn count(&self) -> u64;

    /// Check if sketch is empty
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Weighted frequency estimation with two-sided bounds
pub trait FrequencySketch: Sketch {
    /// Add `weight` occurrences of an item
    ///
    /// A zero weight is a no-op.
    fn insert_weighted(&mut self, item: &Self::Item, weight: u64);

    /// Bounds on the frequency of an item; defined for unseen items too
    fn frequency(&self, item: &Self::Item) -> FrequencyBounds;

    /// Mass removed from evicted items, i.e. the width of every bound
    fn offset(&self) -> u64;

    /// Check if an item is currently tracked
    fn is_tracked(&self, item: &Self::Item) -> bool;

    /// Check if an item is guaranteed to have occurred at least `threshold` times
    fn exceeds_threshold(&self, item: &Self::Item, threshold: u64) -> bool {
        self.frequency(item).lower >= threshold
    }
}

/// Heavy hitters / Top-K capability
pub trait HeavyHitters: FrequencySketch
where
    Self::Item: Sized + Clone,
{
    /// Iterator over the tracked keys
    type Keys<'a>: Iterator<Item = &'a Self::Item>
    where
        Self: 'a;

    /// Iterate the tracked keys in unspecified order
    fn keys(&self) -> Self::Keys<'_>;

    /// Number of keys currently tracked
    fn num_tracked(&self) -> usize;

    /// Get tracked items whose guaranteed count is at least `fraction` of the stream
    ///
    /// Fraction is of the total stream length (0.0 to 1.0)
    fn heavy_hitters(&self, fraction: f64) -> Vec<(Self::Item, FrequencyBounds)> {
        let min_count = (fraction * self.count() as f64).ceil() as u64;
        let mut items: Vec<_> = self
            .keys()
            .map(|key| (key.clone(), self.frequency(key)))
            .filter(|(_, bounds)| bounds.lower >= min_count)
            .collect();
        items.sort_by(|a, b| b.1.lower.cmp(&a.1.lower));
        items
    }

    /// Get the k tracked items with the largest guaranteed counts
    fn top_k(&self, k: usize) -> Vec<(Self::Item, FrequencyBounds)> {
        let mut items: Vec<_> = self
            .keys()
            .map(|key| (key.clone(), self.frequency(key)))
            .collect();
        items.sort_by(|a, b| b.1.lower.cmp(&a.1.lower));
        items.truncate(k);
        items
    }
}
