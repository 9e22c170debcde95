//! Read-mostly view over a frequency counter

use super::config::CounterConfig;
use super::counter::Counter;
use crate::error::Result;
use crate::traits::{FrequencyBounds, HeavyHitters, MergeError};
use core::hash::Hash;

/// Frequent-items sketch
///
/// Wraps any counter implementing [`HeavyHitters`] and exposes the
/// mapping-style surface of a frequency sketch: iteration over tracked
/// keys, membership, frequency lookup, union and in-place merge. The
/// counter is chosen explicitly at construction; [`FrequentItems::new`]
/// uses the canonical [`Counter`].
///
/// # Example
///
/// ```
/// use freqsketch::frequency::FrequentItems;
///
/// let mut s = FrequentItems::new(4096).unwrap();
/// let mut o = FrequentItems::new(4096).unwrap();
///
/// s.update(&"foo", 100);
/// o.update(&"foo", 100);
/// o.update(&"bar", 100);
///
/// let m = s.union(&o).unwrap();
/// assert_eq!(s.frequency_of(&"foo"), (100, 100));
/// assert_eq!(m.frequency_of(&"foo"), (200, 200));
/// assert_eq!(m.frequency_of(&"bar"), (100, 100));
/// assert_eq!(m.len(), 300);
/// ```
#[derive(Clone, Debug)]
pub struct FrequentItems<C> {
    counter: C,
}

impl<K: Hash + Eq + Clone + core::fmt::Debug> FrequentItems<Counter<K>> {
    /// Sketch backed by a [`Counter`] with the given capacity and default sampling
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(CounterConfig::new(capacity))
    }

    /// Sketch backed by a [`Counter`] built from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_config(config: CounterConfig) -> Result<Self> {
        Ok(Self::with_counter(Counter::with_config(config)?))
    }
}

impl<K: Hash + Eq + Clone + core::fmt::Debug> Default for FrequentItems<Counter<K>> {
    fn default() -> Self {
        Self::with_counter(Counter::default())
    }
}

impl<C> FrequentItems<C>
where
    C: HeavyHitters,
    C::Item: Sized + Clone,
{
    /// Sketch backed by the given counter implementation
    pub fn with_counter(counter: C) -> Self {
        Self { counter }
    }

    /// The underlying counter
    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// Consume the sketch and return its counter
    pub fn into_counter(self) -> C {
        self.counter
    }

    /// Add `weight` occurrences of `key`
    pub fn update(&mut self, key: &C::Item, weight: u64) {
        self.counter.insert_weighted(key, weight);
    }

    /// Bounds on the frequency of `key`, defined even for unseen keys
    pub fn frequency_of(&self, key: &C::Item) -> FrequencyBounds {
        self.counter.frequency(key)
    }

    /// True if `key` is an estimated heavy hitter (currently tracked)
    pub fn contains(&self, key: &C::Item) -> bool {
        self.counter.is_tracked(key)
    }

    /// Iterate the tracked keys in unspecified order
    pub fn tracked_keys(&self) -> C::Keys<'_> {
        self.counter.keys()
    }

    /// Iterate the tracked keys with their frequency bounds
    pub fn items(&self) -> impl Iterator<Item = (&C::Item, FrequencyBounds)> + '_ {
        self.counter
            .keys()
            .map(move |key| (key, self.counter.frequency(key)))
    }

    /// The k tracked keys with the largest guaranteed counts
    pub fn top_k(&self, k: usize) -> Vec<(C::Item, FrequencyBounds)> {
        self.counter.top_k(k)
    }

    /// Running length of the stream
    pub fn len(&self) -> u64 {
        self.counter.count()
    }

    /// True if the sketch has observed no weight
    pub fn is_empty(&self) -> bool {
        self.counter.is_empty()
    }

    /// Reset the sketch
    pub fn clear(&mut self) {
        self.counter.clear();
    }

    /// Merge `other` into this sketch in place
    pub fn merge_into(&mut self, other: &Self) -> core::result::Result<&mut Self, MergeError> {
        self.counter.merge(&other.counter)?;
        Ok(self)
    }

    /// New sketch summarizing both streams; neither input is modified
    pub fn union(&self, other: &Self) -> core::result::Result<Self, MergeError> {
        let mut merged = self.clone();
        merged.counter.merge(&other.counter)?;
        Ok(merged)
    }
}

impl<C> Extend<(C::Item, u64)> for FrequentItems<C>
where
    C: HeavyHitters,
    C::Item: Sized + Clone,
{
    fn extend<I: IntoIterator<Item = (C::Item, u64)>>(&mut self, iter: I) {
        for (key, weight) in iter {
            self.counter.insert_weighted(&key, weight);
        }
    }
}
