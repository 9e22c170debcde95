//! Bounded-memory weighted frequency counter
//!
//! The counter tracks at most `capacity` keys. When a new key arrives at a
//! full table, a random sample of the tracked counts is drawn, its
//! `order`-th smallest value becomes the eviction threshold, and that
//! threshold is subtracted from every tracked count. Keys that drop to zero
//! are evicted and the threshold is added to a global offset, so every key
//! keeps a provable `[count, count + offset]` frequency interval.
//!
//! See "A high-performance algorithm for identifying frequent items in data
//! streams" (Anderson et al., 2017) for the analysis.

use super::config::{CounterConfig, ResolvedConfig};
use crate::error::{Result, SketchError};
use crate::selection::quickselect;
use crate::traits::{FrequencyBounds, FrequencySketch, HeavyHitters, MergeError, Sketch};
use core::borrow::Borrow;
use core::hash::Hash;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{hash_map, HashMap};
use xxhash_rust::xxh3::Xxh3Builder;

type Table<K> = HashMap<K, u64, Xxh3Builder>;

/// Frequent-items counter with two-sided frequency bounds
///
/// Updates run in amortized constant time: a rebalance costs
/// `O(capacity)`, but each one frees a constant fraction of the table
/// (about `capacity - order` slots on average), so its cost is spread over
/// the updates that refill it.
///
/// Accuracy is bounded by the residual stream length (the mass outside the
/// most frequent keys), so the counter is most precise on skewed streams.
///
/// # Example
///
/// ```
/// use freqsketch::frequency::Counter;
///
/// let mut counter = Counter::new(5);
/// counter.update("foo", 100);
/// assert_eq!(counter.frequency("foo"), (100, 100));
///
/// for (i, key) in ["0", "1", "2", "3", "4"].into_iter().enumerate() {
///     counter.update(key, (i as u64 + 1) * 1000);
/// }
///
/// assert!(!counter.contains("foo"));
/// assert!(counter.contains("4"));
/// assert_eq!(counter.frequency("foo"), (0, counter.offset()));
/// ```
#[derive(Clone, Debug)]
pub struct Counter<K> {
    /// Maximum number of tracked keys
    capacity: usize,
    /// Counts sampled per rebalance
    sample_size: usize,
    /// Rank within the sample used as threshold
    order: usize,
    /// Total weight observed, including merged sketches
    length: u64,
    /// Total mass removed by rebalancing
    offset: u64,
    /// Tracked keys and their offset-adjusted counts
    table: Table<K>,
    /// Reusable buffer for sampled counts
    scratch: Vec<u64>,
    /// Random source for sampling
    rng: SmallRng,
}

impl<K: Hash + Eq> Counter<K> {
    /// Create a counter tracking up to `capacity` keys with default sampling
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`Counter::with_config`] for a
    /// fallible constructor.
    pub fn new(capacity: usize) -> Self {
        match Self::with_config(CounterConfig::new(capacity)) {
            Ok(counter) => counter,
            Err(err) => panic!("{}", err),
        }
    }

    /// Create a counter from a configuration, seeding sampling from OS entropy
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidConfig`] if the configuration is invalid.
    pub fn with_config(config: CounterConfig) -> Result<Self> {
        let resolved = config.resolve()?;
        Ok(Self::from_parts(resolved, SmallRng::from_entropy()))
    }

    /// Create a counter whose sampling is reproducible
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidConfig`] if the configuration is invalid.
    pub fn with_seed(config: CounterConfig, seed: u64) -> Result<Self> {
        let resolved = config.resolve()?;
        Ok(Self::from_parts(resolved, SmallRng::seed_from_u64(seed)))
    }

    fn from_parts(config: ResolvedConfig, rng: SmallRng) -> Self {
        Self {
            capacity: config.capacity,
            sample_size: config.sample_size,
            order: config.order,
            length: 0,
            offset: 0,
            table: HashMap::with_capacity_and_hasher(config.capacity, Xxh3Builder::new()),
            scratch: Vec::with_capacity(config.capacity),
            rng,
        }
    }

    /// Maximum number of tracked keys
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Counts sampled per rebalance
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Order statistic used as the eviction threshold
    pub fn order(&self) -> usize {
        self.order
    }

    /// Configuration that reproduces this counter's parameters
    pub fn config(&self) -> CounterConfig {
        CounterConfig::new(self.capacity)
            .sample_size(self.sample_size)
            .order(self.order)
    }

    /// Total weight observed (the stream length)
    pub fn len(&self) -> u64 {
        self.length
    }

    /// True if no weight has been observed
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Mass removed by rebalancing; the width of every frequency bound
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of keys currently tracked
    pub fn num_tracked(&self) -> usize {
        self.table.len()
    }

    /// Add `weight` occurrences of `key`
    ///
    /// A zero weight leaves the counter untouched. If the table is full and
    /// `key` is new, the counter rebalances first; the key is then tracked
    /// only if its weight exceeds the rebalance threshold.
    ///
    /// Counts, the stream length and the offset saturate at `u64::MAX`.
    /// Once saturated, upper bounds report `u64::MAX`, which still bounds
    /// every count representable in a `u64`.
    pub fn update(&mut self, key: K, weight: u64) {
        if weight == 0 {
            return;
        }

        self.length = self.length.saturating_add(weight);

        if let Some(count) = self.table.get_mut(&key) {
            *count = count.saturating_add(weight);
            return;
        }

        if self.table.len() < self.capacity {
            self.table.insert(key, weight);
            return;
        }

        let threshold = self.rebalance();
        if weight > threshold {
            debug_assert!(self.table.len() < self.capacity);
            self.table.insert(key, weight - threshold);
        }
    }

    /// Add a signed weight, rejecting negative values
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::NegativeWeight`] if `weight < 0`; the counter
    /// is not modified.
    pub fn try_update(&mut self, key: K, weight: i64) -> Result<()> {
        let weight = u64::try_from(weight).map_err(|_| SketchError::NegativeWeight(weight))?;
        self.update(key, weight);
        Ok(())
    }

    /// Bounds on the true frequency of `key`
    ///
    /// Defined for every key: an untracked key has bounds `(0, offset)`.
    pub fn frequency<Q>(&self, key: &Q) -> FrequencyBounds
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let count = self.table.get(key).copied().unwrap_or(0);
        FrequencyBounds::new(count, count.saturating_add(self.offset))
    }

    /// Check if `key` is currently tracked
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.contains_key(key)
    }

    /// Iterate the tracked keys in unspecified order
    pub fn keys(&self) -> hash_map::Keys<'_, K, u64> {
        self.table.keys()
    }

    /// Iterate tracked keys with their frequency bounds
    pub fn items(&self) -> impl Iterator<Item = (&K, FrequencyBounds)> + '_ {
        let offset = self.offset;
        self.table
            .iter()
            .map(move |(key, &count)| {
                (key, FrequencyBounds::new(count, count.saturating_add(offset)))
            })
    }

    /// Fold `other` into this counter
    ///
    /// Every tracked entry of `other` is replayed through [`Counter::update`]
    /// under this counter's own capacity and sampling policy, which may
    /// trigger rebalances. Afterwards the stream length is the exact sum of
    /// both lengths and `other`'s offset is added to this one. The two
    /// counters may have different configurations.
    pub fn merge(&mut self, other: &Counter<K>) -> &mut Self
    where
        K: Clone,
    {
        let length = self.length.saturating_add(other.length);

        for (key, &count) in &other.table {
            self.update(key.clone(), count);
        }

        self.length = length;
        self.offset = self.offset.saturating_add(other.offset);

        tracing::trace!(
            replayed = other.table.len(),
            length = self.length,
            offset = self.offset,
            "merged frequency counter"
        );

        self
    }

    /// Reset to the empty state, keeping configuration
    pub fn clear(&mut self) {
        self.table.clear();
        self.length = 0;
        self.offset = 0;
    }

    /// Free table space and return the threshold that was applied
    ///
    /// Only called with a full table, so the sample never exceeds it. The
    /// threshold is at least the smallest sampled count, which is at least
    /// the smallest tracked count, so one or more keys are always evicted.
    fn rebalance(&mut self) -> u64 {
        debug_assert_eq!(self.table.len(), self.capacity);

        self.scratch.clear();
        self.scratch.extend(self.table.values().copied());
        let (sample, _) = self.scratch.partial_shuffle(&mut self.rng, self.sample_size);
        let threshold = quickselect(sample, self.order);

        let before = self.table.len();
        self.table.retain(|_, count| {
            if *count <= threshold {
                false
            } else {
                *count -= threshold;
                true
            }
        });
        self.offset = self.offset.saturating_add(threshold);

        tracing::debug!(
            threshold,
            evicted = before - self.table.len(),
            tracked = self.table.len(),
            offset = self.offset,
            "rebalanced frequency counter"
        );

        threshold
    }
}

impl<K: Hash + Eq> Default for Counter<K> {
    fn default() -> Self {
        Self::new(CounterConfig::DEFAULT_CAPACITY)
    }
}

impl<K: Hash + Eq> Extend<(K, u64)> for Counter<K> {
    fn extend<I: IntoIterator<Item = (K, u64)>>(&mut self, iter: I) {
        for (key, weight) in iter {
            self.update(key, weight);
        }
    }
}

/// Each key counts as one occurrence
impl<K: Hash + Eq> Extend<K> for Counter<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.update(key, 1);
        }
    }
}

impl<K: Hash + Eq + Clone + core::fmt::Debug> Sketch for Counter<K> {
    type Item = K;

    fn insert(&mut self, item: &K) {
        self.update(item.clone(), 1);
    }

    fn merge(&mut self, other: &Self) -> core::result::Result<(), MergeError> {
        Counter::merge(self, other);
        Ok(())
    }

    fn clear(&mut self) {
        Counter::clear(self);
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
            + self.table.capacity() * core::mem::size_of::<(K, u64)>()
            + self.scratch.capacity() * core::mem::size_of::<u64>()
    }

    fn count(&self) -> u64 {
        self.length
    }
}

impl<K: Hash + Eq + Clone + core::fmt::Debug> FrequencySketch for Counter<K> {
    fn insert_weighted(&mut self, item: &K, weight: u64) {
        if weight > 0 {
            self.update(item.clone(), weight);
        }
    }

    fn frequency(&self, item: &K) -> FrequencyBounds {
        Counter::frequency(self, item)
    }

    fn offset(&self) -> u64 {
        self.offset
    }

    fn is_tracked(&self, item: &K) -> bool {
        self.contains(item)
    }
}

impl<K: Hash + Eq + Clone + core::fmt::Debug> HeavyHitters for Counter<K> {
    type Keys<'a>
        = hash_map::Keys<'a, K, u64>
    where
        Self: 'a;

    fn keys(&self) -> Self::Keys<'_> {
        self.table.keys()
    }

    fn num_tracked(&self) -> usize {
        self.table.len()
    }
}
