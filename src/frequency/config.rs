//! Construction parameters for [`Counter`](super::Counter)

use crate::error::{Result, SketchError};

/// Construction parameters for a frequency counter
///
/// Only `capacity` is required. `sample_size` defaults to
/// `min(capacity, 1024)` and `order` to `sample_size / 2` (the sample
/// median).
///
/// # Example
///
/// ```
/// use freqsketch::frequency::CounterConfig;
///
/// let config = CounterConfig::new(256).sample_size(64).order(16);
/// let resolved = config.resolve().unwrap();
/// assert_eq!((resolved.capacity, resolved.sample_size, resolved.order), (256, 64, 16));
///
/// let defaults = CounterConfig::new(4096).resolve().unwrap();
/// assert_eq!((defaults.sample_size, defaults.order), (1024, 512));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterConfig {
    /// Maximum number of simultaneously tracked keys
    ///
    /// More counters give tighter bounds at the cost of memory.
    pub capacity: usize,
    /// Number of counts sampled when choosing an eviction threshold
    ///
    /// Larger samples cost more per rebalance but reduce threshold variance.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sample_size: Option<usize>,
    /// Zero-indexed rank within the sample used as the eviction threshold
    ///
    /// Lower ranks evict less per rebalance, improving accuracy but
    /// rebalancing more often.
    #[cfg_attr(feature = "serde", serde(default))]
    pub order: Option<usize>,
}

/// Fully validated counter parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub capacity: usize,
    pub sample_size: usize,
    pub order: usize,
}

impl CounterConfig {
    /// Capacity used by [`Default`]
    pub const DEFAULT_CAPACITY: usize = 4096;

    /// Upper limit on the default sample size
    pub const MAX_DEFAULT_SAMPLE_SIZE: usize = 1024;

    /// Configuration with the given capacity and default sampling
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            sample_size: None,
            order: None,
        }
    }

    /// Set the number of counts sampled per rebalance
    pub fn sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = Some(sample_size);
        self
    }

    /// Set the order statistic used as the eviction threshold
    pub fn order(mut self, order: usize) -> Self {
        self.order = Some(order);
        self
    }

    /// Fill in defaults and validate
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidConfig`] if `capacity` is zero,
    /// `sample_size > capacity`, or `order >= sample_size`.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        if self.capacity == 0 {
            return Err(SketchError::invalid_config(
                "capacity",
                self.capacity,
                "must be positive",
            ));
        }

        let sample_size = self
            .sample_size
            .unwrap_or_else(|| self.capacity.min(Self::MAX_DEFAULT_SAMPLE_SIZE));
        if sample_size > self.capacity {
            return Err(SketchError::invalid_config(
                "sample_size",
                sample_size,
                "must not exceed capacity",
            ));
        }

        let order = self.order.unwrap_or(sample_size / 2);
        if order >= sample_size {
            return Err(SketchError::invalid_config(
                "order",
                order,
                "must be less than sample_size",
            ));
        }

        Ok(ResolvedConfig {
            capacity: self.capacity,
            sample_size,
            order,
        })
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
