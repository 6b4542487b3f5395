//! Construction parameters for a [`BloomFilter`](crate::filters::bloomfilter::BloomFilter).
//!
//! # Example
//!
//! ```
//! use simplebloom::config::BloomConfigBuilder;
//!
//! let config = BloomConfigBuilder::new()
//!     .capacity(1000)
//!     .error_rate(0.001)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.bit_count().unwrap(), 14378);
//! assert_eq!(config.hash_rounds().unwrap(), 10);
//! ```
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sizing::{calculate_hash_count, calculate_space, check_error_rate, estimate_fp_rate};

/// Default number of elements a filter is sized for.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default target false positive rate.
pub const DEFAULT_ERROR_RATE: f64 = 0.001;

/// Bloom filter configuration.
///
/// With the `serde` feature, missing fields fall back to their defaults during
/// deserialization.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct BloomConfig {
    /// Number of elements the filter is expected to hold, must be `> 0`.
    pub capacity: usize,
    /// False positive rate after `capacity` insertions, must be `> 0` and `< 1`.
    pub error_rate: f64,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            error_rate: DEFAULT_ERROR_RATE,
        }
    }
}

impl BloomConfig {
    /// Create a new, validated configuration.
    pub fn new(capacity: usize, error_rate: f64) -> Result<Self> {
        let config = Self {
            capacity,
            error_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that all parameters are in range.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidArgument(
                "capacity (0) must be greater than 0".to_owned(),
            ));
        }
        check_error_rate(self.error_rate)
    }

    /// Number of bits a filter with this configuration allocates.
    pub fn bit_count(&self) -> Result<usize> {
        calculate_space(self.capacity, self.error_rate)
    }

    /// Number of hash rounds a filter with this configuration uses.
    pub fn hash_rounds(&self) -> Result<usize> {
        calculate_hash_count(self.capacity, self.bit_count()?)
    }

    /// False positive rate estimated for a filter holding exactly `capacity` elements.
    ///
    /// This differs slightly from `error_rate` because `m` and `k` are integers.
    pub fn expected_fp_rate(&self) -> Result<f64> {
        let m = self.bit_count()?;
        let k = calculate_hash_count(self.capacity, m)?;
        Ok(estimate_fp_rate(m, k, self.capacity))
    }

    /// Builder-style method to set the capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builder-style method to set the error rate.
    pub fn with_error_rate(mut self, error_rate: f64) -> Self {
        self.error_rate = error_rate;
        self
    }
}

/// Builder for [`BloomConfig`], unset values fall back to [`BloomConfig::default`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BloomConfigBuilder {
    capacity: Option<usize>,
    error_rate: Option<f64>,
}

impl BloomConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of elements the filter is expected to hold.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the target false positive rate.
    pub fn error_rate(mut self, error_rate: f64) -> Self {
        self.error_rate = Some(error_rate);
        self
    }

    /// Build the configuration, validating all parameters.
    pub fn build(self) -> Result<BloomConfig> {
        let defaults = BloomConfig::default();
        BloomConfig::new(
            self.capacity.unwrap_or(defaults.capacity),
            self.error_rate.unwrap_or(defaults.error_rate),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{BloomConfig, BloomConfigBuilder, DEFAULT_CAPACITY, DEFAULT_ERROR_RATE};
    use crate::error::Error;

    #[test]
    fn default_is_valid() {
        let config = BloomConfig::default();
        config.validate().unwrap();
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
        assert_eq!(config.error_rate, DEFAULT_ERROR_RATE);
    }

    #[test]
    fn new_rejects_invalid() {
        assert_eq!(
            BloomConfig::new(0, 0.1),
            Err(Error::InvalidArgument(
                "capacity (0) must be greater than 0".to_owned()
            ))
        );
        assert_eq!(
            BloomConfig::new(10, 1.),
            Err(Error::InvalidArgument(
                "error_rate (1) must be greater than 0 and smaller than 1".to_owned()
            ))
        );
    }

    #[test]
    fn previews() {
        let config = BloomConfig::new(3000, 0.001).unwrap();
        assert_eq!(config.bit_count().unwrap(), 43133);
        assert_eq!(config.hash_rounds().unwrap(), 10);

        let p = config.expected_fp_rate().unwrap();
        assert!((p - 0.001).abs() < 0.00005, "p={}", p);
    }

    #[test]
    fn with_methods() {
        let config = BloomConfig::default()
            .with_capacity(2000)
            .with_error_rate(0.05);
        assert_eq!(config, BloomConfig::new(2000, 0.05).unwrap());
        assert_eq!(config.bit_count().unwrap(), 12471);
    }

    #[test]
    fn builder() {
        let config = BloomConfigBuilder::new().capacity(2000).build().unwrap();
        assert_eq!(config.capacity, 2000);
        assert_eq!(config.error_rate, DEFAULT_ERROR_RATE);

        let err = BloomConfigBuilder::new().error_rate(0.).build();
        assert!(matches!(err, Err(Error::InvalidArgument(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde() {
        let config = BloomConfig::new(2000, 0.005).unwrap();
        let s = serde_json::to_string(&config).unwrap();
        assert_eq!(s, r#"{"capacity":2000,"error_rate":0.005}"#);
        let config2: BloomConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(config, config2);

        let partial: BloomConfig = serde_json::from_str(r#"{"capacity":50}"#).unwrap();
        assert_eq!(partial.capacity, 50);
        assert_eq!(partial.error_rate, DEFAULT_ERROR_RATE);
    }
}
