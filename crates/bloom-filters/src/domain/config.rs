//! Bloom filter configuration and validation
//!
//! # Example
//!
//! ```
//! use bloom_filters::{BloomConfigBuilder, HasherKind};
//!
//! let config = BloomConfigBuilder::new()
//!     .capacity(10_000)
//!     .false_positive_rate(0.001)
//!     .hasher(HasherKind::Murmur3)
//!     .build()
//!     .expect("Valid config");
//!
//! assert_eq!(config.params().hash_count, 10);
//! ```

use serde::{Deserialize, Serialize};

use super::hash_functions::HasherKind;
use super::parameters::{calculate_fpr, calculate_optimal_parameters, BloomFilterParams};
use crate::error::FilterError;

/// Default expected number of elements
pub const DEFAULT_CAPACITY: u64 = 100_000;

/// Default target false positive rate
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.01;

/// Bloom filter configuration
///
/// Consumed once at construction. Missing fields take their defaults when
/// deserialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    /// Expected number of elements (n)
    pub capacity: u64,
    /// Target false positive rate (p), strictly between 0 and 1
    pub false_positive_rate: f64,
    /// Explicit number of hash rounds, replacing the derived k.
    ///
    /// Any value other than the derived k voids the `false_positive_rate`
    /// guarantee. Only override if you know what you are doing.
    pub hashes_count: Option<u16>,
    /// Hash algorithm used to project elements onto bits
    pub hasher: HasherKind,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            false_positive_rate: DEFAULT_FALSE_POSITIVE_RATE,
            hashes_count: None,
            hasher: HasherKind::default(),
        }
    }
}

impl BloomConfig {
    /// Create a new configuration with validation
    pub fn new(capacity: u64, false_positive_rate: f64) -> Result<Self, FilterError> {
        let config = Self {
            capacity,
            false_positive_rate,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        let config: BloomConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// Rejects anything that would produce a zero-sized or always-true filter.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.capacity == 0 {
            return Err(FilterError::InvalidCapacity);
        }

        // NaN fails both comparisons
        let fpr = self.false_positive_rate;
        if !(fpr > 0.0 && fpr < 1.0) {
            return Err(FilterError::InvalidFPR { fpr });
        }

        if self.hashes_count == Some(0) {
            return Err(FilterError::InvalidHashCount);
        }

        Ok(())
    }

    /// Derived filter parameters, honoring an explicit `hashes_count`
    ///
    /// `expected_fpr` is recomputed for the effective k.
    pub fn params(&self) -> BloomFilterParams {
        let mut params = calculate_optimal_parameters(self.capacity, self.false_positive_rate);
        if let Some(k) = self.hashes_count {
            params.hash_count = u64::from(k);
            params.expected_fpr = calculate_fpr(params.size_bits, self.capacity, params.hash_count);
        }
        params
    }

    /// Builder-style method to set capacity
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builder-style method to set the target false positive rate
    pub fn with_false_positive_rate(mut self, fpr: f64) -> Self {
        self.false_positive_rate = fpr;
        self
    }

    /// Builder-style method to override the number of hash rounds
    pub fn with_hashes_count(mut self, count: u16) -> Self {
        self.hashes_count = Some(count);
        self
    }

    /// Builder-style method to select the hash algorithm
    pub fn with_hasher(mut self, hasher: HasherKind) -> Self {
        self.hasher = hasher;
        self
    }
}

/// Builder for BloomConfig with validation
#[derive(Default)]
pub struct BloomConfigBuilder {
    capacity: Option<u64>,
    false_positive_rate: Option<f64>,
    hashes_count: Option<u16>,
    hasher: Option<HasherKind>,
}

impl BloomConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set expected number of elements
    pub fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set target false positive rate (must be strictly between 0 and 1)
    pub fn false_positive_rate(mut self, fpr: f64) -> Self {
        self.false_positive_rate = Some(fpr);
        self
    }

    /// Override the derived number of hash rounds
    pub fn hashes_count(mut self, count: u16) -> Self {
        self.hashes_count = Some(count);
        self
    }

    /// Select the hash algorithm
    pub fn hasher(mut self, hasher: HasherKind) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Build the BloomConfig, validating all parameters
    pub fn build(self) -> Result<BloomConfig, FilterError> {
        let defaults = BloomConfig::default();

        let config = BloomConfig {
            capacity: self.capacity.unwrap_or(defaults.capacity),
            false_positive_rate: self
                .false_positive_rate
                .unwrap_or(defaults.false_positive_rate),
            hashes_count: self.hashes_count.or(defaults.hashes_count),
            hasher: self.hasher.unwrap_or(defaults.hasher),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BloomConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.capacity, 100_000);
        assert_eq!(config.false_positive_rate, 0.01);
        assert_eq!(config.hashes_count, None);
        assert_eq!(config.hasher, HasherKind::XxHash);
    }

    #[test]
    fn test_default_params() {
        let params = BloomConfig::default().params();
        assert_eq!(params.size_bits, 958_506);
        assert_eq!(params.hash_count, 7);
    }

    #[test]
    fn test_config_validation_rejects_zero_capacity() {
        let result = BloomConfig::new(0, 0.01);
        assert!(matches!(result, Err(FilterError::InvalidCapacity)));
    }

    #[test]
    fn test_config_validation_rejects_fpr_out_of_range() {
        for fpr in [0.0, 1.0, -0.5, 1.5, f64::NAN, f64::INFINITY] {
            let result = BloomConfig::new(1000, fpr);
            assert!(
                matches!(result, Err(FilterError::InvalidFPR { .. })),
                "fpr {} should be rejected",
                fpr
            );
        }
    }

    #[test]
    fn test_config_validation_rejects_zero_hash_count() {
        let config = BloomConfig::default().with_hashes_count(0);
        assert!(matches!(
            config.validate(),
            Err(FilterError::InvalidHashCount)
        ));
    }

    #[test]
    fn test_hashes_count_override_replaces_derived_k() {
        let config = BloomConfig::default().with_hashes_count(3);
        let params = config.params();

        assert_eq!(params.hash_count, 3);
        assert_eq!(params.size_bits, 958_506);
        // Fewer rounds than optimal means a worse expected rate
        assert!(params.expected_fpr > 0.01);
    }

    #[test]
    fn test_builder_creates_valid_config() {
        let config = BloomConfigBuilder::new()
            .capacity(5_000)
            .false_positive_rate(0.05)
            .hashes_count(4)
            .hasher(HasherKind::SipHash)
            .build()
            .expect("Should create valid config");

        assert_eq!(config.capacity, 5_000);
        assert_eq!(config.false_positive_rate, 0.05);
        assert_eq!(config.hashes_count, Some(4));
        assert_eq!(config.hasher, HasherKind::SipHash);
    }

    #[test]
    fn test_builder_uses_defaults() {
        let config = BloomConfigBuilder::new()
            .capacity(42)
            .build()
            .expect("Should use defaults for other fields");

        let defaults = BloomConfig::default();
        assert_eq!(config.false_positive_rate, defaults.false_positive_rate);
        assert_eq!(config.hasher, defaults.hasher);
    }

    #[test]
    fn test_builder_rejects_invalid_fpr() {
        let result = BloomConfigBuilder::new().false_positive_rate(1.0).build();
        assert!(matches!(result, Err(FilterError::InvalidFPR { .. })));
    }

    #[test]
    fn test_from_json_selects_hasher_by_name() {
        let config = BloomConfig::from_json(
            r#"{ "capacity": 2000, "false_positive_rate": 0.001, "hasher": "fnv1a" }"#,
        )
        .unwrap();

        assert_eq!(config.capacity, 2000);
        assert_eq!(config.false_positive_rate, 0.001);
        assert_eq!(config.hashes_count, None);
        assert_eq!(config.hasher, HasherKind::Fnv1a);
    }

    #[test]
    fn test_from_json_empty_document_is_default() {
        let config = BloomConfig::from_json("{}").unwrap();
        assert_eq!(config, BloomConfig::default());
    }

    #[test]
    fn test_from_json_rejects_unknown_hasher() {
        let result = BloomConfig::from_json(r#"{ "hasher": "crc32" }"#);
        assert!(matches!(result, Err(FilterError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_json_validates() {
        let result = BloomConfig::from_json(r#"{ "capacity": 0 }"#);
        assert!(matches!(result, Err(FilterError::InvalidCapacity)));
    }

    #[test]
    fn test_config_serializes_hasher_name() {
        let json = serde_json::to_string(&BloomConfig::default()).unwrap();
        assert!(json.contains(r#""hasher":"xxhash""#), "got {}", json);
    }
}
