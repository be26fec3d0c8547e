//! Error types for the Bloom filter crate

use thiserror::Error;

/// Errors that can occur while configuring or operating a Bloom filter
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid capacity: expected at least one element")]
    InvalidCapacity,

    #[error("Invalid false positive rate: {fpr} (must be strictly between 0 and 1)")]
    InvalidFPR { fpr: f64 },

    #[error("Invalid hash count: an explicit round count must be at least 1")]
    InvalidHashCount,

    #[error("Filter size is not addressable on this platform: {size_bits} bits")]
    FilterTooLarge { size_bits: u64 },

    #[error("Incompatible filters: {0}")]
    IncompatibleFilters(String),

    #[error("Hash failure: {0}")]
    HashFailure(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::InvalidConfig(err.to_string())
    }
}
