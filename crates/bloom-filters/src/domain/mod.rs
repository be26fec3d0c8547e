//! Domain Layer - Pure data structure logic
//!
//! This layer contains:
//! - Core Bloom filter implementation
//! - Hash strategies
//! - Parameter calculations
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod bloom_filter;
pub mod config;
pub mod hash_functions;
pub mod parameters;

pub use bloom_filter::BloomFilter;
pub use config::{BloomConfig, BloomConfigBuilder, DEFAULT_CAPACITY, DEFAULT_FALSE_POSITIVE_RATE};
pub use hash_functions::{Fnv1a, HashPair, HashStrategy, HasherKind, Murmur3, SipHash, XxHash};
pub use parameters::{
    bit_array_size, calculate_fpr, calculate_optimal_parameters, hash_rounds, BloomFilterParams,
};
