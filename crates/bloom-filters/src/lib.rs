//! # Bloom Filters
//!
//! Thread-safe probabilistic set membership with pluggable hashing.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure data structure logic, no I/O
//!   - `BloomFilter`: Core probabilistic data structure
//!   - `BloomConfig`: Configuration with validation
//!   - `BloomConfigBuilder`: Fluent builder for configuration
//!   - `HashStrategy` / `HasherKind`: Pluggable hash projections
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `MembershipFilter`: Driving port (inbound API)
//!
//! - **Metrics** (`metrics`): Optional instrumentation hooks
//!
//! ## Invariants
//!
//! - **No false negatives**: if added, `test()` MUST return true
//! - **Bounded FPR**: FPR = (1 - e^(-kn/m))^k stays near the target while n <= capacity
//!   (k is rounded up, so the expected rate can sit slightly above it)
//! - **Fixed size**: m is set at construction and never changes
//!
//! ## Usage Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use bloom_filters::{BloomConfigBuilder, BloomFilter, HasherKind};
//!
//! let config = BloomConfigBuilder::new()
//!     .capacity(10_000)
//!     .false_positive_rate(0.01)
//!     .hasher(HasherKind::SipHash)
//!     .build()?;
//!
//! let filter = Arc::new(BloomFilter::new(&config)?);
//!
//! let writer = {
//!     let filter = Arc::clone(&filter);
//!     thread::spawn(move || filter.add(b"0xABCD"))
//! };
//! writer.join().unwrap()?;
//!
//! assert!(filter.test(b"0xABCD")?);
//! assert!(!filter.test(b"0x1234")?);
//! # Ok::<(), bloom_filters::FilterError>(())
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;

// Re-exports for convenience
pub use domain::{
    BloomConfig, BloomConfigBuilder, BloomFilter, BloomFilterParams, HashPair, HashStrategy,
    HasherKind,
};
pub use error::FilterError;
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::MembershipFilter;
