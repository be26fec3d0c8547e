//! Core Bloom Filter implementation
//!
//! INVARIANTS:
//! - No false negatives: once `add(x)` returns, every later `test(x)` is true
//! - The bit array holds exactly m bits in ceil(m / 64) words and never resizes
//! - A bit position is one reduction `h % m`; word and offset derive from it
//!
//! CONCURRENCY:
//! A single `parking_lot::RwLock` guards the bit array. `add` takes the write
//! lock, `test` takes the read lock, and hashing happens before either lock is
//! acquired.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use bitvec::prelude::*;
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::config::BloomConfig;
use super::hash_functions::HashStrategy;
use super::parameters::{calculate_fpr, hash_rounds};
use crate::error::FilterError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};

/// Mutable state behind the lock
struct FilterState {
    /// Packed bit array, m bits long
    bits: BitVec<u64, Lsb0>,
    /// Number of `add` calls (not distinct elements)
    inserted: u64,
}

/// Thread-safe Bloom filter for probabilistic membership testing
///
/// False positives are possible, false negatives are not. Share it between
/// threads with `Arc<BloomFilter>`.
pub struct BloomFilter {
    state: RwLock<FilterState>,
    /// Size in bits (m)
    m: u64,
    /// Number of hash rounds (k)
    k: u64,
    hasher: Arc<dyn HashStrategy>,
    metrics: Arc<dyn MetricsRecorder>,
    /// Whether `add`/`test` read the clock for the recorder
    timed: bool,
}

impl BloomFilter {
    /// Create a filter using the hasher selected in `config`
    pub fn new(config: &BloomConfig) -> Result<Self, FilterError> {
        Self::build(config, Arc::new(config.hasher), Arc::new(NoOpMetrics))
    }

    /// Create a filter with a caller-supplied hash strategy
    ///
    /// `config.hasher` is ignored.
    pub fn with_hasher(
        config: &BloomConfig,
        hasher: Arc<dyn HashStrategy>,
    ) -> Result<Self, FilterError> {
        Self::build(config, hasher, Arc::new(NoOpMetrics))
    }

    /// Create a filter that reports activity to `metrics`
    pub fn with_metrics(
        config: &BloomConfig,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Result<Self, FilterError> {
        Self::build(config, Arc::new(config.hasher), metrics)
    }

    fn build(
        config: &BloomConfig,
        hasher: Arc<dyn HashStrategy>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Result<Self, FilterError> {
        config.validate()?;
        let params = config.params();

        if let Some(k) = config.hashes_count {
            let derived = hash_rounds(config.false_positive_rate);
            if u64::from(k) != derived {
                warn!(
                    override_k = k,
                    derived_k = derived,
                    expected_fpr = params.expected_fpr,
                    "[BloomFilter] hash count override diverges from optimal; target FPR no longer guaranteed"
                );
            }
        }

        let len = usize::try_from(params.size_bits)
            .ok()
            .filter(|&len| len <= BitSlice::<u64, Lsb0>::MAX_BITS)
            .ok_or(FilterError::FilterTooLarge {
                size_bits: params.size_bits,
            })?;

        let bits = allocate_bits(len).ok_or(FilterError::FilterTooLarge {
            size_bits: params.size_bits,
        })?;

        debug!(
            size_bits = params.size_bits,
            hash_count = params.hash_count,
            hasher = hasher.name(),
            capacity = config.capacity,
            target_fpr = config.false_positive_rate,
            "[BloomFilter] filter created"
        );
        metrics.record_filter_created(params.size_bits, params.hash_count, config.capacity);

        Ok(Self {
            state: RwLock::new(FilterState { bits, inserted: 0 }),
            m: params.size_bits,
            k: params.hash_count,
            hasher,
            timed: metrics.is_enabled(),
            metrics,
        })
    }

    /// Insert an element into the filter
    ///
    /// Never rejects an element; inserting past capacity only raises the
    /// false positive rate. Inserting the same element again leaves the bit
    /// array unchanged.
    pub fn add(&self, element: &[u8]) -> Result<(), FilterError> {
        let start = self.timed.then(Instant::now);
        let positions = self.hasher.positions(element, self.k, self.m)?;

        {
            let mut state = self.state.write();
            for pos in positions {
                state.bits.set(pos as usize, true);
            }
            state.inserted += 1;
        }

        if let Some(start) = start {
            self.metrics.record_insert(start.elapsed());
        }
        Ok(())
    }

    /// Test if an element might be in the filter
    ///
    /// Returns:
    /// - `true` if the element might be in the set (could be false positive)
    /// - `false` if the element is definitely NOT in the set
    pub fn test(&self, element: &[u8]) -> Result<bool, FilterError> {
        let start = self.timed.then(Instant::now);
        let positions = self.hasher.positions(element, self.k, self.m)?;

        let found = {
            let state = self.state.read();
            positions.iter().all(|&pos| state.bits[pos as usize])
        };

        if let Some(start) = start {
            self.metrics.record_lookup(start.elapsed(), found);
        }
        Ok(found)
    }

    /// OR another filter's bits into this one
    ///
    /// Afterwards this filter matches every element of both. The filters must
    /// agree on m, k and hasher name.
    ///
    /// Compatibility is judged by [`HashStrategy::name`] only. Two custom
    /// strategies that share a name but hash differently are merged anyway,
    /// and elements from `other` may then test negative here. Give every
    /// distinct strategy a distinct name.
    pub fn union(&self, other: &BloomFilter) -> Result<(), FilterError> {
        if std::ptr::eq(self, other) {
            return Ok(());
        }

        if self.m != other.m || self.k != other.k || self.hasher_name() != other.hasher_name() {
            warn!(
                left_m = self.m,
                right_m = other.m,
                left_k = self.k,
                right_k = other.k,
                "[BloomFilter] union rejected"
            );
            return Err(FilterError::IncompatibleFilters(format!(
                "m={}/k={}/{} vs m={}/k={}/{}",
                self.m,
                self.k,
                self.hasher_name(),
                other.m,
                other.k,
                other.hasher_name()
            )));
        }

        // Copy out first so two filters unioned into each other cannot deadlock
        let (words, inserted) = {
            let other_state = other.state.read();
            (other_state.bits.as_raw_slice().to_vec(), other_state.inserted)
        };

        {
            let mut state = self.state.write();
            for (dst, src) in state.bits.as_raw_mut_slice().iter_mut().zip(&words) {
                *dst |= *src;
            }
            state.inserted += inserted;
        }

        self.metrics.record_merge();
        Ok(())
    }

    /// Get the filter size in bits (m)
    pub fn size_bits(&self) -> u64 {
        self.m
    }

    /// Get the number of hash rounds (k)
    pub fn hash_count(&self) -> u64 {
        self.k
    }

    /// Name of the hash strategy in use
    pub fn hasher_name(&self) -> &str {
        self.hasher.name()
    }

    /// Get the number of bits set in the filter
    pub fn bits_set(&self) -> u64 {
        self.state.read().bits.count_ones() as u64
    }

    /// Number of `add` calls so far, duplicates included
    pub fn elements_inserted(&self) -> u64 {
        self.state.read().inserted
    }

    /// Expected false positive rate given the inserts so far
    ///
    /// Formula: FPR = (1 - e^(-kn/m))^k
    pub fn estimated_false_positive_rate(&self) -> f64 {
        calculate_fpr(self.m, self.elements_inserted(), self.k)
    }

    #[cfg(test)]
    fn raw_words(&self) -> Vec<u64> {
        self.state.read().bits.as_raw_slice().to_vec()
    }
}

/// Zeroed bit array of `len` bits, or `None` if the words cannot be allocated
fn allocate_bits(len: usize) -> Option<BitVec<u64, Lsb0>> {
    let words = len.div_ceil(64);
    let mut raw: Vec<u64> = Vec::new();
    raw.try_reserve_exact(words).ok()?;
    raw.resize(words, 0);

    let mut bits = BitVec::from_vec(raw);
    bits.truncate(len);
    Some(bits)
}

impl fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("m", &self.m)
            .field("k", &self.k)
            .field("hasher", &self.hasher.name())
            .field("inserted", &self.elements_inserted())
            .finish()
    }
}

impl Drop for BloomFilter {
    fn drop(&mut self) {
        self.metrics.record_filter_freed(self.m);
    }
}
