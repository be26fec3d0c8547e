//! Metrics hooks for Bloom filter operations
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use bloom_filters::{BloomConfig, BloomFilter, Metrics};
//!
//! let metrics = Arc::new(Metrics::new());
//! let filter = BloomFilter::with_metrics(&BloomConfig::default(), metrics.clone()).unwrap();
//!
//! filter.add(b"alice").unwrap();
//! assert!(filter.test(b"alice").unwrap());
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.elements_inserted, 1);
//! assert_eq!(snapshot.lookups_positive, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for Bloom filter operations
///
/// Thread-safe counters shared by any number of filters.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total filters created
    pub filters_created: AtomicU64,
    /// Total `add` calls across all filters
    pub elements_inserted: AtomicU64,
    /// Total `test` calls
    pub lookups_performed: AtomicU64,
    /// Total `test` calls that returned true
    pub lookups_positive: AtomicU64,
    /// Total successful unions
    pub filters_merged: AtomicU64,
    /// Bytes currently held by live filters
    pub bytes_allocated: AtomicU64,
    /// Cumulative lookup time in nanoseconds
    pub lookup_time_ns: AtomicU64,
    /// Cumulative insert time in nanoseconds
    pub insert_time_ns: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filters_created: self.filters_created.load(Ordering::Relaxed),
            elements_inserted: self.elements_inserted.load(Ordering::Relaxed),
            lookups_performed: self.lookups_performed.load(Ordering::Relaxed),
            lookups_positive: self.lookups_positive.load(Ordering::Relaxed),
            filters_merged: self.filters_merged.load(Ordering::Relaxed),
            bytes_allocated: self.bytes_allocated.load(Ordering::Relaxed),
            avg_lookup_ns: self.avg_lookup_time_ns(),
            avg_insert_ns: self.avg_insert_time_ns(),
        }
    }

    /// Calculate average lookup time in nanoseconds
    pub fn avg_lookup_time_ns(&self) -> u64 {
        average(&self.lookup_time_ns, &self.lookups_performed)
    }

    /// Calculate average insert time in nanoseconds
    pub fn avg_insert_time_ns(&self) -> u64 {
        average(&self.insert_time_ns, &self.elements_inserted)
    }

    /// Ratio of positive lookups to total lookups
    ///
    /// Includes both true and false positives.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.lookups_performed.load(Ordering::Relaxed);
        let positive = self.lookups_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.filters_created.store(0, Ordering::Relaxed);
        self.elements_inserted.store(0, Ordering::Relaxed);
        self.lookups_performed.store(0, Ordering::Relaxed);
        self.lookups_positive.store(0, Ordering::Relaxed);
        self.filters_merged.store(0, Ordering::Relaxed);
        self.bytes_allocated.store(0, Ordering::Relaxed);
        self.lookup_time_ns.store(0, Ordering::Relaxed);
        self.insert_time_ns.store(0, Ordering::Relaxed);
    }
}

fn average(total: &AtomicU64, count: &AtomicU64) -> u64 {
    let total = total.load(Ordering::Relaxed);
    let count = count.load(Ordering::Relaxed);
    if count > 0 {
        total / count
    } else {
        0
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub filters_created: u64,
    pub elements_inserted: u64,
    pub lookups_performed: u64,
    pub lookups_positive: u64,
    pub filters_merged: u64,
    pub bytes_allocated: u64,
    pub avg_lookup_ns: u64,
    pub avg_insert_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to forward filter activity to an external metrics
/// system.
pub trait MetricsRecorder: Send + Sync {
    /// Whether per-operation timings are wanted
    ///
    /// When false, `add`/`test` skip the clock and the insert/lookup hooks.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Record filter creation
    fn record_filter_created(&self, size_bits: u64, hash_count: u64, capacity: u64);

    /// Record element insertion
    fn record_insert(&self, duration: Duration);

    /// Record lookup operation
    fn record_lookup(&self, duration: Duration, found: bool);

    /// Record a successful union
    fn record_merge(&self);

    /// Record filter deallocation
    fn record_filter_freed(&self, size_bits: u64);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Debug, Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn is_enabled(&self) -> bool {
        false
    }
    fn record_filter_created(&self, _: u64, _: u64, _: u64) {}
    fn record_insert(&self, _: Duration) {}
    fn record_lookup(&self, _: Duration, _: bool) {}
    fn record_merge(&self) {}
    fn record_filter_freed(&self, _: u64) {}
}

/// Bytes backing a filter of `size_bits` (whole 64-bit words)
fn allocated_bytes(size_bits: u64) -> u64 {
    size_bits.div_ceil(64) * 8
}

impl MetricsRecorder for Metrics {
    fn record_filter_created(&self, size_bits: u64, _hash_count: u64, _capacity: u64) {
        self.filters_created.fetch_add(1, Ordering::Relaxed);
        self.bytes_allocated
            .fetch_add(allocated_bytes(size_bits), Ordering::Relaxed);
    }

    fn record_insert(&self, duration: Duration) {
        self.elements_inserted.fetch_add(1, Ordering::Relaxed);
        self.insert_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    fn record_lookup(&self, duration: Duration, found: bool) {
        self.lookups_performed.fetch_add(1, Ordering::Relaxed);
        self.lookup_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_merge(&self) {
        self.filters_merged.fetch_add(1, Ordering::Relaxed);
    }

    fn record_filter_freed(&self, size_bits: u64) {
        self.bytes_allocated
            .fetch_sub(allocated_bytes(size_bits), Ordering::Relaxed);
    }
}
