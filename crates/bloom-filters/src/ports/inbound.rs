//! Inbound Ports (Driving Ports)
//!
//! The API that external components use to record and query membership,
//! independent of the concrete filter behind it.

use crate::domain::BloomFilter;
use crate::error::FilterError;

/// Probabilistic set membership (Driving Port)
///
/// `test` may return false positives but never false negatives.
pub trait MembershipFilter: Send + Sync {
    /// Add a value to the filter
    fn add(&self, value: &[u8]) -> Result<(), FilterError>;

    /// Test if a value may be in the filter
    fn test(&self, value: &[u8]) -> Result<bool, FilterError>;

    /// Add every value, stopping at the first error
    fn add_all<'a, I>(&self, values: I) -> Result<(), FilterError>
    where
        I: IntoIterator<Item = &'a [u8]>,
        Self: Sized,
    {
        values.into_iter().try_for_each(|value| self.add(value))
    }
}

impl MembershipFilter for BloomFilter {
    fn add(&self, value: &[u8]) -> Result<(), FilterError> {
        BloomFilter::add(self, value)
    }

    fn test(&self, value: &[u8]) -> Result<bool, FilterError> {
        BloomFilter::test(self, value)
    }
}
