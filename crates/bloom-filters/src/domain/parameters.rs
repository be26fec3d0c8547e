//! Optimal Bloom filter parameter calculation
//!
//! Formulas:
//! - m = ceil(-n * ln(p) / (ln 2)^2)  -- optimal bits
//! - k = ceil(-ln(p) / ln 2)          -- hash rounds
//! - FPR = (1 - e^(-kn/m))^k          -- expected rate after n inserts
//!
//! These assume k independent, uniformly distributed projections over m bits.
//! Inputs are expected to be validated by [`BloomConfig`](super::BloomConfig).

use std::f64::consts::LN_2;

/// Bloom filter parameters
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilterParams {
    /// Number of bits in the filter (m)
    pub size_bits: u64,
    /// Number of hash rounds (k)
    pub hash_count: u64,
    /// Expected false positive rate once `capacity` elements are inserted
    pub expected_fpr: f64,
}

/// Calculate optimal Bloom filter parameters for given constraints
///
/// # Arguments
/// * `capacity` - Expected number of elements to insert (n)
/// * `target_fpr` - Target false positive rate (p)
pub fn calculate_optimal_parameters(capacity: u64, target_fpr: f64) -> BloomFilterParams {
    let size_bits = bit_array_size(capacity, target_fpr);
    let hash_count = hash_rounds(target_fpr);

    BloomFilterParams {
        size_bits,
        hash_count,
        expected_fpr: calculate_fpr(size_bits, capacity, hash_count),
    }
}

/// Minimum number of bits for `capacity` elements at `target_fpr`
pub fn bit_array_size(capacity: u64, target_fpr: f64) -> u64 {
    let m = (-(capacity as f64) * target_fpr.ln() / (LN_2 * LN_2)).ceil();
    (m as u64).max(1)
}

/// Number of hash rounds for `target_fpr`
///
/// Depends only on the rate: at the optimal bits-per-element ratio the
/// capacity cancels out of `k = (m/n) * ln 2`.
pub fn hash_rounds(target_fpr: f64) -> u64 {
    let k = (-target_fpr.ln() / LN_2).ceil();
    (k as u64).max(1)
}

/// Calculate the false positive rate for given parameters
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: u64, n: u64, k: u64) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powf(k as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity_sizing() {
        let params = calculate_optimal_parameters(100_000, 0.01);

        assert_eq!(params.size_bits, 958_506);
        assert_eq!(params.hash_count, 7);
    }

    #[test]
    fn test_hash_rounds_depend_only_on_rate() {
        assert_eq!(hash_rounds(0.01), 7);
        assert_eq!(hash_rounds(0.001), 10);
        assert_eq!(hash_rounds(0.6), 1);
        // Anything close to 1 still needs a single round
        assert_eq!(hash_rounds(0.99), 1);
    }

    #[test]
    fn test_bit_array_size_small_capacity() {
        // -ln(0.01) / ln(2)^2 = 9.585...
        assert_eq!(bit_array_size(1, 0.01), 10);
        assert_eq!(bit_array_size(10, 0.01), 96);
    }

    #[test]
    fn test_fpr_calculation() {
        // With m=1000, n=100, k=7, FPR should be around 0.008
        let fpr = calculate_fpr(1000, 100, 7);
        assert!(fpr > 0.005 && fpr < 0.02, "Expected FPR≈0.008, got {}", fpr);
    }

    #[test]
    fn test_fpr_of_empty_filter_is_zero() {
        assert_eq!(calculate_fpr(1000, 0, 7), 0.0);
        assert_eq!(calculate_fpr(0, 10, 7), 1.0);
    }

    #[test]
    fn test_expected_fpr_meets_target() {
        let target_fpr = 0.01;
        let params = calculate_optimal_parameters(10_000, target_fpr);

        // Allow 10% tolerance
        assert!(
            params.expected_fpr <= target_fpr * 1.1,
            "Expected FPR {} should be <= target {}",
            params.expected_fpr,
            target_fpr
        );
    }

    #[test]
    fn test_rounded_k_sits_just_above_target() {
        let params = calculate_optimal_parameters(100_000, 0.01);

        // ceil(6.64) = 7 rounds overshoots the optimum slightly
        assert!(params.expected_fpr > 0.01);
        assert!(params.expected_fpr < 0.0101);
    }

    #[test]
    fn test_larger_n_needs_more_bits() {
        let params1 = calculate_optimal_parameters(100, 0.01);
        let params2 = calculate_optimal_parameters(1000, 0.01);

        assert!(params2.size_bits > params1.size_bits);
        assert_eq!(params1.hash_count, params2.hash_count);
    }

    #[test]
    fn test_lower_fpr_needs_more_bits() {
        let params1 = calculate_optimal_parameters(100, 0.1);
        let params2 = calculate_optimal_parameters(100, 0.01);

        assert!(params2.size_bits > params1.size_bits);
        assert!(params2.hash_count > params1.hash_count);
    }
}
