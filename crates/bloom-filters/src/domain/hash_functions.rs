//! Hash strategies for Bloom filter
//!
//! Every strategy produces a pair of 64-bit hashes `(h1, h2)` per element and
//! derives the k round projections by double hashing:
//!
//! ```text
//! h(i) = h1 + i * (h2 | 1)   (wrapping, 64-bit)
//! ```
//!
//! Only one or two hash evaluations are needed per operation. The step is
//! forced odd so rounds never collapse, even when `h2` is zero. All built-in algorithms use fixed keys
//! and seeds, so projections are stable across process restarts.

use std::fmt;
use std::hash::Hasher;
use std::io::Cursor;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use siphasher::sip128::{Hasher128, SipHasher24};
use xxhash_rust::xxh64::xxh64;

use crate::error::FilterError;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
/// Offset basis for the second FNV pass (basis XOR the 64-bit golden ratio)
const FNV_SECOND_BASIS: u64 = FNV_OFFSET_BASIS ^ 0x9e37_79b9_7f4a_7c15;

/// Two base hashes of one element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashPair {
    pub h1: u64,
    pub h2: u64,
}

impl HashPair {
    /// Projection for hash round `round`
    #[inline]
    pub fn project(&self, round: u64) -> u64 {
        self.h1.wrapping_add(round.wrapping_mul(self.h2 | 1))
    }

    /// Bit positions for rounds `0..k` in a filter of `m` bits
    ///
    /// The position is the single reduction `project(i) % m`; callers derive
    /// word and bit offset from it.
    pub fn positions(self, k: u64, m: u64) -> impl Iterator<Item = u64> {
        (0..k).map(move |round| self.project(round) % m)
    }
}

/// Pluggable hashing capability used by [`BloomFilter`](super::BloomFilter).
///
/// Implementations must be deterministic: the same bytes always yield the
/// same pair, across calls, threads and process restarts.
///
/// The filter asks for bit positions through [`positions`](Self::positions).
/// Its default evaluates [`project`](Self::project) once per round, so a
/// strategy built from a family of independent hashes only overrides
/// `project`. Double-hashing strategies override `positions` to evaluate
/// `hash_pair` once for all rounds.
pub trait HashStrategy: Send + Sync + fmt::Debug {
    /// Stable name used in configuration and diagnostics
    fn name(&self) -> &str;

    /// Compute the base hash pair for an element
    fn hash_pair(&self, element: &[u8]) -> Result<HashPair, FilterError>;

    /// Projection of `element` for hash round `round`
    fn project(&self, element: &[u8], round: u64) -> Result<u64, FilterError> {
        Ok(self.hash_pair(element)?.project(round))
    }

    /// Bit positions of `element` for rounds `0..k` in a filter of `m` bits
    fn positions(&self, element: &[u8], k: u64, m: u64) -> Result<Vec<u64>, FilterError> {
        (0..k)
            .map(|round| self.project(element, round).map(|hash| hash % m))
            .collect()
    }
}

/// Positions from a single `hash_pair` evaluation
#[inline]
fn double_hashed<S: HashStrategy + ?Sized>(
    strategy: &S,
    element: &[u8],
    k: u64,
    m: u64,
) -> Result<Vec<u64>, FilterError> {
    Ok(strategy.hash_pair(element)?.positions(k, m).collect())
}

/// SipHash-2-4 (128-bit output) with an all-zero key
#[derive(Clone, Copy, Debug, Default)]
pub struct SipHash;

impl HashStrategy for SipHash {
    fn name(&self) -> &str {
        HasherKind::SipHash.name()
    }

    fn hash_pair(&self, element: &[u8]) -> Result<HashPair, FilterError> {
        let mut hasher = SipHasher24::new_with_keys(0, 0);
        hasher.write(element);
        let hash = hasher.finish128();
        Ok(HashPair {
            h1: hash.h1,
            h2: hash.h2,
        })
    }

    fn positions(&self, element: &[u8], k: u64, m: u64) -> Result<Vec<u64>, FilterError> {
        double_hashed(self, element, k, m)
    }
}

/// MurmurHash3 x64_128 with seed 0
#[derive(Clone, Copy, Debug, Default)]
pub struct Murmur3;

impl HashStrategy for Murmur3 {
    fn name(&self) -> &str {
        HasherKind::Murmur3.name()
    }

    fn hash_pair(&self, element: &[u8]) -> Result<HashPair, FilterError> {
        let mut cursor = Cursor::new(element);
        let hash = murmur3::murmur3_x64_128(&mut cursor, 0)
            .map_err(|e| FilterError::HashFailure(e.to_string()))?;
        Ok(HashPair {
            h1: hash as u64,
            h2: (hash >> 64) as u64,
        })
    }

    fn positions(&self, element: &[u8], k: u64, m: u64) -> Result<Vec<u64>, FilterError> {
        double_hashed(self, element, k, m)
    }
}

/// FNV-1a 64, evaluated twice from distinct offset bases
#[derive(Clone, Copy, Debug, Default)]
pub struct Fnv1a;

impl Fnv1a {
    #[inline]
    fn hash_with_basis(basis: u64, element: &[u8]) -> u64 {
        element.iter().fold(basis, |hash, &byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
    }
}

impl HashStrategy for Fnv1a {
    fn name(&self) -> &str {
        HasherKind::Fnv1a.name()
    }

    fn hash_pair(&self, element: &[u8]) -> Result<HashPair, FilterError> {
        Ok(HashPair {
            h1: Self::hash_with_basis(FNV_OFFSET_BASIS, element),
            h2: Self::hash_with_basis(FNV_SECOND_BASIS, element),
        })
    }

    fn positions(&self, element: &[u8], k: u64, m: u64) -> Result<Vec<u64>, FilterError> {
        double_hashed(self, element, k, m)
    }
}

/// XXH64 with seeds 0 and 1
#[derive(Clone, Copy, Debug, Default)]
pub struct XxHash;

impl HashStrategy for XxHash {
    fn name(&self) -> &str {
        HasherKind::XxHash.name()
    }

    fn hash_pair(&self, element: &[u8]) -> Result<HashPair, FilterError> {
        Ok(HashPair {
            h1: xxh64(element, 0),
            h2: xxh64(element, 1),
        })
    }

    fn positions(&self, element: &[u8], k: u64, m: u64) -> Result<Vec<u64>, FilterError> {
        double_hashed(self, element, k, m)
    }
}

/// Built-in hash algorithms, selectable by name from configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HasherKind {
    /// Keyed SipHash-2-4 with a fixed zero key
    SipHash,
    /// MurmurHash3 x64_128
    Murmur3,
    /// FNV-1a 64
    Fnv1a,
    /// XXH64
    #[default]
    XxHash,
}

impl HasherKind {
    /// All built-in algorithms
    pub const ALL: [HasherKind; 4] = [
        HasherKind::SipHash,
        HasherKind::Murmur3,
        HasherKind::Fnv1a,
        HasherKind::XxHash,
    ];

    /// Stable algorithm name
    pub fn name(&self) -> &'static str {
        match self {
            HasherKind::SipHash => "siphash",
            HasherKind::Murmur3 => "murmur3",
            HasherKind::Fnv1a => "fnv1a",
            HasherKind::XxHash => "xxhash",
        }
    }
}

impl HashStrategy for HasherKind {
    fn name(&self) -> &str {
        HasherKind::name(self)
    }

    fn hash_pair(&self, element: &[u8]) -> Result<HashPair, FilterError> {
        match self {
            HasherKind::SipHash => SipHash.hash_pair(element),
            HasherKind::Murmur3 => Murmur3.hash_pair(element),
            HasherKind::Fnv1a => Fnv1a.hash_pair(element),
            HasherKind::XxHash => XxHash.hash_pair(element),
        }
    }

    fn positions(&self, element: &[u8], k: u64, m: u64) -> Result<Vec<u64>, FilterError> {
        double_hashed(self, element, k, m)
    }
}

impl fmt::Display for HasherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HasherKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HasherKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FilterError::InvalidConfig(format!("unknown hasher: {s}")))
    }
}
