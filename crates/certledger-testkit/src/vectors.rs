//! Golden vectors for the rolling fingerprint.
//!
//! Stored fingerprints must stay readable, so these outputs never change.

use certledger_core::{FingerprintHasher, RollingHash};

/// A golden test vector.
#[derive(Debug, Clone, Copy)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Hash input.
    pub input: &'static str,
    /// Expected fingerprint (lowercase hex).
    pub expected: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty input",
            input: "",
            expected: "0",
        },
        GoldenVector {
            name: "single character",
            input: "a",
            expected: "61",
        },
        GoldenVector {
            name: "short word",
            input: "hello",
            expected: "5e918d2",
        },
        GoldenVector {
            name: "non-ascii character",
            input: "héllo",
            expected: "62519ce",
        },
        GoldenVector {
            name: "genesis literal",
            input: "genesis",
            expected: "4c6f258",
        },
        GoldenVector {
            name: "genesis block at epoch",
            input: "block_0_0",
            expected: "3404a52f",
        },
        GoldenVector {
            name: "genesis block",
            input: "block_0_1736870400000",
            expected: "58f95a63",
        },
        GoldenVector {
            name: "first block",
            input: "block_1_1700000000000",
            expected: "45b10ef6",
        },
        GoldenVector {
            name: "certificate integrity input",
            input: "CERT-INST-1-ABC123XYZJohn DoeBachelor of Computer Science",
            expected: "1bdb5476",
        },
    ]
}

/// Check every vector, returning the names of those that disagree.
pub fn verify_all_vectors() -> Vec<&'static str> {
    all_vectors()
        .into_iter()
        .filter(|v| RollingHash.fingerprint(v.input).as_str() != v.expected)
        .map(|v| v.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_hold() {
        assert!(verify_all_vectors().is_empty(), "{:?}", verify_all_vectors());
    }

    #[test]
    fn test_digest_matches_fingerprint() {
        for v in all_vectors() {
            assert_eq!(format!("{:x}", RollingHash::digest(v.input)), v.expected, "{}", v.name);
        }
    }
}
