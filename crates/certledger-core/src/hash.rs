//! Fingerprint hashing.
//!
//! Wraps the ledger's digest functions behind one trait so that the rolling
//! hash and Blake3 are interchangeable without touching callers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Fingerprint;

/// A deterministic string digest.
///
/// Same input, same output. Implementations render their output as lowercase hex.
pub trait FingerprintHasher: Send + Sync {
    /// Compute the fingerprint of `input`.
    fn fingerprint(&self, input: &str) -> Fingerprint;
}

/// The 32-bit polynomial rolling hash.
///
/// `acc = (acc << 5) - acc + c` per character with wrapping `i32`
/// arithmetic, rendered as `|acc|` in hex. Characters are Unicode scalar
/// values. Not collision resistant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollingHash;

impl RollingHash {
    /// Compute the raw 32-bit magnitude.
    pub fn digest(input: &str) -> u32 {
        let mut acc: i32 = 0;
        for c in input.chars() {
            acc = acc
                .wrapping_shl(5)
                .wrapping_sub(acc)
                .wrapping_add(c as i32);
        }
        acc.unsigned_abs()
    }
}

impl FingerprintHasher for RollingHash {
    fn fingerprint(&self, input: &str) -> Fingerprint {
        Fingerprint(format!("{:x}", Self::digest(input)))
    }
}

/// Blake3 over the UTF-8 bytes of the input, 64 hex chars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Hasher;

impl FingerprintHasher for Blake3Hasher {
    fn fingerprint(&self, input: &str) -> Fingerprint {
        Fingerprint(hex::encode(blake3::hash(input.as_bytes()).as_bytes()))
    }
}

/// Selects the fingerprint implementation used by a store and ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// [`RollingHash`]: compatible with existing stored fingerprints.
    #[default]
    Rolling,
    /// [`Blake3Hasher`].
    Blake3,
}

impl HashAlgorithm {
    /// The selected implementation as a trait object.
    pub fn hasher(self) -> Box<dyn FingerprintHasher> {
        match self {
            HashAlgorithm::Rolling => Box::new(RollingHash),
            HashAlgorithm::Blake3 => Box::new(Blake3Hasher),
        }
    }
}

impl FingerprintHasher for HashAlgorithm {
    fn fingerprint(&self, input: &str) -> Fingerprint {
        match self {
            HashAlgorithm::Rolling => RollingHash.fingerprint(input),
            HashAlgorithm::Blake3 => Blake3Hasher.fingerprint(input),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Rolling => f.write_str("rolling"),
            HashAlgorithm::Blake3 => f.write_str("blake3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rolling_known_values() {
        assert_eq!(RollingHash.fingerprint("").as_str(), "0");
        assert_eq!(RollingHash.fingerprint("a").as_str(), "61");
        assert_eq!(RollingHash.fingerprint("hello").as_str(), "5e918d2");
        assert_eq!(RollingHash.fingerprint("block_0_0").as_str(), "3404a52f");
    }

    #[test]
    fn test_rolling_non_ascii() {
        assert_eq!(RollingHash.fingerprint("héllo").as_str(), "62519ce");
    }

    #[test]
    fn test_rolling_min_value_magnitude() {
        // i32::MIN has no positive counterpart; the magnitude is still rendered.
        assert_eq!(format!("{:x}", i32::MIN.unsigned_abs()), "80000000");
    }

    #[test]
    fn test_blake3_fingerprint() {
        let fp = Blake3Hasher.fingerprint("hello");
        assert_eq!(fp.as_str().len(), 64);
        assert_eq!(fp, Blake3Hasher.fingerprint("hello"));
        assert_ne!(fp, Blake3Hasher.fingerprint("hellp"));
    }

    #[test]
    fn test_algorithm_dispatch() {
        assert_eq!(
            HashAlgorithm::Rolling.fingerprint("hello"),
            RollingHash.fingerprint("hello")
        );
        assert_eq!(
            HashAlgorithm::Blake3.fingerprint("hello"),
            Blake3Hasher.fingerprint("hello")
        );
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Rolling);
        assert_eq!(
            HashAlgorithm::Blake3.hasher().fingerprint("hello"),
            Blake3Hasher.fingerprint("hello")
        );
    }

    #[test]
    fn test_algorithm_serde_names() {
        assert_eq!(serde_json::to_string(&HashAlgorithm::Blake3).unwrap(), "\"blake3\"");
        let parsed: HashAlgorithm = serde_json::from_str("\"rolling\"").unwrap();
        assert_eq!(parsed, HashAlgorithm::Rolling);
    }

    proptest! {
        #[test]
        fn test_rolling_deterministic(input in ".*") {
            prop_assert_eq!(RollingHash.fingerprint(&input), RollingHash.fingerprint(&input));
        }

        #[test]
        fn test_rolling_is_lower_hex(input in ".*") {
            let fp = RollingHash.fingerprint(&input);
            prop_assert!(!fp.is_empty());
            prop_assert!(fp.as_str().len() <= 8);
            prop_assert!(fp.as_str().chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }
}
