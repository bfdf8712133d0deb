//! Chain validation: linkage and hash checks over a block sequence.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::block::{Block, GENESIS_PREVIOUS_HASH};
use crate::error::ChainFault;
use crate::hash::FingerprintHasher;
use crate::types::CertificateId;

/// Walk `blocks` in order and return the first fault found.
///
/// Per block, in order:
/// 1. `index` equals the block's position
/// 2. `previous_hash` is `"0"` for genesis, the predecessor's hash otherwise
/// 3. `hash` is non-empty
/// 4. `hash` matches the recomputed `block_<index>_<timestamp>` digest
///    (skipped for genesis, whose hash may be caller-supplied)
/// 5. no certificate id already appeared in an earlier block
///
/// Pure and linear in the number of committed ids. An empty slice is valid.
pub fn validate_chain(blocks: &[Block], hasher: &impl FingerprintHasher) -> Result<(), ChainFault> {
    validate_chain_with(blocks, hasher, |_| true)
}

/// [`validate_chain`], additionally requiring `is_issued` to accept every
/// committed id.
///
/// Checked per block after the duplicate check, so the first fault by
/// block index is reported whichever kind it is.
pub fn validate_chain_with(
    blocks: &[Block],
    hasher: &impl FingerprintHasher,
    is_issued: impl Fn(&CertificateId) -> bool,
) -> Result<(), ChainFault> {
    let mut committed = HashSet::new();

    for (position, block) in blocks.iter().enumerate() {
        let index = position as u64;

        if block.index != index {
            return Err(ChainFault::BrokenChain { index });
        }

        let linked = match position {
            0 => block.previous_hash.as_str() == GENESIS_PREVIOUS_HASH,
            _ => block.previous_hash == blocks[position - 1].hash,
        };
        if !linked {
            return Err(ChainFault::BrokenChain { index });
        }

        if block.hash.is_empty() {
            return Err(ChainFault::InvalidBlockHash { index });
        }

        if position > 0 && block.hash != Block::compute_hash(block.index, block.timestamp, hasher) {
            return Err(ChainFault::InvalidBlockHash { index });
        }

        for id in &block.certificate_ids {
            if !committed.insert(id) {
                return Err(ChainFault::DuplicateCommit {
                    index,
                    certificate_id: id.clone(),
                });
            }
            if !is_issued(id) {
                return Err(ChainFault::UnknownCommit {
                    index,
                    certificate_id: id.clone(),
                });
            }
        }
    }

    Ok(())
}

/// The outcome of validating a chain, in the shape handed to adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainReport {
    pub is_valid: bool,
    pub failing_index: Option<u64>,
    pub reason: Option<String>,
}

impl ChainReport {
    /// A report for a valid chain.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            failing_index: None,
            reason: None,
        }
    }

    /// Validate `blocks` and summarize the result.
    pub fn check(blocks: &[Block], hasher: &impl FingerprintHasher) -> Self {
        Self::from(validate_chain(blocks, hasher))
    }
}

impl From<Result<(), ChainFault>> for ChainReport {
    fn from(result: Result<(), ChainFault>) -> Self {
        match result {
            Ok(()) => Self::valid(),
            Err(fault) => Self {
                is_valid: false,
                failing_index: Some(fault.index()),
                reason: Some(fault.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{HashAlgorithm, RollingHash};
    use crate::types::{CertificateId, Fingerprint};

    fn ids(names: &[&str]) -> Vec<CertificateId> {
        names.iter().map(|n| CertificateId::new(*n)).collect()
    }

    fn make_chain(len: usize) -> Vec<Block> {
        let mut blocks = vec![Block::genesis(1_000, &RollingHash)];
        for i in 1..len {
            let ts = 1_000 + i as i64;
            let next = Block::next(
                blocks.last().unwrap(),
                ts,
                ids(&[&format!("CERT-A-{i}")]),
                i as u64,
                &RollingHash,
            );
            blocks.push(next);
        }
        blocks
    }

    #[test]
    fn test_empty_chain_is_valid() {
        assert_eq!(validate_chain(&[], &RollingHash), Ok(()));
    }

    #[test]
    fn test_well_formed_chain_is_valid() {
        let blocks = make_chain(5);
        assert_eq!(validate_chain(&blocks, &RollingHash), Ok(()));
        assert_eq!(ChainReport::check(&blocks, &RollingHash), ChainReport::valid());
    }

    #[test]
    fn test_tampered_previous_hash() {
        let mut blocks = make_chain(5);
        blocks[3].previous_hash = Fingerprint::from("deadbeef");

        assert_eq!(
            validate_chain(&blocks, &RollingHash),
            Err(ChainFault::BrokenChain { index: 3 })
        );
    }

    #[test]
    fn test_tampered_hash_is_caught_at_the_block() {
        let mut blocks = make_chain(5);
        blocks[2].hash = Fingerprint::from("deadbeef");

        assert_eq!(
            validate_chain(&blocks, &RollingHash),
            Err(ChainFault::InvalidBlockHash { index: 2 })
        );
    }

    #[test]
    fn test_tampered_genesis_hash_breaks_successor() {
        let mut blocks = make_chain(3);
        blocks[0].hash = Fingerprint::from("deadbeef");

        assert_eq!(
            validate_chain(&blocks, &RollingHash),
            Err(ChainFault::BrokenChain { index: 1 })
        );
    }

    #[test]
    fn test_genesis_previous_hash_must_be_zero() {
        let mut blocks = make_chain(2);
        blocks[0].previous_hash = Fingerprint::from("1");

        assert_eq!(
            validate_chain(&blocks, &RollingHash),
            Err(ChainFault::BrokenChain { index: 0 })
        );
    }

    #[test]
    fn test_empty_hash() {
        let mut blocks = make_chain(3);
        blocks[2].hash = Fingerprint::empty();

        assert_eq!(
            validate_chain(&blocks, &RollingHash),
            Err(ChainFault::InvalidBlockHash { index: 2 })
        );
    }

    #[test]
    fn test_reordered_blocks() {
        let mut blocks = make_chain(4);
        blocks.swap(1, 2);

        assert_eq!(
            validate_chain(&blocks, &RollingHash),
            Err(ChainFault::BrokenChain { index: 1 })
        );
    }

    #[test]
    fn test_duplicate_commit() {
        let genesis = Block::genesis(0, &RollingHash);
        let b1 = Block::next(&genesis, 1, ids(&["CERT-A-1", "CERT-A-2"]), 0, &RollingHash);
        let b2 = Block::next(&b1, 2, ids(&["CERT-A-3", "CERT-A-1"]), 0, &RollingHash);

        assert_eq!(
            validate_chain(&[genesis, b1, b2], &RollingHash),
            Err(ChainFault::DuplicateCommit {
                index: 2,
                certificate_id: CertificateId::new("CERT-A-1"),
            })
        );
    }

    #[test]
    fn test_unknown_commit() {
        let blocks = make_chain(4);
        let issued = ids(&["CERT-A-1", "CERT-A-3"]);
        let known = |id: &CertificateId| issued.contains(id);

        assert_eq!(
            validate_chain_with(&blocks, &RollingHash, known),
            Err(ChainFault::UnknownCommit {
                index: 2,
                certificate_id: CertificateId::new("CERT-A-2"),
            })
        );
        assert_eq!(validate_chain(&blocks, &RollingHash), Ok(()));
    }

    #[test]
    fn test_earliest_fault_wins_across_kinds() {
        let mut blocks = make_chain(4);
        blocks[3].previous_hash = Fingerprint::from("deadbeef");

        assert_eq!(
            validate_chain_with(&blocks, &RollingHash, |id| id.as_str() != "CERT-A-1"),
            Err(ChainFault::UnknownCommit {
                index: 1,
                certificate_id: CertificateId::new("CERT-A-1"),
            })
        );
    }

    #[test]
    fn test_chain_built_with_other_algorithm_fails_recompute() {
        let blocks = make_chain(2);
        assert_eq!(
            validate_chain(&blocks, &HashAlgorithm::Blake3),
            Err(ChainFault::InvalidBlockHash { index: 1 })
        );
    }

    #[test]
    fn test_report_from_fault() {
        let report = ChainReport::from(Err(ChainFault::BrokenChain { index: 4 }));
        assert!(!report.is_valid);
        assert_eq!(report.failing_index, Some(4));
        assert_eq!(report.reason.as_deref(), Some("broken chain at block 4"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["failingIndex"], 4);
    }
}
