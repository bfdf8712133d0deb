//! Block: a batch of certificate ids linked to its predecessor by hash.
//!
//! Blocks are built only by the ledger and never edited after they are
//! appended.

use serde::{Deserialize, Serialize};

use crate::hash::FingerprintHasher;
use crate::types::{CertificateId, Fingerprint};

/// The `previousHash` carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// A ledger block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Position in the chain (0-based, contiguous).
    pub index: u64,

    /// Creation time (Unix milliseconds).
    pub timestamp: i64,

    /// Hash of the previous block, `"0"` for genesis.
    pub previous_hash: Fingerprint,

    /// This block's hash.
    pub hash: Fingerprint,

    /// Certificates committed by this block, in selection order.
    pub certificate_ids: Vec<CertificateId>,

    /// Arbitrary value kept for format compatibility. No proof-of-work.
    pub nonce: u64,
}

impl Block {
    /// Compute the hash a block at `index` created at `timestamp` must carry.
    pub fn compute_hash(index: u64, timestamp: i64, hasher: &impl FingerprintHasher) -> Fingerprint {
        hasher.fingerprint(&format!("block_{}_{}", index, timestamp))
    }

    /// Build the genesis block with a computed hash.
    pub fn genesis(timestamp: i64, hasher: &impl FingerprintHasher) -> Self {
        Self::genesis_with_hash(timestamp, Self::compute_hash(0, timestamp, hasher))
    }

    /// Build the genesis block with a caller-supplied hash.
    pub fn genesis_with_hash(timestamp: i64, hash: Fingerprint) -> Self {
        Self {
            index: 0,
            timestamp,
            previous_hash: Fingerprint::from(GENESIS_PREVIOUS_HASH),
            hash,
            certificate_ids: Vec::new(),
            nonce: 0,
        }
    }

    /// Build the block that follows `previous`.
    pub fn next(
        previous: &Block,
        timestamp: i64,
        certificate_ids: Vec<CertificateId>,
        nonce: u64,
        hasher: &impl FingerprintHasher,
    ) -> Self {
        Self::linked(previous.index + 1, previous, timestamp, certificate_ids, nonce, hasher)
    }

    /// Build the block at position `index`, linked to `previous`.
    ///
    /// The ledger appends with `index` set to its current length, so a
    /// restored chain with gaps still gets a positional index.
    pub fn linked(
        index: u64,
        previous: &Block,
        timestamp: i64,
        certificate_ids: Vec<CertificateId>,
        nonce: u64,
        hasher: &impl FingerprintHasher,
    ) -> Self {
        Self {
            index,
            timestamp,
            previous_hash: previous.hash.clone(),
            hash: Self::compute_hash(index, timestamp, hasher),
            certificate_ids,
            nonce,
        }
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Check if this block commits the given certificate.
    pub fn contains(&self, id: &CertificateId) -> bool {
        self.certificate_ids.contains(id)
    }

    /// Number of certificates committed by this block.
    pub fn len(&self) -> usize {
        self.certificate_ids.len()
    }

    /// Check if the block commits no certificates.
    pub fn is_empty(&self) -> bool {
        self.certificate_ids.is_empty()
    }
}
