//! Engine configuration.

use certledger_core::HashAlgorithm;
use certledger_store::DEFAULT_MAX_ID_ATTEMPTS;
use serde::{Deserialize, Serialize};

use crate::verify::VerificationPolicy;

/// Default number of certificates per block.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Default cap on records accepted by one bulk issuance.
pub const DEFAULT_MAX_BULK_RECORDS: usize = 1000;

/// Configuration for the Engine.
///
/// Deserializes from camelCase JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Batch size used by [`Engine::create_default_block`](crate::Engine::create_default_block).
    pub default_batch_size: usize,
    /// Certificate id generation attempts before giving up.
    pub max_id_attempts: u32,
    /// Records accepted by one bulk issuance.
    pub max_bulk_records: usize,
    /// How strictly `verify` checks integrity hashes.
    pub verification: VerificationPolicy,
    /// Fingerprint algorithm for certificates and blocks.
    pub hash: HashAlgorithm,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_batch_size: DEFAULT_BATCH_SIZE,
            max_id_attempts: DEFAULT_MAX_ID_ATTEMPTS,
            max_bulk_records: DEFAULT_MAX_BULK_RECORDS,
            verification: VerificationPolicy::default(),
            hash: HashAlgorithm::default(),
        }
    }
}

impl EngineConfig {
    /// Set the batch size for default blocks.
    pub fn with_default_batch_size(mut self, size: usize) -> Self {
        self.default_batch_size = size;
        self
    }

    /// Set how many id collisions issuance tolerates.
    pub fn with_max_id_attempts(mut self, attempts: u32) -> Self {
        self.max_id_attempts = attempts;
        self
    }

    /// Set the bulk issuance row limit.
    pub fn with_max_bulk_records(mut self, limit: usize) -> Self {
        self.max_bulk_records = limit;
        self
    }

    /// Set the verification policy.
    pub fn with_verification(mut self, policy: VerificationPolicy) -> Self {
        self.verification = policy;
        self
    }

    /// Set the fingerprint algorithm.
    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }
}
