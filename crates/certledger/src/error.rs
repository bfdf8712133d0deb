//! Error types for the engine.

use certledger_core::{CertificateId, ChainFault, Fingerprint, HashAlgorithm};
use certledger_store::StoreError;
use thiserror::Error;

/// Errors that can occur during engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Store error (institutions, issuance, lookups).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The block chain failed validation.
    #[error("chain fault: {0}")]
    Chain(#[from] ChainFault),

    /// Genesis was requested on a ledger that already has blocks.
    #[error("ledger already initialized")]
    AlreadyInitialized,

    /// Every issued certificate is already committed.
    #[error("no pending certificates")]
    NoPendingCertificates,

    /// A batch must hold at least one certificate.
    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    /// The record lies beyond the bulk issuance limit.
    #[error("bulk issuance limit of {limit} records exceeded")]
    BulkLimitExceeded { limit: usize },

    /// No certificate matches the lookup.
    #[error("certificate not found: {0}")]
    NotFound(String),

    /// The seed was fingerprinted with a different algorithm.
    #[error("seed fingerprinted with {seed}, engine configured for {configured}")]
    SeedHashMismatch {
        seed: HashAlgorithm,
        configured: HashAlgorithm,
    },

    /// The stored record carries an empty integrity hash.
    #[error("certificate {0} has an empty integrity hash")]
    InvalidCertificateData(CertificateId),

    /// The stored fields no longer match the integrity hash recorded at issue.
    #[error("certificate {id} was altered after issue: recorded {recorded}, computed {computed}")]
    TamperedRecord {
        id: CertificateId,
        recorded: Fingerprint,
        computed: Fingerprint,
    },
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
