//! Certificate verification.
//!
//! Verification never mutates anything: it looks the certificate up, checks
//! its integrity hash under the configured policy, and reports whether a
//! block has committed it.

use certledger_core::{Certificate, CertificateId, Fingerprint};
use certledger_store::CertificateStore;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::ledger::Ledger;

/// How strictly [`verify`] checks a stored integrity hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerificationPolicy {
    /// Accept any non-empty integrity hash.
    WellFormed,
    /// Recompute the hash from the stored fields and require a match.
    #[default]
    Recompute,
}

/// Whether a certificate has been committed to a block yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum CommitStatus {
    /// Issued but not yet in any block.
    Pending,
    /// Committed by the block at `block_index`.
    Committed {
        #[serde(rename = "blockIndex")]
        block_index: u64,
    },
}

impl CommitStatus {
    /// Check if the certificate is in a block.
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitStatus::Committed { .. })
    }

    /// The committing block, if any.
    pub fn block_index(&self) -> Option<u64> {
        match self {
            CommitStatus::Committed { block_index } => Some(*block_index),
            CommitStatus::Pending => None,
        }
    }
}

/// A certificate that passed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedCertificate {
    pub certificate: Certificate,
    pub status: CommitStatus,
}

/// The outcome of verifying one certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "verdict")]
pub enum Verdict {
    /// Nothing matched the lookup.
    NotFound { lookup: String },
    /// The record carries an empty integrity hash.
    Invalid { certificate: Certificate },
    /// The recomputed hash disagrees with the recorded one.
    TamperedRecord {
        certificate: Certificate,
        computed: Fingerprint,
    },
    /// The certificate is genuine.
    Valid(VerifiedCertificate),
}

impl Verdict {
    /// Check if the verdict is [`Verdict::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid(_))
    }

    /// The certificate the verdict is about, if one was found.
    pub fn certificate(&self) -> Option<&Certificate> {
        match self {
            Verdict::NotFound { .. } => None,
            Verdict::Invalid { certificate } | Verdict::TamperedRecord { certificate, .. } => {
                Some(certificate)
            }
            Verdict::Valid(verified) => Some(&verified.certificate),
        }
    }

    /// Convert into a `Result`, mapping every failed verdict to an error.
    pub fn into_result(self) -> Result<VerifiedCertificate> {
        match self {
            Verdict::Valid(verified) => Ok(verified),
            Verdict::NotFound { lookup } => Err(EngineError::NotFound(lookup)),
            Verdict::Invalid { certificate } => {
                Err(EngineError::InvalidCertificateData(certificate.certificate_id))
            }
            Verdict::TamperedRecord {
                certificate,
                computed,
            } => Err(EngineError::TamperedRecord {
                id: certificate.certificate_id,
                recorded: certificate.integrity_hash,
                computed,
            }),
        }
    }
}

/// Verify the certificate with `id`.
pub fn verify<S: CertificateStore>(
    store: &S,
    ledger: &Ledger,
    id: &CertificateId,
    policy: VerificationPolicy,
) -> Verdict {
    match store.get_by_id(id) {
        Ok(certificate) => judge(store, ledger, certificate, policy),
        Err(_) => Verdict::NotFound {
            lookup: id.to_string(),
        },
    }
}

/// Verify the first certificate (in insertion order) carrying `hash`.
///
/// Backs verification links that carry only the integrity hash.
pub fn verify_by_hash<S: CertificateStore>(
    store: &S,
    ledger: &Ledger,
    hash: &Fingerprint,
    policy: VerificationPolicy,
) -> Verdict {
    if hash.is_empty() {
        return Verdict::NotFound {
            lookup: String::new(),
        };
    }
    match store.find_by_integrity_hash(hash) {
        Some(certificate) => judge(store, ledger, certificate, policy),
        None => Verdict::NotFound {
            lookup: hash.to_string(),
        },
    }
}

fn judge<S: CertificateStore>(
    store: &S,
    ledger: &Ledger,
    certificate: &Certificate,
    policy: VerificationPolicy,
) -> Verdict {
    if certificate.integrity_hash.is_empty() {
        return Verdict::Invalid {
            certificate: certificate.clone(),
        };
    }

    if policy == VerificationPolicy::Recompute {
        let computed = certificate.recompute_hash(&store.hash_algorithm());
        if computed != certificate.integrity_hash {
            return Verdict::TamperedRecord {
                certificate: certificate.clone(),
                computed,
            };
        }
    }

    let status = match ledger.block_of(&certificate.certificate_id) {
        Some(block_index) => CommitStatus::Committed { block_index },
        None => CommitStatus::Pending,
    };

    Verdict::Valid(VerifiedCertificate {
        certificate: certificate.clone(),
        status,
    })
}
