//! Error types for the certificate ledger core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::CertificateId;

/// Core errors raised while building certificates and blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("completion date {completion} precedes issue date {issue}")]
    CompletionBeforeIssue { issue: String, completion: String },

    #[error("malformed field {field}: {reason}")]
    MalformedField { field: &'static str, reason: String },
}

/// A fault found while walking the block chain.
///
/// Every variant carries the index of the first offending block.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ChainFault {
    #[error("broken chain at block {index}")]
    BrokenChain { index: u64 },

    #[error("invalid block hash at block {index}")]
    InvalidBlockHash { index: u64 },

    #[error("certificate {certificate_id} committed twice (again at block {index})")]
    DuplicateCommit {
        index: u64,
        #[serde(rename = "certificateId")]
        certificate_id: CertificateId,
    },

    #[error("block {index} commits unknown certificate {certificate_id}")]
    UnknownCommit {
        index: u64,
        #[serde(rename = "certificateId")]
        certificate_id: CertificateId,
    },
}

impl ChainFault {
    /// The index of the block where the fault was detected.
    pub fn index(&self) -> u64 {
        match self {
            ChainFault::BrokenChain { index }
            | ChainFault::InvalidBlockHash { index }
            | ChainFault::DuplicateCommit { index, .. }
            | ChainFault::UnknownCommit { index, .. } => *index,
        }
    }
}
