//! Error types for the store module.

use certledger_core::{CertificateId, CoreError, InstitutionId};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An institution with this id is already registered.
    #[error("institution already registered: {0}")]
    DuplicateInstitution(InstitutionId),

    /// The referenced institution is not registered.
    #[error("unknown institution: {0}")]
    UnknownInstitution(InstitutionId),

    /// The referenced institution is suspended and may not issue.
    #[error("institution is suspended: {0}")]
    InstitutionSuspended(InstitutionId),

    /// Required certificate data is missing or malformed.
    #[error("invalid certificate data: {0}")]
    InvalidCertificateData(#[from] CoreError),

    /// Every generated id collided with an existing certificate.
    #[error("could not generate a unique certificate id after {attempts} attempts")]
    IdGenerationExhausted { attempts: u32 },

    /// Certificate not found.
    #[error("certificate not found: {0}")]
    NotFound(CertificateId),

    /// A restored certificate reuses an existing id.
    #[error("certificate already exists: {0}")]
    DuplicateCertificate(CertificateId),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
