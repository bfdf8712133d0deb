//! # Certificate Ledger Core
//!
//! Pure primitives for the certificate ledger: institutions, certificates,
//! blocks, fingerprints, and chain validation.
//!
//! This crate contains no I/O, no storage, no locking. It is pure computation
//! over the ledger's data structures.
//!
//! ## Key Types
//!
//! - [`Certificate`] - An issued credential with its integrity fingerprint
//! - [`Block`] - A batch of certificate ids linked to its predecessor by hash
//! - [`Fingerprint`] - Hex digest produced by a [`FingerprintHasher`]
//! - [`CertificateId`] / [`InstitutionId`] - Strongly typed identifiers
//!
//! ## Fingerprints
//!
//! The default [`RollingHash`] is a 32-bit polynomial rolling hash kept
//! bit-for-bit compatible with previously stored fingerprints. It detects
//! accidental corruption and reordering, not forgery. [`Blake3Hasher`] can
//! be selected through [`HashAlgorithm`] where a cryptographic digest is
//! wanted.

pub mod block;
pub mod certificate;
pub mod clock;
pub mod error;
pub mod hash;
pub mod institution;
pub mod types;
pub mod validation;

pub use block::{Block, GENESIS_PREVIOUS_HASH};
pub use certificate::{Certificate, CertificateData, DEFAULT_CERTIFICATE_TYPE};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ChainFault, CoreError};
pub use hash::{Blake3Hasher, FingerprintHasher, HashAlgorithm, RollingHash};
pub use institution::{Institution, InstitutionStatus};
pub use types::{CertificateId, Fingerprint, InstitutionId};
pub use validation::{validate_chain, validate_chain_with, ChainReport};
