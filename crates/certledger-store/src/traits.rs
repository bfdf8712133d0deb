//! CertificateStore trait: the abstract interface for certificate ownership.
//!
//! This trait keeps the ledger storage-agnostic. The in-memory store is the
//! reference implementation; adapters may back it with files or a database.

use certledger_core::{
    Certificate, CertificateData, CertificateId, Fingerprint, HashAlgorithm, Institution,
    InstitutionId,
};

use crate::error::Result;
use crate::search::{scan, SearchFilter};

/// Default number of id generation attempts before giving up.
pub const DEFAULT_MAX_ID_ATTEMPTS: u32 = 5;

/// The CertificateStore trait: owner of institutions and certificates.
///
/// # Design Notes
///
/// - **Single writer**: mutating methods take `&mut self`; callers that share
///   a store across tasks wrap it in one lock.
/// - **Insertion order**: [`list_all`](Self::list_all) and
///   [`search`](Self::search) yield certificates in the order they entered.
/// - **Immutable records**: nothing here edits a stored certificate.
pub trait CertificateStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Institutions
    // ─────────────────────────────────────────────────────────────────────────

    /// Register an institution.
    ///
    /// Fails with `DuplicateInstitution` if the id is taken.
    fn register_institution(&mut self, institution: Institution) -> Result<()>;

    /// Look up an institution.
    fn institution(&self, id: &InstitutionId) -> Option<&Institution>;

    /// All institutions in registration order.
    fn institutions(&self) -> impl Iterator<Item = &Institution> + '_;

    /// Number of institutions currently allowed to issue.
    fn active_institution_count(&self) -> usize {
        self.institutions().filter(|i| i.is_active()).count()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Certificates
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue a new certificate.
    ///
    /// # Arguments
    /// - `data`: The caller-supplied fields.
    /// - `now`: The current time (Unix ms), used for `created_at`.
    ///
    /// # Errors
    /// - `UnknownInstitution` / `InstitutionSuspended` for the issuer.
    /// - `InvalidCertificateData` for blank names or inverted dates.
    /// - `IdGenerationExhausted` when every generated id collided.
    fn issue_certificate(&mut self, data: CertificateData, now: i64) -> Result<Certificate>;

    /// Insert an already-issued certificate as-is.
    ///
    /// The id and integrity hash are kept verbatim. Used for seed data and
    /// records rebuilt by an external adapter.
    fn restore_certificate(&mut self, certificate: Certificate) -> Result<()>;

    /// Get a certificate by id, or `NotFound`.
    fn get_by_id(&self, id: &CertificateId) -> Result<&Certificate>;

    /// First certificate (in insertion order) carrying this integrity hash.
    fn find_by_integrity_hash(&self, hash: &Fingerprint) -> Option<&Certificate> {
        self.list_all().find(|c| &c.integrity_hash == hash)
    }

    /// All certificates in insertion order.
    ///
    /// Lazy and restartable: each call starts a fresh pass.
    fn list_all(&self) -> impl Iterator<Item = &Certificate> + '_;

    /// Number of certificates.
    fn len(&self) -> usize;

    /// Check if the store holds no certificates.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Certificates matching `filter`, in insertion order.
    fn search(&self, filter: &SearchFilter) -> Vec<&Certificate> {
        scan(self.list_all(), filter)
    }

    /// The fingerprint algorithm used for integrity hashes.
    fn hash_algorithm(&self) -> HashAlgorithm;
}
