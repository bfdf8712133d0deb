//! In-memory implementation of the CertificateStore trait.
//!
//! Everything lives in insertion-ordered vectors with hash indices on the
//! side. All data is lost when the store is dropped.

use std::collections::HashMap;

use certledger_core::{
    Certificate, CertificateData, CertificateId, HashAlgorithm, Institution, InstitutionId,
};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::search::{SearchFilter, SearchIndex};
use crate::token::{RandomTokens, TokenSource};
use crate::traits::{CertificateStore, DEFAULT_MAX_ID_ATTEMPTS};

/// In-memory store implementation.
pub struct MemoryStore {
    /// Institutions in registration order.
    institutions: Vec<Institution>,

    /// Institution id -> position in `institutions`.
    institution_index: HashMap<InstitutionId, usize>,

    /// Certificates in insertion order.
    certificates: Vec<Certificate>,

    /// Certificate id -> position in `certificates`.
    positions: HashMap<CertificateId, usize>,

    /// Secondary search indices.
    search_index: SearchIndex,

    /// Last `created_at` handed out.
    last_created_at: Option<i64>,

    hash: HashAlgorithm,
    tokens: Box<dyn TokenSource>,
    max_id_attempts: u32,
}

impl MemoryStore {
    /// Create an empty store with the rolling hash and random tokens.
    pub fn new() -> Self {
        Self {
            institutions: Vec::new(),
            institution_index: HashMap::new(),
            certificates: Vec::new(),
            positions: HashMap::new(),
            search_index: SearchIndex::new(),
            last_created_at: None,
            hash: HashAlgorithm::default(),
            tokens: Box::new(RandomTokens),
            max_id_attempts: DEFAULT_MAX_ID_ATTEMPTS,
        }
    }

    /// Use `hash` for integrity fingerprints.
    pub fn with_hash_algorithm(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    /// Draw id suffixes from `tokens`.
    pub fn with_tokens(mut self, tokens: impl TokenSource + 'static) -> Self {
        self.tokens = Box::new(tokens);
        self
    }

    /// Give up id generation after `attempts` collisions (at least one attempt is made).
    pub fn with_max_id_attempts(mut self, attempts: u32) -> Self {
        self.max_id_attempts = attempts.max(1);
        self
    }

    /// Generate an id that no stored certificate uses.
    fn generate_id(&mut self, institution: &InstitutionId) -> Result<CertificateId> {
        for attempt in 1..=self.max_id_attempts {
            let id = CertificateId::compose(institution, &self.tokens.next_token());
            if !self.positions.contains_key(&id) {
                return Ok(id);
            }
            debug!(%id, attempt, "certificate id collision, retrying");
        }

        warn!(%institution, attempts = self.max_id_attempts, "certificate id generation exhausted");
        Err(StoreError::IdGenerationExhausted {
            attempts: self.max_id_attempts,
        })
    }

    /// Next strictly increasing creation timestamp.
    fn next_created_at(&mut self, now: i64) -> i64 {
        let created_at = match self.last_created_at {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last_created_at = Some(created_at);
        created_at
    }

    fn insert(&mut self, certificate: Certificate) {
        let position = self.certificates.len();
        self.positions
            .insert(certificate.certificate_id.clone(), position);
        self.search_index.insert(position, &certificate);
        self.certificates.push(certificate);
    }

    fn require_institution(&self, id: &InstitutionId) -> Result<&Institution> {
        self.institution(id)
            .ok_or_else(|| StoreError::UnknownInstitution(id.clone()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("institutions", &self.institutions.len())
            .field("certificates", &self.certificates.len())
            .field("hash", &self.hash)
            .finish()
    }
}

impl CertificateStore for MemoryStore {
    fn register_institution(&mut self, institution: Institution) -> Result<()> {
        if self.institution_index.contains_key(&institution.id) {
            return Err(StoreError::DuplicateInstitution(institution.id));
        }

        debug!(id = %institution.id, name = %institution.name, "institution registered");
        self.institution_index
            .insert(institution.id.clone(), self.institutions.len());
        self.institutions.push(institution);
        Ok(())
    }

    fn institution(&self, id: &InstitutionId) -> Option<&Institution> {
        self.institution_index
            .get(id)
            .and_then(|&p| self.institutions.get(p))
    }

    fn institutions(&self) -> impl Iterator<Item = &Institution> + '_ {
        self.institutions.iter()
    }

    fn issue_certificate(&mut self, data: CertificateData, now: i64) -> Result<Certificate> {
        let issuer = self.require_institution(&data.institution_id)?;
        if !issuer.is_active() {
            return Err(StoreError::InstitutionSuspended(issuer.id.clone()));
        }

        let data = data.normalized()?;
        let id = self.generate_id(&data.institution_id)?;

        // Nothing below can fail: the certificate is either fully stored or not at all.
        let created_at = self.next_created_at(now);
        let certificate = Certificate::issue(id, data, created_at, &self.hash);
        self.insert(certificate.clone());

        debug!(
            id = %certificate.certificate_id,
            institution = %certificate.institution_id,
            "certificate issued"
        );
        Ok(certificate)
    }

    fn restore_certificate(&mut self, certificate: Certificate) -> Result<()> {
        if self.positions.contains_key(&certificate.certificate_id) {
            return Err(StoreError::DuplicateCertificate(certificate.certificate_id));
        }
        self.require_institution(&certificate.institution_id)?;

        if self.last_created_at.map_or(true, |last| certificate.created_at > last) {
            self.last_created_at = Some(certificate.created_at);
        }
        self.insert(certificate);
        Ok(())
    }

    fn get_by_id(&self, id: &CertificateId) -> Result<&Certificate> {
        self.positions
            .get(id)
            .and_then(|&p| self.certificates.get(p))
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn list_all(&self) -> impl Iterator<Item = &Certificate> + '_ {
        self.certificates.iter()
    }

    fn len(&self) -> usize {
        self.certificates.len()
    }

    fn search(&self, filter: &SearchFilter) -> Vec<&Certificate> {
        self.search_index.search(&self.certificates, filter)
    }

    fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }
}
