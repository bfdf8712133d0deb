//! The Engine: unified API for the certificate ledger.
//!
//! The Engine brings together the certificate store, the block ledger,
//! verification, and bulk issuance behind one interface. Writes take
//! `&mut self` and reads `&self`, so a single owner gets the required
//! mutual exclusion from the borrow checker; see
//! [`SharedEngine`](crate::SharedEngine) for concurrent use.

use std::sync::Arc;

use certledger_core::{
    Block, Certificate, CertificateData, CertificateId, ChainReport, Clock, Fingerprint,
    Institution, InstitutionId, SystemClock,
};
use certledger_store::{CertificateStore, MemoryStore, SearchFilter, TokenSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bulk::{BulkFailure, BulkRecord, BulkReport};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::ledger::Ledger;
use crate::seed::Seed;
use crate::verify::{self, Verdict};

/// Aggregate counters, derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Blocks in the chain, genesis included.
    pub total_blocks: usize,
    pub total_certificates: usize,
    pub pending_certificates: usize,
    /// Institutions currently allowed to issue.
    pub authorized_institutions: usize,
    pub chain_valid: bool,
}

/// The main Engine struct.
///
/// Provides a unified API for:
/// - Registering institutions
/// - Issuing certificates, one at a time or in bulk
/// - Searching and verifying certificates
/// - Committing pending certificates to blocks
/// - Validating the chain
pub struct Engine<S: CertificateStore = MemoryStore> {
    /// Owner of institutions and certificates.
    store: S,
    /// The block chain.
    ledger: Ledger,
    /// Configuration.
    config: EngineConfig,
    /// Time source for issuance and block timestamps.
    clock: Arc<dyn Clock>,
}

impl Engine<MemoryStore> {
    /// Create an engine over an empty in-memory store.
    ///
    /// The genesis block is created immediately from the system clock.
    pub fn new(config: EngineConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = MemoryStore::new()
            .with_hash_algorithm(config.hash)
            .with_max_id_attempts(config.max_id_attempts);
        let ledger = Ledger::restore(
            vec![Block::genesis(clock.now_millis(), &config.hash)],
            config.hash,
        );
        Self {
            store,
            ledger,
            config,
            clock,
        }
    }

    /// Create an engine and load `seed` after the genesis block.
    ///
    /// Use [`Seed::demo_for`] for sample data fingerprinted with the
    /// configured algorithm.
    pub fn with_seed(config: EngineConfig, seed: Seed) -> Result<Self> {
        Self::builder(config).seed(seed).build()
    }

    /// Start building an engine with injected clock, tokens, or seed.
    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder::new(config)
    }
}

impl<S: CertificateStore> Engine<S> {
    /// Assemble an engine from an existing store and ledger.
    ///
    /// Nothing is validated; call [`check_chain`](Self::check_chain) when
    /// the parts come from outside.
    pub fn from_parts(store: S, ledger: Ledger, config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            ledger,
            config,
            clock,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the ledger reference.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Institutions
    // ─────────────────────────────────────────────────────────────────────────

    /// Register an institution.
    pub fn register_institution(&mut self, institution: Institution) -> Result<()> {
        let id = institution.id.clone();
        self.store.register_institution(institution)?;
        info!(institution = %id, "institution registered");
        Ok(())
    }

    /// Look up an institution.
    pub fn institution(&self, id: &InstitutionId) -> Option<&Institution> {
        self.store.institution(id)
    }

    /// All institutions in registration order.
    pub fn institutions(&self) -> impl Iterator<Item = &Institution> + '_ {
        self.store.institutions()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Issuance
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue a certificate.
    ///
    /// The certificate is searchable at once and pending until a block
    /// commits it.
    pub fn issue_certificate(&mut self, data: CertificateData) -> Result<Certificate> {
        let certificate = self.store.issue_certificate(data, self.clock.now_millis())?;
        info!(
            certificate = %certificate.certificate_id,
            institution = %certificate.institution_id,
            "certificate issued"
        );
        Ok(certificate)
    }

    /// Issue every record independently.
    ///
    /// A failing row is reported with its 1-based row number and never
    /// stops the rows after it. Rows past `max_bulk_records` are reported
    /// as `BulkLimitExceeded` and not issued.
    pub fn bulk_issue<I>(&mut self, records: I) -> BulkReport
    where
        I: IntoIterator<Item = BulkRecord>,
    {
        let limit = self.config.max_bulk_records;
        let mut report = BulkReport::default();

        for (position, record) in records.into_iter().enumerate() {
            let row = position + 1;
            let outcome = if position >= limit {
                Err(EngineError::BulkLimitExceeded { limit })
            } else {
                self.issue_record(&record)
            };

            match outcome {
                Ok(id) => {
                    report.success_count += 1;
                    report.issued.push(id);
                }
                Err(error) => {
                    debug!(row, %error, "bulk row rejected");
                    report.failures.push(BulkFailure { row, record, error });
                }
            }
        }

        info!(
            issued = report.success_count,
            failed = report.failures.len(),
            "bulk issuance finished"
        );
        report
    }

    fn issue_record(&mut self, record: &BulkRecord) -> Result<CertificateId> {
        let data = record
            .parse()
            .map_err(|e| EngineError::Store(e.into()))?;
        Ok(self.issue_certificate(data)?.certificate_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a certificate by id.
    pub fn certificate(&self, id: &CertificateId) -> Result<&Certificate> {
        Ok(self.store.get_by_id(id)?)
    }

    /// All certificates in insertion order.
    pub fn certificates(&self) -> impl Iterator<Item = &Certificate> + '_ {
        self.store.list_all()
    }

    /// Certificates matching `filter`, in insertion order.
    pub fn search(&self, filter: &SearchFilter) -> Vec<&Certificate> {
        self.store.search(filter)
    }

    /// Certificates not yet committed to a block, in insertion order.
    pub fn pending_certificates(&self) -> Vec<&Certificate> {
        self.ledger.pending_certificates(&self.store)
    }

    /// Number of pending certificates.
    pub fn pending_count(&self) -> usize {
        self.ledger.pending_count(&self.store)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify a certificate by id under the configured policy.
    pub fn verify(&self, id: &CertificateId) -> Verdict {
        let verdict = verify::verify(&self.store, &self.ledger, id, self.config.verification);
        log_verdict(&verdict);
        verdict
    }

    /// Verify the certificate carrying `hash`.
    pub fn verify_by_hash(&self, hash: &Fingerprint) -> Verdict {
        let verdict =
            verify::verify_by_hash(&self.store, &self.ledger, hash, self.config.verification);
        log_verdict(&verdict);
        verdict
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Blocks
    // ─────────────────────────────────────────────────────────────────────────

    /// Commit up to `max_batch_size` of the oldest pending certificates.
    pub fn create_block(&mut self, max_batch_size: usize) -> Result<&Block> {
        let now = self.clock.now_millis();
        self.ledger.create_block(&self.store, max_batch_size, now)
    }

    /// [`create_block`](Self::create_block) with the configured batch size.
    pub fn create_default_block(&mut self) -> Result<&Block> {
        self.create_block(self.config.default_batch_size)
    }

    /// Create blocks until nothing is pending, returning the new blocks.
    ///
    /// Returns an empty list when nothing was pending.
    pub fn seal_all_pending(&mut self, max_batch_size: usize) -> Result<Vec<Block>> {
        if max_batch_size == 0 {
            return Err(EngineError::InvalidBatchSize);
        }

        let mut sealed = Vec::new();
        loop {
            match self.create_block(max_batch_size) {
                Ok(block) => sealed.push(block.clone()),
                Err(EngineError::NoPendingCertificates) => return Ok(sealed),
                Err(e) => return Err(e),
            }
        }
    }

    /// All blocks, genesis first.
    pub fn blocks(&self) -> &[Block] {
        self.ledger.blocks()
    }

    /// Validate the whole chain and report the first fault.
    ///
    /// Besides linkage and hashes, every committed id must name a
    /// certificate in the store.
    pub fn validate_chain(&self) -> ChainReport {
        let report = ChainReport::from(self.ledger.validate_against(&self.store));
        if let (Some(index), Some(reason)) = (report.failing_index, report.reason.as_deref()) {
            warn!(index, reason, "chain validation failed");
        }
        report
    }

    /// Validate the whole chain, failing with the first fault.
    pub fn check_chain(&self) -> Result<()> {
        self.ledger.validate_against(&self.store)?;
        Ok(())
    }

    /// Aggregate counters.
    pub fn stats(&self) -> Stats {
        Stats {
            total_blocks: self.ledger.len(),
            total_certificates: self.store.len(),
            pending_certificates: self.pending_count(),
            authorized_institutions: self.store.active_institution_count(),
            chain_valid: self.ledger.validate_against(&self.store).is_ok(),
        }
    }
}

fn log_verdict(verdict: &Verdict) {
    match verdict {
        Verdict::Valid(verified) => info!(
            certificate = %verified.certificate.certificate_id,
            committed = verified.status.is_committed(),
            "certificate verified"
        ),
        Verdict::NotFound { lookup } => info!(lookup = %lookup, "certificate not found"),
        Verdict::Invalid { certificate } => warn!(
            certificate = %certificate.certificate_id,
            "certificate has an empty integrity hash"
        ),
        Verdict::TamperedRecord {
            certificate,
            computed,
        } => warn!(
            certificate = %certificate.certificate_id,
            recorded = %certificate.integrity_hash,
            computed = %computed,
            "certificate record was altered"
        ),
    }
}

/// Builder for an in-memory [`Engine`].
pub struct EngineBuilder {
    config: EngineConfig,
    store: MemoryStore,
    clock: Arc<dyn Clock>,
    seed: Seed,
    genesis_hash: Option<Fingerprint>,
}

impl EngineBuilder {
    fn new(config: EngineConfig) -> Self {
        let store = MemoryStore::new()
            .with_hash_algorithm(config.hash)
            .with_max_id_attempts(config.max_id_attempts);
        Self {
            config,
            store,
            clock: Arc::new(SystemClock),
            seed: Seed::default(),
            genesis_hash: None,
        }
    }

    /// Use `clock` for issuance and block timestamps.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use `tokens` for certificate id suffixes.
    pub fn tokens(mut self, tokens: impl TokenSource + 'static) -> Self {
        self.store = self.store.with_tokens(tokens);
        self
    }

    /// Load `seed` after the genesis block.
    pub fn seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }

    /// Give the genesis block this hash instead of a computed one.
    pub fn genesis_hash(mut self, hash: impl Into<Fingerprint>) -> Self {
        self.genesis_hash = Some(hash.into());
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    /// - `SeedHashMismatch` when the seed was fingerprinted with another
    ///   algorithm than the configured one.
    /// - Seed institutions and certificates go through the store, so
    ///   duplicates and unknown issuers are rejected.
    pub fn build(self) -> Result<Engine<MemoryStore>> {
        let Self {
            config,
            mut store,
            clock,
            seed,
            genesis_hash,
        } = self;

        if let Some(hash) = seed.hash {
            if hash != config.hash {
                return Err(EngineError::SeedHashMismatch {
                    seed: hash,
                    configured: config.hash,
                });
            }
        }

        let mut ledger = Ledger::new(config.hash);
        let now = clock.now_millis();
        match genesis_hash {
            Some(hash) => ledger.genesis_with_hash(now, hash)?,
            None => ledger.genesis(now)?,
        };

        let seeded = seed.certificates.len();
        for institution in seed.institutions {
            store.register_institution(institution)?;
        }
        for certificate in seed.certificates {
            store.restore_certificate(certificate)?;
        }
        if seeded > 0 {
            debug!(certificates = seeded, "seed loaded");
        }

        Ok(Engine::from_parts(store, ledger, config, clock))
    }
}
