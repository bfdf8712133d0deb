//! A cloneable, task-safe handle over one [`Engine`].

use std::sync::Arc;

use certledger_core::{
    Block, Certificate, CertificateData, CertificateId, ChainReport, Fingerprint, Institution,
};
use certledger_store::{CertificateStore, MemoryStore, SearchFilter};
use tokio::sync::RwLock;

use crate::bulk::{BulkRecord, BulkReport};
use crate::engine::{Engine, Stats};
use crate::error::Result;
use crate::verify::Verdict;

/// Shares an [`Engine`] between async tasks.
///
/// Writes (`register_institution`, `issue_certificate`, `bulk_issue`,
/// `create_block`) hold the write lock for the whole operation. Reads share
/// the read lock and see a consistent snapshot. Results are returned owned
/// so no guard outlives the call.
pub struct SharedEngine<S: CertificateStore = MemoryStore> {
    inner: Arc<RwLock<Engine<S>>>,
}

impl<S: CertificateStore> Clone for SharedEngine<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: CertificateStore> SharedEngine<S> {
    /// Wrap `engine`.
    pub fn new(engine: Engine<S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// Register an institution.
    pub async fn register_institution(&self, institution: Institution) -> Result<()> {
        self.inner.write().await.register_institution(institution)
    }

    /// Issue a certificate.
    pub async fn issue_certificate(&self, data: CertificateData) -> Result<Certificate> {
        self.inner.write().await.issue_certificate(data)
    }

    /// Issue every record independently.
    pub async fn bulk_issue(&self, records: Vec<BulkRecord>) -> BulkReport {
        self.inner.write().await.bulk_issue(records)
    }

    /// Commit up to `max_batch_size` pending certificates.
    pub async fn create_block(&self, max_batch_size: usize) -> Result<Block> {
        self.inner
            .write()
            .await
            .create_block(max_batch_size)
            .map(Block::clone)
    }

    /// Create blocks until nothing is pending.
    pub async fn seal_all_pending(&self, max_batch_size: usize) -> Result<Vec<Block>> {
        self.inner.write().await.seal_all_pending(max_batch_size)
    }

    /// Get a certificate by id.
    pub async fn certificate(&self, id: &CertificateId) -> Result<Certificate> {
        self.inner.read().await.certificate(id).map(Certificate::clone)
    }

    /// Certificates matching `filter`, in insertion order.
    pub async fn search(&self, filter: &SearchFilter) -> Vec<Certificate> {
        let engine = self.inner.read().await;
        engine.search(filter).into_iter().cloned().collect()
    }

    /// Verify a certificate by id.
    pub async fn verify(&self, id: &CertificateId) -> Verdict {
        self.inner.read().await.verify(id)
    }

    /// Verify the certificate carrying `hash`.
    pub async fn verify_by_hash(&self, hash: &Fingerprint) -> Verdict {
        self.inner.read().await.verify_by_hash(hash)
    }

    /// Validate the whole chain.
    pub async fn validate_chain(&self) -> ChainReport {
        self.inner.read().await.validate_chain()
    }

    /// Aggregate counters.
    pub async fn stats(&self) -> Stats {
        self.inner.read().await.stats()
    }

    /// Run `f` against the engine under the read lock.
    pub async fn read<R>(&self, f: impl FnOnce(&Engine<S>) -> R) -> R {
        let engine = self.inner.read().await;
        f(&engine)
    }
}
