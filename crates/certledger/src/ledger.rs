//! The ledger: an append-only chain of blocks over a certificate store.
//!
//! A certificate is pending exactly when no block commits it. The ledger
//! keeps a reverse index from certificate id to committing block so that
//! pending selection and verification do not rescan every block.

use std::collections::HashMap;

use certledger_core::{
    validate_chain, validate_chain_with, Block, Certificate, CertificateId, ChainFault,
    ChainReport, Fingerprint, HashAlgorithm,
};
use certledger_store::CertificateStore;
use rand::Rng;
use tracing::{debug, info};

use crate::error::{EngineError, Result};

/// An append-only block chain.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    blocks: Vec<Block>,
    committed: HashMap<CertificateId, u64>,
    hash: HashAlgorithm,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new(hash: HashAlgorithm) -> Self {
        Self {
            blocks: Vec::new(),
            committed: HashMap::new(),
            hash,
        }
    }

    /// Rebuild a ledger from previously persisted blocks.
    ///
    /// Blocks are taken as-is; run [`validate`](Self::validate) to check
    /// them. When an id appears in several blocks the earliest one wins.
    pub fn restore(blocks: Vec<Block>, hash: HashAlgorithm) -> Self {
        let mut committed = HashMap::new();
        for block in &blocks {
            for id in &block.certificate_ids {
                committed.entry(id.clone()).or_insert(block.index);
            }
        }
        Self {
            blocks,
            committed,
            hash,
        }
    }

    /// Append the genesis block with a computed hash.
    pub fn genesis(&mut self, timestamp: i64) -> Result<&Block> {
        let block = Block::genesis(timestamp, &self.hash);
        self.push_genesis(block)
    }

    /// Append the genesis block with a caller-supplied hash.
    pub fn genesis_with_hash(&mut self, timestamp: i64, hash: Fingerprint) -> Result<&Block> {
        self.push_genesis(Block::genesis_with_hash(timestamp, hash))
    }

    fn push_genesis(&mut self, block: Block) -> Result<&Block> {
        if !self.blocks.is_empty() {
            return Err(EngineError::AlreadyInitialized);
        }
        debug!(hash = %block.hash, "genesis block created");
        Ok(self.append(block))
    }

    /// Certificates no block has committed, in store insertion order.
    pub fn pending_certificates<'a, S: CertificateStore>(&self, store: &'a S) -> Vec<&'a Certificate> {
        store
            .list_all()
            .filter(|c| !self.committed.contains_key(&c.certificate_id))
            .collect()
    }

    /// Number of pending certificates.
    pub fn pending_count<S: CertificateStore>(&self, store: &S) -> usize {
        store
            .list_all()
            .filter(|c| !self.committed.contains_key(&c.certificate_id))
            .count()
    }

    /// Commit up to `max_batch_size` of the oldest pending certificates.
    ///
    /// An empty ledger gets its genesis block first, stamped with the same
    /// `timestamp`.
    ///
    /// # Errors
    /// - `InvalidBatchSize` when `max_batch_size` is zero.
    /// - `NoPendingCertificates` when everything is already committed.
    pub fn create_block<S: CertificateStore>(
        &mut self,
        store: &S,
        max_batch_size: usize,
        timestamp: i64,
    ) -> Result<&Block> {
        if max_batch_size == 0 {
            return Err(EngineError::InvalidBatchSize);
        }

        let batch: Vec<CertificateId> = store
            .list_all()
            .filter(|c| !self.committed.contains_key(&c.certificate_id))
            .take(max_batch_size)
            .map(|c| c.certificate_id.clone())
            .collect();

        if batch.is_empty() {
            return Err(EngineError::NoPendingCertificates);
        }

        if self.blocks.is_empty() {
            self.genesis(timestamp)?;
        }

        let nonce = u64::from(rand::thread_rng().gen::<u32>());
        let index = self.blocks.len() as u64;
        let head = &self.blocks[self.blocks.len() - 1];
        let block = Block::linked(index, head, timestamp, batch, nonce, &self.hash);

        info!(
            index = block.index,
            certificates = block.len(),
            hash = %block.hash,
            "block created"
        );
        Ok(self.append(block))
    }

    fn append(&mut self, block: Block) -> &Block {
        for id in &block.certificate_ids {
            self.committed.entry(id.clone()).or_insert(block.index);
        }
        let position = self.blocks.len();
        self.blocks.push(block);
        &self.blocks[position]
    }

    /// Check linkage, block hashes, and single commitment over the whole chain.
    pub fn validate(&self) -> std::result::Result<(), ChainFault> {
        validate_chain(&self.blocks, &self.hash)
    }

    /// [`validate`](Self::validate), also requiring every committed id to
    /// resolve in `store`.
    pub fn validate_against<S: CertificateStore>(
        &self,
        store: &S,
    ) -> std::result::Result<(), ChainFault> {
        validate_chain_with(&self.blocks, &self.hash, |id| store.get_by_id(id).is_ok())
    }

    /// [`validate`](Self::validate), summarized for reporting.
    pub fn report(&self) -> ChainReport {
        ChainReport::from(self.validate())
    }

    /// All blocks, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The block at `index`.
    pub fn block(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    /// The most recent block.
    pub fn head(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the ledger has no blocks, not even genesis.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index of the block that committed `id`.
    pub fn block_of(&self, id: &CertificateId) -> Option<u64> {
        self.committed.get(id).copied()
    }

    /// Check if some block commits `id`.
    pub fn is_committed(&self, id: &CertificateId) -> bool {
        self.committed.contains_key(id)
    }

    /// Number of distinct committed certificates.
    pub fn committed_count(&self) -> usize {
        self.committed.len()
    }

    /// The fingerprint algorithm used for block hashes.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certledger_core::{CertificateData, Institution};
    use certledger_store::{MemoryStore, ScriptedTokens};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn store_with(count: usize) -> MemoryStore {
        let tokens: Vec<String> = (0..count).map(|i| format!("T{i:03}")).collect();
        let mut store = MemoryStore::new().with_tokens(ScriptedTokens::new(tokens));
        store
            .register_institution(Institution::new("INST-1", "Tech University", date()))
            .unwrap();
        for i in 0..count {
            let data = CertificateData::new("INST-1", format!("Student {i}"), "Course", date());
            store.issue_certificate(data, 1_000 + i as i64).unwrap();
        }
        store
    }

    #[test]
    fn test_genesis_once() {
        let mut ledger = Ledger::default();
        let genesis = ledger.genesis(1_736_870_400_000).unwrap().clone();
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.previous_hash.as_str(), "0");
        assert_eq!(genesis.hash.as_str(), "58f95a63");
        assert!(genesis.certificate_ids.is_empty());

        assert_eq!(ledger.genesis(0), Err(EngineError::AlreadyInitialized));
        assert_eq!(
            ledger.genesis_with_hash(0, Fingerprint::from("genesis")),
            Err(EngineError::AlreadyInitialized)
        );
    }

    #[test]
    fn test_genesis_with_supplied_hash() {
        let mut ledger = Ledger::default();
        ledger
            .genesis_with_hash(0, Fingerprint::from("4c6f258"))
            .unwrap();
        assert_eq!(ledger.head().unwrap().hash.as_str(), "4c6f258");
        assert!(ledger.validate().is_ok());
    }

    #[test]
    fn test_batches_take_oldest_pending() {
        let store = store_with(7);
        let mut ledger = Ledger::default();
        ledger.genesis(0).unwrap();

        let first = ledger.create_block(&store, 5, 10).unwrap().clone();
        assert_eq!(first.index, 1);
        assert_eq!(
            first.certificate_ids,
            (0..5)
                .map(|i| CertificateId::new(format!("CERT-INST-1-T{i:03}")))
                .collect::<Vec<_>>()
        );
        assert_eq!(ledger.pending_count(&store), 2);

        let second = ledger.create_block(&store, 5, 20).unwrap().clone();
        assert_eq!(second.index, 2);
        assert_eq!(second.len(), 2);
        assert_eq!(second.previous_hash, first.hash);

        assert_eq!(
            ledger.create_block(&store, 5, 30),
            Err(EngineError::NoPendingCertificates)
        );
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.committed_count(), 7);
        assert!(ledger.validate().is_ok());
    }

    #[test]
    fn test_zero_batch_rejected() {
        let store = store_with(1);
        let mut ledger = Ledger::default();
        assert_eq!(
            ledger.create_block(&store, 0, 0),
            Err(EngineError::InvalidBatchSize)
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_empty_ledger_gets_genesis_first() {
        let store = store_with(2);
        let mut ledger = Ledger::default();
        let block = ledger.create_block(&store, 5, 42).unwrap().clone();
        assert_eq!(block.index, 1);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.block(0).unwrap().timestamp, 42);
        assert!(ledger.validate().is_ok());
    }

    #[test]
    fn test_block_hash_follows_index_and_timestamp() {
        let store = store_with(1);
        let mut ledger = Ledger::default();
        ledger.genesis(0).unwrap();
        let block = ledger
            .create_block(&store, 5, 1_700_000_000_000)
            .unwrap();
        assert_eq!(block.hash.as_str(), "45b10ef6");
    }

    #[test]
    fn test_reverse_index() {
        let store = store_with(3);
        let mut ledger = Ledger::default();
        ledger.genesis(0).unwrap();
        ledger.create_block(&store, 2, 1).unwrap();

        let ids: Vec<CertificateId> = store
            .list_all()
            .map(|c| c.certificate_id.clone())
            .collect();
        assert_eq!(ledger.block_of(&ids[0]), Some(1));
        assert_eq!(ledger.block_of(&ids[1]), Some(1));
        assert_eq!(ledger.block_of(&ids[2]), None);
        assert!(!ledger.is_committed(&ids[2]));

        let pending = ledger.pending_certificates(&store);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].certificate_id, ids[2]);
    }

    #[test]
    fn test_restore_and_detect_tampering() {
        let store = store_with(2);
        let mut ledger = Ledger::default();
        ledger.genesis(0).unwrap();
        ledger.create_block(&store, 1, 1).unwrap();
        ledger.create_block(&store, 1, 2).unwrap();

        let mut blocks = ledger.blocks().to_vec();
        let restored = Ledger::restore(blocks.clone(), HashAlgorithm::Rolling);
        assert_eq!(restored.committed_count(), 2);
        assert!(restored.report().is_valid);

        blocks[1].previous_hash = Fingerprint::from("deadbeef");
        let tampered = Ledger::restore(blocks, HashAlgorithm::Rolling);
        let report = tampered.report();
        assert!(!report.is_valid);
        assert_eq!(report.failing_index, Some(1));
    }

    #[test]
    fn test_index_is_position_after_gap() {
        let store = store_with(1);
        let genesis = Block::genesis(0, &HashAlgorithm::Rolling);
        let skipped = Block::linked(5, &genesis, 1, Vec::new(), 0, &HashAlgorithm::Rolling);
        let mut ledger = Ledger::restore(vec![genesis, skipped], HashAlgorithm::Rolling);
        assert_eq!(ledger.validate(), Err(ChainFault::BrokenChain { index: 1 }));

        let block = ledger.create_block(&store, 5, 2).unwrap().clone();
        assert_eq!(block.index, 2);
        assert_eq!(ledger.block(2), Some(&block));
        assert_eq!(ledger.block_of(&block.certificate_ids[0]), Some(2));
    }

    #[test]
    fn test_validate_against_store() {
        let store = store_with(1);
        let mut ledger = Ledger::default();
        ledger.create_block(&store, 5, 1).unwrap();
        assert_eq!(ledger.validate_against(&store), Ok(()));

        let mut blocks = ledger.blocks().to_vec();
        let ghost = Block::next(
            &blocks[1],
            2,
            vec![CertificateId::new("CERT-GHOST-1")],
            0,
            &HashAlgorithm::Rolling,
        );
        blocks.push(ghost);
        let restored = Ledger::restore(blocks, HashAlgorithm::Rolling);

        assert_eq!(restored.validate(), Ok(()));
        assert_eq!(
            restored.validate_against(&store),
            Err(ChainFault::UnknownCommit {
                index: 2,
                certificate_id: CertificateId::new("CERT-GHOST-1"),
            })
        );
    }
}
