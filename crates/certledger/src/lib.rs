//! # Certificate Ledger
//!
//! Tamper-evident issuance and verification of academic certificates.
//!
//! ## Overview
//!
//! Institutions issue certificates into a store. Each certificate carries an
//! integrity fingerprint of its identity fields. Pending certificates are
//! committed in batches to blocks, and each block is linked to its
//! predecessor by hash, so a reordered or edited chain fails validation.
//!
//! - **Certificates**: Immutable once issued, searchable immediately
//! - **Blocks**: Append-only batches of certificate ids
//! - **Verification**: Lookup by id or integrity hash, with commit status
//! - **Bulk issuance**: Row-by-row issuance of raw uploaded records
//!
//! ## Usage
//!
//! ```rust
//! use certledger::{Engine, EngineConfig};
//! use certledger::core::{CertificateData, Institution};
//! use certledger::store::SearchFilter;
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
//! let mut engine = Engine::new(EngineConfig::default());
//! engine
//!     .register_institution(Institution::new("INST-1", "Tech University", date))
//!     .unwrap();
//!
//! let cert = engine
//!     .issue_certificate(CertificateData::new("INST-1", "John Doe", "Computer Science", date))
//!     .unwrap();
//! assert_eq!(engine.pending_count(), 1);
//!
//! let block = engine.create_block(5).unwrap();
//! assert_eq!(block.index, 1);
//!
//! assert!(engine.verify(&cert.certificate_id).is_valid());
//! assert_eq!(engine.search(&SearchFilter::new().student_name("john")).len(), 1);
//! assert!(engine.validate_chain().is_valid);
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `certledger::core` - Core primitives (Certificate, Block, fingerprints)
//! - `certledger::store` - Store abstraction, in-memory store, and search

pub mod bulk;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod seed;
pub mod shared;
pub mod verify;

pub use bulk::{BulkFailure, BulkRecord, BulkReport};
pub use config::EngineConfig;
pub use engine::{Engine, EngineBuilder, Stats};
pub use error::{EngineError, Result};
pub use ledger::Ledger;
pub use seed::Seed;
pub use shared::SharedEngine;
pub use verify::{CommitStatus, Verdict, VerificationPolicy, VerifiedCertificate};

// Re-export component crates
pub use certledger_core as core;
pub use certledger_store as store;
