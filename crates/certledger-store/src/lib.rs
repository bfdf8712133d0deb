//! # Certificate Ledger Store
//!
//! Ownership of institutions and certificates, certificate id generation,
//! and the filtered search layer.
//!
//! ## Overview
//!
//! The [`CertificateStore`] trait describes everything the ledger needs from
//! a certificate store, so the engine stays storage-agnostic. [`MemoryStore`]
//! is the in-memory implementation; an adapter backed by files or a database
//! implements the same trait.
//!
//! ## Key Types
//!
//! - [`CertificateStore`] - The store interface
//! - [`MemoryStore`] - In-memory store with secondary search indices
//! - [`SearchFilter`] - Multi-field query, all supplied fields ANDed
//! - [`TokenSource`] - Random suffix source for certificate ids
//!
//! ## Usage
//!
//! ```rust
//! use certledger_core::{CertificateData, Institution};
//! use certledger_store::{CertificateStore, MemoryStore, SearchFilter};
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
//! let mut store = MemoryStore::new();
//! store
//!     .register_institution(Institution::new("INST-1", "Tech University", date))
//!     .unwrap();
//!
//! let data = CertificateData::new("INST-1", "John Doe", "Computer Science", date);
//! let cert = store.issue_certificate(data, 1_700_000_000_000).unwrap();
//! assert!(cert.certificate_id.as_str().starts_with("CERT-INST-1-"));
//!
//! let hits = store.search(&SearchFilter::new().student_name("john"));
//! assert_eq!(hits.len(), 1);
//! ```
//!
//! ## Design Notes
//!
//! - **Insertion order**: listing and search always return certificates in
//!   the order they entered the store
//! - **Immutable records**: ids and integrity hashes are fixed at issue time
//! - **Monotonic creation time**: `created_at` strictly increases per store

pub mod error;
pub mod memory;
pub mod search;
pub mod token;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use search::{SearchFilter, SearchIndex};
pub use token::{RandomTokens, ScriptedTokens, TokenSource, TOKEN_LEN};
pub use traits::{CertificateStore, DEFAULT_MAX_ID_ATTEMPTS};
