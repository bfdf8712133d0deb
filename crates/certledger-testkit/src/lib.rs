//! # Certificate Ledger Testkit
//!
//! Testing utilities for the certificate ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known rolling-hash inputs with their expected fingerprints
//! - **Generators**: Proptest strategies for certificate data, bulk rows, and workloads
//! - **Fixtures**: An engine with a manual clock, deterministic ids, and one institution
//!
//! ## Golden Vectors
//!
//! ```rust
//! use certledger_testkit::vectors::verify_all_vectors;
//!
//! assert!(verify_all_vectors().is_empty());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use certledger_testkit::{apply_ops, ops, TestFixture};
//!
//! proptest! {
//!     #[test]
//!     fn chain_stays_valid(workload in ops(40)) {
//!         let mut fixture = TestFixture::new();
//!         apply_ops(&mut fixture.engine, &workload).unwrap();
//!         prop_assert!(fixture.engine.validate_chain().is_valid);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use certledger_testkit::fixtures::TestFixture;
//!
//! let mut fixture = TestFixture::new();
//! let cert = fixture.issue("John Doe", "Computer Science").unwrap();
//! assert_eq!(cert.certificate_id.as_str(), "CERT-INST-1-T000000");
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{TestFixture, FIXTURE_EPOCH, FIXTURE_INSTITUTION};
pub use generators::{apply_ops, bulk_record, certificate_data, op, ops, Op};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
