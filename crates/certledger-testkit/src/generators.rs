//! Proptest generators for property-based testing.

use proptest::prelude::*;

use certledger::{BulkRecord, Engine, EngineError};
use certledger_core::{CertificateData, InstitutionId};
use chrono::NaiveDate;

use crate::fixtures::FIXTURE_INSTITUTION;

/// Generate a date in 2000..=2030.
pub fn date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..=2030, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
}

/// Generate a person-like name, never blank.
pub fn student_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,10}( [A-Z][a-z]{1,12})?"
}

/// Generate a course name, never blank.
pub fn course_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,12}( of [A-Z][a-z]{2,12})?"
}

/// Generate a certificate type tag.
pub fn certificate_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::from("certificate")),
        Just(String::from("degree")),
        Just(String::from("diploma")),
    ]
}

/// Generate valid certificate data for `institution`.
pub fn certificate_data(institution: InstitutionId) -> impl Strategy<Value = CertificateData> {
    (
        student_name(),
        course_name(),
        date(),
        proptest::option::of(0i64..=365),
        proptest::option::of("[A-F][+-]?"),
        0u32..=240,
        certificate_type(),
    )
        .prop_map(
            move |(student, course, issued, completion_offset, grade, credits, tag)| {
                let mut data = CertificateData::new(institution.clone(), student, course, issued)
                    .credits(credits)
                    .certificate_type(tag);
                if let Some(days) = completion_offset {
                    data = data.completed_on(issued + chrono::Duration::days(days));
                }
                if let Some(grade) = grade {
                    data = data.grade(grade);
                }
                data
            },
        )
}

/// Generate a raw bulk row for the fixture institution, sometimes malformed.
pub fn bulk_record() -> impl Strategy<Value = BulkRecord> {
    (
        prop_oneof![4 => student_name(), 1 => Just(String::new())],
        course_name(),
        prop_oneof![4 => date().prop_map(|d| d.to_string()), 1 => Just(String::from("not-a-date"))],
        prop_oneof![3 => (0u32..=240).prop_map(|c| c.to_string()), 1 => Just(String::new())],
    )
        .prop_map(|(student, course, issued, credits)| {
            let mut record = BulkRecord::new(FIXTURE_INSTITUTION, student, course, issued);
            record.credits = credits;
            record
        })
}

/// One step in a random ledger workload.
#[derive(Debug, Clone)]
pub enum Op {
    /// Issue a certificate.
    Issue(CertificateData),
    /// Create a block with this batch size.
    CreateBlock(usize),
}

/// Generate a single operation against the fixture institution.
pub fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => certificate_data(InstitutionId::new(FIXTURE_INSTITUTION)).prop_map(Op::Issue),
        1 => (1usize..=6).prop_map(Op::CreateBlock),
    ]
}

/// Generate a workload of up to `max_len` operations.
pub fn ops(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op(), 0..=max_len)
}

/// Apply `ops` in order.
///
/// `NoPendingCertificates` from an empty batch is expected and skipped;
/// any other error is returned.
pub fn apply_ops(engine: &mut Engine, ops: &[Op]) -> Result<(), EngineError> {
    for op in ops {
        match op {
            Op::Issue(data) => {
                engine.issue_certificate(data.clone())?;
            }
            Op::CreateBlock(size) => match engine.create_block(*size) {
                Ok(_) | Err(EngineError::NoPendingCertificates) => {}
                Err(e) => return Err(e),
            },
        }
    }
    Ok(())
}
