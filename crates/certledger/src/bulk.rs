//! Bulk issuance records.
//!
//! A [`BulkRecord`] is one row of an uploaded batch with every field still
//! raw text. Parsing turns it into [`CertificateData`]; the engine then
//! issues each row on its own, so one bad row never blocks the others.

use certledger_core::{CertificateData, CertificateId, CoreError, InstitutionId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Date format accepted for bulk dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One raw bulk issuance row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BulkRecord {
    pub student_name: String,
    pub course_name: String,
    pub institution_id: String,
    /// `YYYY-MM-DD`.
    pub issue_date: String,
    /// `YYYY-MM-DD`, or empty.
    pub completion_date: String,
    pub grade: String,
    /// Whole number, or empty for zero.
    pub credits: String,
    /// Empty means the default type.
    pub certificate_type: String,
}

impl BulkRecord {
    /// A row with the required fields set.
    pub fn new(
        institution_id: impl Into<String>,
        student_name: impl Into<String>,
        course_name: impl Into<String>,
        issue_date: impl Into<String>,
    ) -> Self {
        Self {
            institution_id: institution_id.into(),
            student_name: student_name.into(),
            course_name: course_name.into(),
            issue_date: issue_date.into(),
            ..Self::default()
        }
    }

    /// Parse the raw fields.
    ///
    /// Text fields are trimmed. Blank required fields and unparsable dates
    /// or credits are rejected; name and date-order rules are left to
    /// issuance.
    pub fn parse(&self) -> Result<CertificateData, CoreError> {
        let institution_id = required("institutionId", &self.institution_id)?;
        let issue_date = parse_date("issueDate", required("issueDate", &self.issue_date)?)?;

        let mut data = CertificateData::new(
            InstitutionId::new(institution_id),
            self.student_name.trim(),
            self.course_name.trim(),
            issue_date,
        )
        .grade(self.grade.trim())
        .certificate_type(self.certificate_type.trim());

        let completion = self.completion_date.trim();
        if !completion.is_empty() {
            data = data.completed_on(parse_date("completionDate", completion)?);
        }

        let credits = self.credits.trim();
        if !credits.is_empty() {
            let credits = credits.parse::<u32>().map_err(|e| CoreError::MalformedField {
                field: "credits",
                reason: e.to_string(),
            })?;
            data = data.credits(credits);
        }

        Ok(data)
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        Err(CoreError::MissingField(field))
    } else {
        Ok(value)
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| CoreError::MalformedField {
        field,
        reason: format!("{value:?}: {e}"),
    })
}

/// A row that was not issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    /// 1-based position in the submitted batch.
    pub row: usize,
    pub record: BulkRecord,
    pub error: EngineError,
}

/// The outcome of a bulk issuance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    pub success_count: usize,
    /// Ids of the issued certificates, in row order.
    pub issued: Vec<CertificateId>,
    pub failures: Vec<BulkFailure>,
}

impl BulkReport {
    /// Total rows seen.
    pub fn total(&self) -> usize {
        self.success_count + self.failures.len()
    }

    /// Check if every row was issued.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_totals() {
        let mut report = BulkReport::default();
        assert!(report.is_complete());

        report.success_count = 1;
        report.issued.push(CertificateId::new("CERT-INST-1-A1"));
        report.failures.push(BulkFailure {
            row: 2,
            record: BulkRecord::new("INST-1", "", "MBA", "2024-06-20"),
            error: EngineError::InvalidBatchSize,
        });
        assert_eq!(report.total(), 2);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_parse_full_row() {
        let record = BulkRecord {
            student_name: "  John Doe ".into(),
            course_name: "Computer Science".into(),
            institution_id: "INST-1".into(),
            issue_date: "2024-05-15".into(),
            completion_date: "2024-06-01".into(),
            grade: "A".into(),
            credits: "120".into(),
            certificate_type: "degree".into(),
        };
        let data = record.parse().unwrap();
        assert_eq!(data.student_name, "John Doe");
        assert_eq!(data.institution_id.as_str(), "INST-1");
        assert_eq!(data.issue_date, NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
        assert_eq!(
            data.completion_date,
            Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        );
        assert_eq!(data.credits, 120);
        assert_eq!(data.certificate_type, "degree");
    }

    #[test]
    fn test_parse_minimal_row() {
        let data = BulkRecord::new("INST-1", "Jane", "MBA", "2024-06-20")
            .parse()
            .unwrap();
        assert_eq!(data.completion_date, None);
        assert_eq!(data.credits, 0);
    }

    #[test]
    fn test_missing_required_fields() {
        assert_eq!(
            BulkRecord::new(" ", "Jane", "MBA", "2024-06-20").parse(),
            Err(CoreError::MissingField("institutionId"))
        );
        assert_eq!(
            BulkRecord::new("INST-1", "Jane", "MBA", "").parse(),
            Err(CoreError::MissingField("issueDate"))
        );
    }

    #[test]
    fn test_malformed_fields() {
        let bad_date = BulkRecord::new("INST-1", "Jane", "MBA", "20/06/2024").parse();
        assert!(matches!(
            bad_date,
            Err(CoreError::MalformedField { field: "issueDate", .. })
        ));

        let mut bad_credits = BulkRecord::new("INST-1", "Jane", "MBA", "2024-06-20");
        bad_credits.credits = "ten".into();
        assert!(matches!(
            bad_credits.parse(),
            Err(CoreError::MalformedField { field: "credits", .. })
        ));
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let record: BulkRecord = serde_json::from_str(
            r#"{"studentName":"John","courseName":"CS","institutionId":"INST-1","issueDate":"2024-05-15"}"#,
        )
        .unwrap();
        assert_eq!(record, BulkRecord::new("INST-1", "John", "CS", "2024-05-15"));
    }
}
