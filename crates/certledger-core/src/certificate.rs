//! Certificates: issued credentials and the data they are issued from.
//!
//! A certificate is immutable once issued. Its integrity fingerprint is
//! computed exactly once, at issue time, over
//! `certificateId + studentName + courseName`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::hash::FingerprintHasher;
use crate::types::{CertificateId, Fingerprint, InstitutionId};

/// Certificate type used when none is given.
pub const DEFAULT_CERTIFICATE_TYPE: &str = "certificate";

/// The caller-supplied fields of a certificate, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateData {
    pub student_name: String,
    pub course_name: String,
    pub institution_id: InstitutionId,
    pub issue_date: NaiveDate,
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub credits: u32,
    #[serde(default = "default_certificate_type")]
    pub certificate_type: String,
}

fn default_certificate_type() -> String {
    DEFAULT_CERTIFICATE_TYPE.to_string()
}

impl CertificateData {
    /// Start describing a certificate.
    pub fn new(
        institution_id: impl Into<InstitutionId>,
        student_name: impl Into<String>,
        course_name: impl Into<String>,
        issue_date: NaiveDate,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            course_name: course_name.into(),
            institution_id: institution_id.into(),
            issue_date,
            completion_date: None,
            grade: None,
            credits: 0,
            certificate_type: default_certificate_type(),
        }
    }

    /// Set the completion date.
    pub fn completed_on(mut self, date: NaiveDate) -> Self {
        self.completion_date = Some(date);
        self
    }

    /// Set the grade.
    pub fn grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    /// Set the credit count.
    pub fn credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    /// Set the certificate type tag (`degree`, `diploma`, ...).
    pub fn certificate_type(mut self, tag: impl Into<String>) -> Self {
        self.certificate_type = tag.into();
        self
    }

    /// Trim text fields and check the required ones.
    ///
    /// Empty grades collapse to `None`; an empty type falls back to
    /// [`DEFAULT_CERTIFICATE_TYPE`].
    pub fn normalized(mut self) -> Result<Self, CoreError> {
        self.student_name = self.student_name.trim().to_string();
        self.course_name = self.course_name.trim().to_string();
        self.certificate_type = self.certificate_type.trim().to_string();
        self.grade = self
            .grade
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());

        if self.student_name.is_empty() {
            return Err(CoreError::MissingField("studentName"));
        }
        if self.course_name.is_empty() {
            return Err(CoreError::MissingField("courseName"));
        }
        if self.certificate_type.is_empty() {
            self.certificate_type = default_certificate_type();
        }
        if let Some(completion) = self.completion_date {
            if completion < self.issue_date {
                return Err(CoreError::CompletionBeforeIssue {
                    issue: self.issue_date.to_string(),
                    completion: completion.to_string(),
                });
            }
        }

        Ok(self)
    }
}

/// An issued certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub certificate_id: CertificateId,
    pub student_name: String,
    pub course_name: String,
    pub institution_id: InstitutionId,
    pub issue_date: NaiveDate,
    pub completion_date: Option<NaiveDate>,
    pub grade: Option<String>,
    pub credits: u32,
    pub certificate_type: String,

    /// Fingerprint of `certificateId + studentName + courseName`, fixed at issue.
    pub integrity_hash: Fingerprint,

    /// Creation time (Unix milliseconds), strictly increasing within a store.
    pub created_at: i64,
}

impl Certificate {
    /// Issue a certificate from already-normalized data.
    pub fn issue(
        certificate_id: CertificateId,
        data: CertificateData,
        created_at: i64,
        hasher: &impl FingerprintHasher,
    ) -> Self {
        let integrity_hash = hasher.fingerprint(&integrity_input(
            &certificate_id,
            &data.student_name,
            &data.course_name,
        ));

        Self {
            certificate_id,
            student_name: data.student_name,
            course_name: data.course_name,
            institution_id: data.institution_id,
            issue_date: data.issue_date,
            completion_date: data.completion_date,
            grade: data.grade,
            credits: data.credits,
            certificate_type: data.certificate_type,
            integrity_hash,
            created_at,
        }
    }

    /// Recompute the fingerprint from the current field values.
    ///
    /// Never stored; used to detect records edited after issue.
    pub fn recompute_hash(&self, hasher: &impl FingerprintHasher) -> Fingerprint {
        hasher.fingerprint(&integrity_input(
            &self.certificate_id,
            &self.student_name,
            &self.course_name,
        ))
    }

    /// Check whether the stored fingerprint matches the current fields.
    pub fn is_intact(&self, hasher: &impl FingerprintHasher) -> bool {
        self.recompute_hash(hasher) == self.integrity_hash
    }
}

/// The canonical text a certificate fingerprint is computed over.
pub fn integrity_input(id: &CertificateId, student_name: &str, course_name: &str) -> String {
    let mut input = String::with_capacity(id.as_str().len() + student_name.len() + course_name.len());
    input.push_str(id.as_str());
    input.push_str(student_name);
    input.push_str(course_name);
    input
}
