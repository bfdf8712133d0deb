//! Multi-field certificate search.
//!
//! All supplied filters are ANDed; an absent filter matches everything.
//! Results always come back in store insertion order, so repeating a query
//! reproduces the same sequence.

use std::collections::HashMap;

use certledger_core::{Certificate, InstitutionId};
use serde::{Deserialize, Serialize};

/// A search query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilter {
    /// Case-insensitive substring of the student name.
    pub student_name_contains: Option<String>,
    /// Case-insensitive substring of the course name.
    pub course_name_contains: Option<String>,
    /// Exact institution id.
    pub institution_id: Option<InstitutionId>,
    /// Exact certificate type tag.
    pub certificate_type: Option<String>,
}

impl SearchFilter {
    /// A filter that matches every certificate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the student name to contain `needle` (case-insensitive).
    pub fn student_name(mut self, needle: impl Into<String>) -> Self {
        self.student_name_contains = Some(needle.into());
        self
    }

    /// Require the course name to contain `needle` (case-insensitive).
    pub fn course_name(mut self, needle: impl Into<String>) -> Self {
        self.course_name_contains = Some(needle.into());
        self
    }

    /// Require the certificate to be issued by `institution`.
    pub fn institution(mut self, institution: impl Into<InstitutionId>) -> Self {
        self.institution_id = Some(institution.into());
        self
    }

    /// Require the certificate type to equal `tag`.
    pub fn certificate_type(mut self, tag: impl Into<String>) -> Self {
        self.certificate_type = Some(tag.into());
        self
    }

    /// Check if no filter is set.
    pub fn is_empty(&self) -> bool {
        self.student_name_contains.is_none()
            && self.course_name_contains.is_none()
            && self.institution_id.is_none()
            && self.certificate_type.is_none()
    }

    /// Check a single certificate against every supplied filter.
    pub fn matches(&self, certificate: &Certificate) -> bool {
        self.prepare().matches(certificate)
    }

    fn prepare(&self) -> PreparedFilter<'_> {
        PreparedFilter {
            student: self.student_name_contains.as_deref().map(str::to_lowercase),
            course: self.course_name_contains.as_deref().map(str::to_lowercase),
            institution: self.institution_id.as_ref(),
            certificate_type: self.certificate_type.as_deref(),
        }
    }
}

/// A filter with its needles lowercased once per query.
struct PreparedFilter<'a> {
    student: Option<String>,
    course: Option<String>,
    institution: Option<&'a InstitutionId>,
    certificate_type: Option<&'a str>,
}

impl PreparedFilter<'_> {
    fn matches(&self, certificate: &Certificate) -> bool {
        if let Some(institution) = self.institution {
            if &certificate.institution_id != institution {
                return false;
            }
        }
        if let Some(tag) = self.certificate_type {
            if certificate.certificate_type != tag {
                return false;
            }
        }
        if let Some(needle) = &self.student {
            if !certificate.student_name.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.course {
            if !certificate.course_name.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Linear scan over `certificates`, preserving their order.
pub fn scan<'a>(
    certificates: impl Iterator<Item = &'a Certificate>,
    filter: &SearchFilter,
) -> Vec<&'a Certificate> {
    let prepared = filter.prepare();
    certificates.filter(|c| prepared.matches(c)).collect()
}

/// Secondary indices over an insertion-ordered certificate vector.
///
/// Positions are appended as certificates are inserted, so every posting
/// list is already in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    by_institution: HashMap<InstitutionId, Vec<usize>>,
    by_type: HashMap<String, Vec<usize>>,
}

impl SearchIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the certificate stored at `position`.
    pub fn insert(&mut self, position: usize, certificate: &Certificate) {
        self.by_institution
            .entry(certificate.institution_id.clone())
            .or_default()
            .push(position);
        self.by_type
            .entry(certificate.certificate_type.clone())
            .or_default()
            .push(position);
    }

    /// Answer `filter` over `certificates`, the vector this index was built from.
    pub fn search<'a>(
        &self,
        certificates: &'a [Certificate],
        filter: &SearchFilter,
    ) -> Vec<&'a Certificate> {
        let prepared = filter.prepare();

        match self.candidates(filter) {
            None => certificates.iter().filter(|c| prepared.matches(c)).collect(),
            Some(positions) => positions
                .iter()
                .filter_map(|&p| certificates.get(p))
                .filter(|c| prepared.matches(c))
                .collect(),
        }
    }

    /// The smallest posting list selected by the exact-match filters.
    ///
    /// `None` means no exact filter was given and the whole store must be scanned.
    fn candidates(&self, filter: &SearchFilter) -> Option<&[usize]> {
        let by_institution = filter
            .institution_id
            .as_ref()
            .map(|id| self.by_institution.get(id).map_or(&[][..], Vec::as_slice));
        let by_type = filter
            .certificate_type
            .as_ref()
            .map(|tag| self.by_type.get(tag).map_or(&[][..], Vec::as_slice));

        match (by_institution, by_type) {
            (Some(a), Some(b)) => Some(if a.len() <= b.len() { a } else { b }),
            (a, b) => a.or(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certledger_core::{CertificateData, CertificateId, RollingHash};
    use chrono::NaiveDate;

    fn cert(id: &str, inst: &str, student: &str, course: &str, tag: &str) -> Certificate {
        let data = CertificateData::new(
            inst,
            student,
            course,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .certificate_type(tag);
        Certificate::issue(CertificateId::new(id), data, 0, &RollingHash)
    }

    fn corpus() -> (Vec<Certificate>, SearchIndex) {
        let certs = vec![
            cert("C1", "TECH", "John Doe", "Bachelor of Computer Science", "degree"),
            cert("C2", "BIZ", "Jane Smith", "Master of Business Administration", "degree"),
            cert("C3", "TECH", "Alice Johnson", "Master of Computer Science", "diploma"),
            cert("C4", "MED", "Bob Wilson", "Doctor of Medicine", "degree"),
        ];
        let mut index = SearchIndex::new();
        for (position, c) in certs.iter().enumerate() {
            index.insert(position, c);
        }
        (certs, index)
    }

    fn ids(hits: &[&Certificate]) -> Vec<String> {
        hits.iter().map(|c| c.certificate_id.to_string()).collect()
    }

    #[test]
    fn test_empty_filter_returns_all_in_order() {
        let (certs, index) = corpus();
        let hits = index.search(&certs, &SearchFilter::new());
        assert_eq!(ids(&hits), ["C1", "C2", "C3", "C4"]);
    }

    #[test]
    fn test_student_name_case_insensitive() {
        let (certs, index) = corpus();
        let hits = index.search(&certs, &SearchFilter::new().student_name("JOHN"));
        // "John Doe" and "Alice Johnson" both contain "john".
        assert_eq!(ids(&hits), ["C1", "C3"]);
    }

    #[test]
    fn test_single_certificate_match() {
        let (certs, _) = corpus();
        let filter = SearchFilter::new().course_name("COMPUTER").institution("TECH");
        let matched: Vec<bool> = certs.iter().map(|c| filter.matches(c)).collect();
        assert_eq!(matched, [true, false, true, false]);
        assert!(certs.iter().all(|c| SearchFilter::new().matches(c)));
    }

    #[test]
    fn test_filters_are_anded() {
        let (certs, index) = corpus();
        let filter = SearchFilter::new()
            .institution("TECH")
            .course_name("computer")
            .certificate_type("degree");
        let hits = index.search(&certs, &filter);
        assert_eq!(ids(&hits), ["C1"]);
    }

    #[test]
    fn test_unknown_exact_value_matches_nothing() {
        let (certs, index) = corpus();
        assert!(index
            .search(&certs, &SearchFilter::new().institution("NOPE"))
            .is_empty());
        assert!(index
            .search(&certs, &SearchFilter::new().certificate_type("Degree"))
            .is_empty());
    }

    #[test]
    fn test_index_agrees_with_scan() {
        let (certs, index) = corpus();
        let filters = [
            SearchFilter::new().certificate_type("degree"),
            SearchFilter::new().institution("TECH").certificate_type("diploma"),
            SearchFilter::new().course_name("master"),
            SearchFilter::new().student_name("o").institution("MED"),
        ];
        for filter in &filters {
            assert_eq!(
                ids(&index.search(&certs, filter)),
                ids(&scan(certs.iter(), filter)),
                "mismatch for {filter:?}"
            );
        }
    }

    #[test]
    fn test_filter_deserializes_camel_case() {
        let filter: SearchFilter =
            serde_json::from_str(r#"{"studentNameContains":"john"}"#).unwrap();
        assert_eq!(filter, SearchFilter::new().student_name("john"));
        assert!(!filter.is_empty());
        assert!(SearchFilter::new().is_empty());
    }
}
