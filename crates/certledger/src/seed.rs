//! Initial institutions and certificates loaded when an engine is built.

use certledger_core::{Certificate, CertificateData, CertificateId, HashAlgorithm, Institution};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Records loaded into a fresh engine.
///
/// Certificates are inserted as-is, ids and integrity hashes included, and
/// start out pending. When `hash` is set the engine refuses a seed whose
/// algorithm differs from its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Seed {
    pub institutions: Vec<Institution>,
    pub certificates: Vec<Certificate>,
    /// Algorithm the certificates were fingerprinted with, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<HashAlgorithm>,
}

impl Seed {
    /// An empty seed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an institution.
    pub fn with_institution(mut self, institution: Institution) -> Self {
        self.institutions.push(institution);
        self
    }

    /// Add a pre-issued certificate.
    pub fn with_certificate(mut self, certificate: Certificate) -> Self {
        self.certificates.push(certificate);
        self
    }

    /// Check if the seed holds nothing.
    pub fn is_empty(&self) -> bool {
        self.institutions.is_empty() && self.certificates.is_empty()
    }

    /// Sample institutions and certificates, fingerprinted with the default hash.
    pub fn demo() -> Self {
        Self::demo_with(HashAlgorithm::default())
    }

    /// Sample data fingerprinted with the algorithm `config` selects.
    pub fn demo_for(config: &EngineConfig) -> Self {
        Self::demo_with(config.hash)
    }

    /// Sample institutions and certificates, fingerprinted with `hash`.
    pub fn demo_with(hash: HashAlgorithm) -> Self {
        let registered = ymd(2024, 1, 1);

        let institutions = [
            ("TECH_UNIV_001", "Tech University", "registrar@techuniv.edu"),
            ("BIZ_COLLEGE_002", "Business College", "admin@bizcollege.edu"),
            ("MED_SCHOOL_003", "Medical School", "verification@medschool.edu"),
        ];

        let certificates = [
            (
                "CERT-TECH-001-2024",
                "TECH_UNIV_001",
                "John Doe",
                "Bachelor of Computer Science",
                ymd(2024, 5, 15),
                "A",
            ),
            (
                "CERT-BIZ-002-2024",
                "BIZ_COLLEGE_002",
                "Jane Smith",
                "Master of Business Administration",
                ymd(2024, 6, 20),
                "B+",
            ),
            (
                "CERT-MED-003-2024",
                "MED_SCHOOL_003",
                "Alice Johnson",
                "Doctor of Medicine",
                ymd(2024, 7, 10),
                "A-",
            ),
        ];

        let mut seed = Self::new();
        for (id, name, contact) in institutions {
            seed = seed.with_institution(
                Institution::new(id, name, registered).with_public_key_ref(contact),
            );
        }
        for (id, institution, student, course, issued, grade) in certificates {
            let data = CertificateData::new(institution, student, course, issued)
                .grade(grade)
                .certificate_type("degree");
            seed = seed.with_certificate(Certificate::issue(
                CertificateId::new(id),
                data,
                start_of_day_millis(issued),
                &hash,
            ));
        }
        seed.hash = Some(hash);
        seed
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn start_of_day_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use certledger_core::RollingHash;

    #[test]
    fn test_demo_contents() {
        let seed = Seed::demo();
        assert_eq!(seed.institutions.len(), 3);
        assert_eq!(seed.certificates.len(), 3);

        let john = &seed.certificates[0];
        assert_eq!(john.certificate_id.as_str(), "CERT-TECH-001-2024");
        assert_eq!(john.institution_id.as_str(), "TECH_UNIV_001");
        assert_eq!(john.grade.as_deref(), Some("A"));
        assert_eq!(john.created_at, 1_715_731_200_000);
        assert!(john.is_intact(&RollingHash));
    }

    #[test]
    fn test_demo_records_its_algorithm() {
        assert!(Seed::new().is_empty());
        assert_eq!(Seed::new().hash, None);

        let seed = Seed::demo_for(&EngineConfig::default().with_hash(HashAlgorithm::Blake3));
        assert!(!seed.is_empty());
        assert_eq!(seed.hash, Some(HashAlgorithm::Blake3));
        assert!(seed
            .certificates
            .iter()
            .all(|c| c.is_intact(&HashAlgorithm::Blake3)));
        assert_eq!(Seed::demo().hash, Some(HashAlgorithm::Rolling));
    }

    #[test]
    fn test_demo_created_at_increases() {
        let seed = Seed::demo();
        let times: Vec<i64> = seed.certificates.iter().map(|c| c.created_at).collect();
        assert_eq!(times, [1_715_731_200_000, 1_718_841_600_000, 1_720_569_600_000]);
    }
}
