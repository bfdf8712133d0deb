//! Institutions: the bodies allowed to issue certificates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::InstitutionId;

/// Whether an institution may currently issue certificates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstitutionStatus {
    #[default]
    Active,
    Suspended,
}

/// A registered institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    /// Unique, stable identifier.
    pub id: InstitutionId,

    /// Display name.
    pub name: String,

    /// Opaque reference to the institution's public key.
    ///
    /// Carried for adapters; the ledger never verifies anything with it.
    pub public_key_ref: String,

    /// Current status.
    pub status: InstitutionStatus,

    /// Date the institution was registered.
    pub registered_date: NaiveDate,
}

impl Institution {
    /// Create an active institution.
    pub fn new(
        id: impl Into<InstitutionId>,
        name: impl Into<String>,
        registered_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            public_key_ref: String::new(),
            status: InstitutionStatus::Active,
            registered_date,
        }
    }

    /// Set the public key reference.
    pub fn with_public_key_ref(mut self, key_ref: impl Into<String>) -> Self {
        self.public_key_ref = key_ref.into();
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: InstitutionStatus) -> Self {
        self.status = status;
        self
    }

    /// Check if the institution may issue certificates.
    pub fn is_active(&self) -> bool {
        self.status == InstitutionStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_institution_serializes_camel_case() {
        let inst = Institution::new(
            "INST-1",
            "Tech University",
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        )
        .with_public_key_ref("pk-tech")
        .with_status(InstitutionStatus::Suspended);

        let json = serde_json::to_value(&inst).unwrap();
        assert_eq!(json["id"], "INST-1");
        assert_eq!(json["publicKeyRef"], "pk-tech");
        assert_eq!(json["status"], "suspended");
        assert_eq!(json["registeredDate"], "2024-01-15");
        assert!(!inst.is_active());
    }
}
