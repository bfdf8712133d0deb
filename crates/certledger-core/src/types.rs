//! Strong type definitions for the certificate ledger.
//!
//! All identifiers are newtypes to prevent misuse at compile time.
//! They serialize as plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a registered institution (e.g. `INST-1`, `TECH_UNIV_001`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstitutionId(pub String);

impl InstitutionId {
    /// Create a new InstitutionId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for InstitutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstitutionId({})", self.0)
    }
}

impl fmt::Display for InstitutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InstitutionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstitutionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for InstitutionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Globally unique certificate identifier.
///
/// Issued ids have the shape `CERT-<institution id>-<token>`. Seeded or
/// restored certificates may carry any non-empty id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateId(pub String);

impl CertificateId {
    /// Prefix of every generated certificate id.
    pub const PREFIX: &'static str = "CERT";

    /// Create a CertificateId from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Compose the id for a certificate issued by `institution` with the given token.
    pub fn compose(institution: &InstitutionId, token: &str) -> Self {
        Self(format!("{}-{}-{}", Self::PREFIX, institution, token))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CertificateId({})", self.0)
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CertificateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CertificateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CertificateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A fingerprint: the hex rendering of a [`FingerprintHasher`](crate::FingerprintHasher) output.
///
/// Used for certificate integrity hashes and block hashes. The literal
/// `"0"` marks the genesis block's missing predecessor.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    /// Wrap an existing hex string.
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// An empty fingerprint (malformed record marker).
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Check whether the fingerprint carries no digest at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.0.get(..16).unwrap_or(&self.0);
        write!(f, "Fingerprint({})", short)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Fingerprint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_id_compose() {
        let inst = InstitutionId::new("INST-1");
        let id = CertificateId::compose(&inst, "AB12CD34E");
        assert_eq!(id.as_str(), "CERT-INST-1-AB12CD34E");
    }

    #[test]
    fn test_fingerprint_debug_truncates() {
        let fp = Fingerprint::new("0123456789abcdef0123456789abcdef");
        assert_eq!(format!("{:?}", fp), "Fingerprint(0123456789abcdef)");

        let short = Fingerprint::new("5e918d2");
        assert_eq!(format!("{:?}", short), "Fingerprint(5e918d2)");
    }

    #[test]
    fn test_ids_serialize_as_strings() {
        let id = CertificateId::new("CERT-X-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"CERT-X-1\"");

        let back: CertificateId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_empty_fingerprint() {
        assert!(Fingerprint::empty().is_empty());
        assert!(!Fingerprint::from("0").is_empty());
    }
}
