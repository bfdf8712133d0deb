//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use certledger::{Engine, EngineConfig, Result};
use certledger_core::{Certificate, CertificateData, Institution, InstitutionId, ManualClock};
use certledger_store::ScriptedTokens;
use chrono::NaiveDate;

/// Institution registered by every fixture.
pub const FIXTURE_INSTITUTION: &str = "INST-1";

/// Clock start for fixtures (2023-11-14T22:13:20Z).
pub const FIXTURE_EPOCH: i64 = 1_700_000_000_000;

/// An engine with a manual clock, deterministic ids, and one institution.
pub struct TestFixture {
    pub engine: Engine,
    pub clock: Arc<ManualClock>,
}

impl TestFixture {
    /// Create a fixture with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a fixture with `config`.
    ///
    /// Ids are `CERT-INST-1-T000000`, `CERT-INST-1-T000001`, ... in issue order.
    pub fn with_config(config: EngineConfig) -> Self {
        let clock = Arc::new(ManualClock::new(FIXTURE_EPOCH));
        let tokens = ScriptedTokens::new((0..10_000).map(|i| format!("T{i:06}")));
        let mut engine = Engine::builder(config)
            .clock(clock.clone())
            .tokens(tokens)
            .build()
            .expect("fresh engine");
        engine
            .register_institution(Institution::new(
                FIXTURE_INSTITUTION,
                "Fixture University",
                date(2024, 1, 1),
            ))
            .expect("fresh institution");
        Self { engine, clock }
    }

    /// The fixture institution id.
    pub fn institution(&self) -> InstitutionId {
        InstitutionId::new(FIXTURE_INSTITUTION)
    }

    /// Certificate data for the fixture institution.
    pub fn data(&self, student: &str, course: &str) -> CertificateData {
        CertificateData::new(FIXTURE_INSTITUTION, student, course, date(2024, 5, 15))
    }

    /// Issue a certificate, advancing the clock by one second first.
    pub fn issue(&mut self, student: &str, course: &str) -> Result<Certificate> {
        self.clock.advance(1_000);
        let data = self.data(student, course);
        self.engine.issue_certificate(data)
    }

    /// Issue `count` certificates named `Student 0`, `Student 1`, ...
    pub fn issue_many(&mut self, count: usize) -> Result<Vec<Certificate>> {
        (0..count)
            .map(|i| self.issue(&format!("Student {i}"), "Course"))
            .collect()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a date from known-good parts.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}
