//! Fixture execution engine.
//!
//! Replays stream scenarios against a fresh in-memory provider per case
//! and verifies the bytes that reached the media, plus the per-call
//! element accounting.

use emberlibc_core::Context;
use emberlibc_fixture_exec::MemProvider;

use crate::HarnessError;
use crate::fixtures::{FixtureCase, FixtureSet, from_hex, to_hex};

/// Outcome of one verified fixture case.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    pub diff: Option<String>,
}

/// Runs a fixture set and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
}

impl TestRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    /// Run all cases in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Result<Vec<VerificationResult>, HarnessError> {
        fixture_set
            .cases
            .iter()
            .map(|case| execute_case(case))
            .collect()
    }
}

fn execute_case(case: &FixtureCase) -> Result<VerificationResult, HarnessError> {
    let mut provider = MemProvider::new();
    if !case.seed_media.is_empty() {
        provider.insert_file(&case.filename, &from_hex(&case.seed_media)?);
    }
    let mut ctx = Context::new(provider, 16);

    let Some(id) = ctx.fopen(&case.filename, &case.mode) else {
        let actual = "open rejected".to_string();
        return Ok(VerificationResult {
            case_name: case.name.clone(),
            passed: false,
            expected: case.expected_media.clone(),
            diff: Some(format!("expected media {}, got: {actual}", case.expected_media)),
            actual,
        });
    };
    if case.text_mode {
        ctx.set_text_mode(id, true);
    }

    let mut elements = Vec::with_capacity(case.writes.len());
    for chunk in &case.writes {
        let bytes = from_hex(chunk)?;
        elements.push(ctx.fwrite(&bytes, 1, bytes.len(), id));
    }
    ctx.fclose(id);

    let media = ctx
        .services()
        .contents(&case.filename)
        .map(to_hex)
        .unwrap_or_default();

    let media_ok = media == case.expected_media;
    let elements_ok = case.expected_elements.is_empty() || elements == case.expected_elements;
    let passed = media_ok && elements_ok;

    let diff = if passed {
        None
    } else {
        let mut notes = Vec::new();
        if !media_ok {
            notes.push(format!(
                "media mismatch: expected {}, got {media}",
                case.expected_media
            ));
        }
        if !elements_ok {
            notes.push(format!(
                "element accounting mismatch: expected {:?}, got {elements:?}",
                case.expected_elements
            ));
        }
        Some(notes.join("\n"))
    };

    Ok(VerificationResult {
        case_name: case.name.clone(),
        passed,
        expected: case.expected_media.clone(),
        actual: media,
        diff,
    })
}
