//! Conformance testing harness for emberlibc.
//!
//! This crate provides:
//! - Fixture schema + loading: stream scenarios as JSON reference data
//! - Fixture runner: replay scenarios against the in-memory provider
//! - Structured logging: JSONL log records with SHA-256 artifact integrity
//!
//! Host-side tooling only; nothing here ships to the firmware target.

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod fixtures;
pub mod runner;
pub mod structured_log;

pub use fixtures::{FixtureCase, FixtureSet};
pub use runner::{TestRunner, VerificationResult};

/// Harness-level failure taxonomy.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed fixture: {0}")]
    MalformedFixture(#[from] serde_json::Error),
    #[error("odd-length hex string")]
    OddHex,
    #[error("invalid hex digit {0:?}")]
    InvalidHexDigit(char),
    #[error("log line missing required field `{0}`")]
    MissingLogField(&'static str),
}
