//! Structured logging contract for emberlibc test workflows.
//!
//! Provides:
//! - [`LogEntry`]: canonical JSONL log record with required + optional fields.
//! - [`LogEmitter`]: writes JSONL lines to any sink.
//! - [`validate_log_line`]: validates a single JSONL line against the schema.
//! - [`ArtifactIndex`]: links logs to verification artifacts with SHA-256
//!   integrity.

use std::io::Write;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::HarnessError;

// ---------------------------------------------------------------------------
// Log entry
// ---------------------------------------------------------------------------

/// Severity level for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Test/verification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
    Error,
}

/// Canonical structured log entry.
///
/// Required fields: `timestamp`, `trace_id`, `level`, `event`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    // Required
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    // Optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl LogEntry {
    pub fn new(
        timestamp: impl Into<String>,
        trace_id: impl Into<String>,
        level: LogLevel,
        event: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            campaign: None,
            case: None,
            outcome: None,
            detail: None,
        }
    }
}

/// Validate a single JSONL line against the log schema.
pub fn validate_log_line(line: &str) -> Result<LogEntry, HarnessError> {
    let entry: LogEntry = serde_json::from_str(line)?;
    if entry.timestamp.is_empty() {
        return Err(HarnessError::MissingLogField("timestamp"));
    }
    if entry.trace_id.is_empty() {
        return Err(HarnessError::MissingLogField("trace_id"));
    }
    if entry.event.is_empty() {
        return Err(HarnessError::MissingLogField("event"));
    }
    Ok(entry)
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Writes JSONL lines to a sink.
pub struct LogEmitter<W: Write> {
    sink: W,
}

impl<W: Write> LogEmitter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn emit(&mut self, entry: &LogEntry) -> Result<(), HarnessError> {
        let line = serde_json::to_string(entry)?;
        writeln!(self.sink, "{line}")?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

// ---------------------------------------------------------------------------
// Artifact integrity
// ---------------------------------------------------------------------------

/// SHA-256 of `bytes`, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(64);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// One verification artifact with its content hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub path: String,
    pub sha256: String,
}

/// Links log lines to verification artifacts with content integrity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactIndex {
    pub artifacts: Vec<ArtifactRecord>,
}

impl ArtifactIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an artifact by hashing its content.
    pub fn push(&mut self, path: impl Into<String>, content: &[u8]) {
        self.artifacts.push(ArtifactRecord {
            path: path.into(),
            sha256: sha256_hex(content),
        });
    }

    /// Check a payload against the recorded hash for `path`.
    pub fn verify(&self, path: &str, content: &[u8]) -> bool {
        self.artifacts
            .iter()
            .any(|record| record.path == path && record.sha256 == sha256_hex(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_then_validate_round_trips() {
        let mut entry = LogEntry::new("2026-08-01T00:00:00Z", "t-1", LogLevel::Info, "case_done");
        entry.outcome = Some(Outcome::Pass);
        entry.case = Some("text_ab_nl".to_string());

        let mut emitter = LogEmitter::new(Vec::new());
        emitter.emit(&entry).expect("emit");
        let buf = emitter.into_inner();
        let line = String::from_utf8(buf).expect("utf8");

        let back = validate_log_line(line.trim()).expect("valid line");
        assert_eq!(back.trace_id, "t-1");
        assert_eq!(back.outcome, Some(Outcome::Pass));
    }

    #[test]
    fn validate_rejects_empty_required_fields() {
        let line = r#"{"timestamp":"","trace_id":"t","level":"info","event":"e"}"#;
        assert!(matches!(
            validate_log_line(line),
            Err(HarnessError::MissingLogField("timestamp"))
        ));
    }

    #[test]
    fn validate_rejects_unknown_level() {
        let line = r#"{"timestamp":"x","trace_id":"t","level":"loud","event":"e"}"#;
        assert!(validate_log_line(line).is_err());
    }

    #[test]
    fn artifact_index_verifies_content() {
        let mut index = ArtifactIndex::new();
        index.push("out/flush.bin", b"ABC");
        assert!(index.verify("out/flush.bin", b"ABC"));
        assert!(!index.verify("out/flush.bin", b"ABD"));
        assert!(!index.verify("out/other.bin", b"ABC"));
    }

    #[test]
    fn sha256_hex_is_stable() {
        // Known digest of the empty input.
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
