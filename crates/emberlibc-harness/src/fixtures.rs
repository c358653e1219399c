//! Fixture loading and management.

use serde::{Deserialize, Serialize};

use crate::HarnessError;

/// A single stream-scenario fixture case.
///
/// Byte payloads are carried as lowercase hex so fixtures stay readable
/// and diffable as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// File name opened through the stream layer.
    pub filename: String,
    /// C mode string handed to open.
    pub mode: String,
    /// Apply the text-mode switch after opening.
    #[serde(default)]
    pub text_mode: bool,
    /// Media seeded before the scenario runs (hex).
    #[serde(default)]
    pub seed_media: String,
    /// Chunks written through the stream, in order (hex).
    #[serde(default)]
    pub writes: Vec<String>,
    /// Expected media content after close (hex).
    pub expected_media: String,
    /// Expected element count accepted per write call.
    #[serde(default)]
    pub expected_elements: Vec<usize>,
}

/// A collection of fixture cases for a scenario family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Scenario family name.
    pub family: String,
    /// UTC timestamp of capture.
    pub captured_at: String,
    /// Individual cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &std::path::Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

// ---------------------------------------------------------------------------
// Hex payload helpers
// ---------------------------------------------------------------------------

/// Encode bytes as lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Decode a lowercase/uppercase hex string.
pub fn from_hex(hex: &str) -> Result<Vec<u8>, HarnessError> {
    if hex.len() % 2 != 0 {
        return Err(HarnessError::OddHex);
    }
    let digits: Vec<u32> = hex
        .chars()
        .map(|c| c.to_digit(16).ok_or(HarnessError::InvalidHexDigit(c)))
        .collect::<Result<_, _>>()?;
    Ok(digits
        .chunks(2)
        .map(|pair| (pair[0] * 16 + pair[1]) as u8)
        .collect())
}
