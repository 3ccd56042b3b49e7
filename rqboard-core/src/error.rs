//! Error types for RQBOARD operations
//!
//! Only configuration loading and whole-document JSON decoding can fail.
//! Record parsing and matrix building degrade per line or per cell instead.

use std::fmt;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Errors decoding a result list or comparison document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed {what} JSON: {reason}")]
    Json { what: String, reason: String },
}

/// What was wrong with a skipped record line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordIssueKind {
    /// No `;` separating key and value
    MissingSeparator,
    /// Nothing before the `;`
    MissingKey,
    /// Key present, value segment empty
    MissingValue,
}

impl fmt::Display for RecordIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordIssueKind::MissingSeparator => f.write_str("missing ';' separator"),
            RecordIssueKind::MissingKey => f.write_str("missing key"),
            RecordIssueKind::MissingValue => f.write_str("missing value"),
        }
    }
}

/// Diagnostic for one malformed record line. Never returned as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIssue {
    /// 1-based line number in the blob
    pub line_number: usize,
    pub kind: RecordIssueKind,
    pub line: String,
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line_number, self.kind, self.line)
    }
}

/// Master error type for all RQBOARD errors.
#[derive(Debug, Error)]
pub enum RqboardError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Result type alias for RQBOARD operations.
pub type RqboardResult<T> = Result<T, RqboardError>;

// =============================================================================
// TESTS
// =============================================================================
