//! # Error Hierarchy
//!
//! Structured error types shared by every API-regions crate, built with
//! `thiserror`. No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! [`ValidationError`] covers malformed primitive input (versions, ranges,
//! dates, enum names). Crates further up the stack wrap it in their own
//! structural error enums; [`ApirError`] is the umbrella for callers that
//! drive several crates at once.

use thiserror::Error;

/// Top-level error type for API regions tooling.
#[derive(Error, Debug)]
pub enum ApirError {
    /// Domain primitive validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors for domain primitives.
///
/// Each variant carries the rejected input so that a misconfigured region
/// or schema file can be diagnosed from the message alone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Version string does not follow `major[.minor[.micro[.qualifier]]]`.
    #[error("invalid version: \"{value}\" ({reason})")]
    InvalidVersion {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Version range is neither a bare version nor a bracketed interval.
    #[error("invalid version range: \"{value}\" ({reason})")]
    InvalidVersionRange {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Calendar date is not `YYYY-MM-DD`.
    #[error("invalid date: \"{0}\" (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// Unknown validation mode name.
    #[error("invalid mode: \"{0}\" (expected one of STRICT, LENIENT, SILENT, DEFINITIVE, SILENT_DEFINITIVE)")]
    InvalidMode(String),

    /// Unknown configuration region name.
    #[error("invalid region: \"{0}\" (expected GLOBAL or INTERNAL)")]
    InvalidRegion(String),

    /// Artifact id is empty or has an empty group or artifact segment.
    #[error("invalid artifact id: \"{0}\" (expected group:artifact[:version])")]
    InvalidArtifactId(String),
}
