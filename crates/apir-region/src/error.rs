//! Region-model error types.
//!
//! Everything here is an authoring error in a region document: the
//! surrounding merge or analysis stops as soon as one is raised.

use thiserror::Error;

/// Errors raised while building, merging or decoding regions.
#[derive(Debug, Error)]
pub enum RegionError {
    /// Two regions share a name.
    #[error("Region '{name}' is defined twice")]
    DuplicateRegion { name: String },

    /// An explicit parent reference names no earlier region.
    #[error("Region '{name}' refers to unknown parent region '{parent}'")]
    UnknownParent { name: String, parent: String },

    /// Two exports in one region share a name.
    #[error("Export {export} is defined twice in region {region}")]
    DuplicateExport { export: String, region: String },

    /// The `deprecated` entry of an export is malformed.
    #[error("Invalid deprecation information for export {export}: {detail}")]
    MalformedDeprecation { export: String, detail: String },

    /// A JSON value had an unexpected shape.
    #[error("Invalid region JSON at {context}: {detail}")]
    Malformed { context: String, detail: String },

    /// Domain primitive rejected (artifact id, date).
    #[error(transparent)]
    Validation(#[from] apir_core::ValidationError),

    /// Generic serde_json error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for region operations.
pub type RegionResult<T> = Result<T, RegionError>;
