//! Analyser error types.
//!
//! A task fails only on broken input it cannot reason about: a malformed
//! setting or a region or configuration API document that does not decode.
//! Everything the task finds about the assembly goes into the report.

use thiserror::Error;

use apir_config::ConfigApiError;
use apir_region::RegionError;

/// Errors raised while running analyser tasks.
#[derive(Debug, Error)]
pub enum AnalyserError {
    /// A task setting has a value of the wrong shape.
    #[error("Invalid value '{value}' for setting '{key}' of task {task}")]
    InvalidSetting {
        task: String,
        key: String,
        value: String,
    },

    /// An enabled task id is not known.
    #[error("Unknown analyser task: {0}")]
    UnknownTask(String),

    /// Region document failure.
    #[error(transparent)]
    Region(#[from] RegionError),

    /// Configuration API failure.
    #[error(transparent)]
    ConfigApi(#[from] ConfigApiError),

    /// Domain primitive rejected.
    #[error(transparent)]
    Validation(#[from] apir_core::ValidationError),
}

/// Convenience alias for analyser operations.
pub type AnalyserResult<T> = Result<T, AnalyserError>;
