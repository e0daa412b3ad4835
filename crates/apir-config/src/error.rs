//! Configuration-API error types.
//!
//! These are authoring errors: a merge or validation that raises one
//! produces no partial result. Per-property findings never appear here;
//! they are collected in the validation result types instead.

use thiserror::Error;

/// Which description map a duplicate or addition refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionKind {
    /// `configurations` / `configuration-additions`.
    Configuration,
    /// `factories` / `factory-configuration-additions`.
    FactoryConfiguration,
    /// `framework-properties`.
    FrameworkProperty,
}

impl DescriptionKind {
    /// Lower-case label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::FactoryConfiguration => "factory configuration",
            Self::FrameworkProperty => "framework property",
        }
    }
}

impl std::fmt::Display for DescriptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors raised by the configuration API.
#[derive(Debug, Error)]
pub enum ConfigApiError {
    /// Two contributors describe the same pid or property.
    #[error("Duplicate {kind} description {key}")]
    DuplicateDescription { kind: DescriptionKind, key: String },

    /// Two contributors carry a pending addition for the same pid.
    #[error("Duplicate {kind} description addition {key}")]
    DuplicateAddition { kind: DescriptionKind, key: String },

    /// An addition targets a property the base description lacks.
    #[error("Property named '{property}' is not defined in {kind} {key}")]
    PropertyNotDefined {
        property: String,
        kind: DescriptionKind,
        key: String,
    },

    /// A merge chain finished with an addition that never met its base.
    #[error("No base description for {kind} description addition {key}")]
    UnresolvedAddition { kind: DescriptionKind, key: String },

    /// A factory configuration was checked against a non-factory
    /// description, or the other way round.
    #[error("{0}")]
    DescriptionMismatch(&'static str),

    /// Domain primitive rejected (mode, region, version range, date).
    #[error(transparent)]
    Validation(#[from] apir_core::ValidationError),

    /// Malformed JSON or a schema value of the wrong shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for configuration-API operations.
pub type ConfigApiResult<T> = Result<T, ConfigApiError>;
