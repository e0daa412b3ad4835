//! # Validation
//!
//! Mode-driven validation of live configurations and framework properties.
//! Findings are collected into result values; only authoring errors (such as
//! validating a factory instance against a singleton description) fail the
//! call.
//!
//! | Mode              | error | warning | use default |
//! |-------------------|-------|---------|-------------|
//! | STRICT            | yes   |         |             |
//! | LENIENT           |       | yes     |             |
//! | SILENT            |       |         |             |
//! | DEFINITIVE        |       | yes     | yes         |
//! | SILENT_DEFINITIVE |       |         | yes         |

pub mod configuration;
pub mod feature;
pub mod property;
pub mod result;

pub use configuration::{region_info, region_of_origins, ConfigurationValidator, ALLOWED_PROPERTIES, SERVICE_RANKING};
pub use feature::{FeatureContent, FeatureValidator, FrameworkProperty};
pub use property::PropertyValidator;
pub use result::{ConfigurationValidationResult, FeatureValidationResult, Findings, PropertyValidationResult};
