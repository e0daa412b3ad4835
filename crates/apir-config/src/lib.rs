//! # apir-config: Configuration API
//!
//! Schemas for configurations, factory configurations and framework
//! properties, merged across contributing artifacts and used to validate
//! the configuration a feature actually supplies.
//!
//! - [`api`]: the [`ConfigurationApi`] aggregate and its JSON form.
//! - [`description`], [`property`], [`addition`]: the schema records.
//! - [`merge`]: folding contributors into one aggregate.
//! - [`validation`]: property, configuration and feature validators.
//! - [`artifacts`]: version rules for artifacts in an assembly.

pub mod addition;
pub mod api;
pub mod artifacts;
pub mod configuration;
pub mod description;
pub mod entity;
pub mod error;
pub mod merge;
pub mod property;
pub mod validation;

pub use addition::{ConfigurationDescriptionAddition, FactoryConfigurationDescriptionAddition, PropertyDescriptionAddition};
pub use api::ConfigurationApi;
pub use artifacts::{artifact_version, ArtifactRules, VersionRule};
pub use configuration::Configuration;
pub use description::{
    Configurable, ConfigurableEntity, ConfigurationDescription, DescriptionRef, FactoryConfigurationDescription,
};
pub use entity::{Attributes, Describable, Described};
pub use error::{ConfigApiError, ConfigApiResult, DescriptionKind};
pub use merge::{merge, merge_all, MergeKind};
pub use property::{FrameworkPropertyDescription, Pattern, PropertyDescription, PropertyOption, PropertyType, Range};
pub use validation::{
    ConfigurationValidationResult, ConfigurationValidator, FeatureContent, FeatureValidationResult, FeatureValidator,
    FrameworkProperty, PropertyValidationResult, PropertyValidator,
};
