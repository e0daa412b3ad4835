//! # Configuration Descriptions
//!
//! A [`ConfigurableEntity`] is the schema shared by configurations and
//! factory configurations. The two description types wrap it; the factory
//! variant also lists instance names reserved for the internal region.
//! [`Configurable`] gives both uniform access to the shared part.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use apir_core::{Mode, Region};

use crate::entity::{case_insensitive_map, find_ignore_case, is_false, Attributes, Describable, Described};
use crate::property::PropertyDescription;

/// Schema shared by configurations and factory configurations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigurableEntity {
    /// Descriptive fields.
    #[serde(flatten)]
    pub describable: Describable,
    /// Declared properties, keyed by name (case-insensitive).
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "case_insensitive_map"
    )]
    pub properties: IndexMap<String, PropertyDescription>,
    /// Validation mode override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    /// Region the configuration belongs to; unset means GLOBAL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    /// Undeclared properties are accepted.
    #[serde(default, skip_serializing_if = "is_false")]
    pub allow_additional_properties: bool,
    /// Undeclared properties only the internal region may set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_property_names: Vec<String>,
    /// Unrecognised keys.
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl ConfigurableEntity {
    /// Effective region.
    pub fn region(&self) -> Region {
        self.region.unwrap_or(Region::Global)
    }

    /// Declared property by name, ignoring case.
    pub fn property(&self, name: &str) -> Option<&PropertyDescription> {
        find_ignore_case(&self.properties, name).map(|(_, pd)| pd)
    }

    /// Whether `name` is declared, ignoring case.
    pub fn declares(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Whether `name` is listed as internal, ignoring case.
    pub fn is_internal_property(&self, name: &str) -> bool {
        self.internal_property_names
            .iter()
            .any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Builder: declare a property.
    pub fn with_property(mut self, name: impl Into<String>, pd: PropertyDescription) -> Self {
        self.properties.insert(name.into(), pd);
        self
    }

    /// Builder: set the region.
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Builder: set the mode override.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }
}

impl Described for ConfigurableEntity {
    fn describable(&self) -> &Describable {
        &self.describable
    }
}

/// Uniform access to the shared schema part.
pub trait Configurable: Described {
    /// Shared schema.
    fn entity(&self) -> &ConfigurableEntity;
    /// Mutable shared schema.
    fn entity_mut(&mut self) -> &mut ConfigurableEntity;
}

// ---------------------------------------------------------------------------
// ConfigurationDescription
// ---------------------------------------------------------------------------

/// Schema of a singleton configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationDescription(pub ConfigurableEntity);

impl ConfigurationDescription {
    /// Empty description.
    pub fn new() -> Self {
        Self::default()
    }
}

impl From<ConfigurableEntity> for ConfigurationDescription {
    fn from(entity: ConfigurableEntity) -> Self {
        Self(entity)
    }
}

impl Described for ConfigurationDescription {
    fn describable(&self) -> &Describable {
        &self.0.describable
    }
}

impl Configurable for ConfigurationDescription {
    fn entity(&self) -> &ConfigurableEntity {
        &self.0
    }

    fn entity_mut(&mut self) -> &mut ConfigurableEntity {
        &mut self.0
    }
}

// ---------------------------------------------------------------------------
// FactoryConfigurationDescription
// ---------------------------------------------------------------------------

/// Schema of a factory configuration and its instances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FactoryConfigurationDescription {
    /// Shared schema.
    #[serde(flatten)]
    pub entity: ConfigurableEntity,
    /// Instance names reserved for the internal region.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_names: Vec<String>,
}

impl FactoryConfigurationDescription {
    /// Empty description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append internal names, keeping order and dropping repeats.
    pub fn add_internal_names<'a>(&mut self, names: impl IntoIterator<Item = &'a String>) {
        for name in names {
            if !self.internal_names.contains(name) {
                self.internal_names.push(name.clone());
            }
        }
    }
}

impl From<ConfigurableEntity> for FactoryConfigurationDescription {
    fn from(entity: ConfigurableEntity) -> Self {
        Self {
            entity,
            internal_names: Vec::new(),
        }
    }
}

impl Described for FactoryConfigurationDescription {
    fn describable(&self) -> &Describable {
        &self.entity.describable
    }
}

impl Configurable for FactoryConfigurationDescription {
    fn entity(&self) -> &ConfigurableEntity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut ConfigurableEntity {
        &mut self.entity
    }
}

/// A description of either kind, as handed to the validator.
#[derive(Debug, Clone, Copy)]
pub enum DescriptionRef<'a> {
    /// Singleton configuration schema.
    Configuration(&'a ConfigurationDescription),
    /// Factory configuration schema.
    Factory(&'a FactoryConfigurationDescription),
}

impl<'a> DescriptionRef<'a> {
    /// Shared schema.
    pub fn entity(&self) -> &'a ConfigurableEntity {
        match self {
            Self::Configuration(d) => &d.0,
            Self::Factory(d) => &d.entity,
        }
    }

    /// Whether this is a factory schema.
    pub fn is_factory(&self) -> bool {
        matches!(self, Self::Factory(_))
    }
}

impl<'a> From<&'a ConfigurationDescription> for DescriptionRef<'a> {
    fn from(d: &'a ConfigurationDescription) -> Self {
        Self::Configuration(d)
    }
}

impl<'a> From<&'a FactoryConfigurationDescription> for DescriptionRef<'a> {
    fn from(d: &'a FactoryConfigurationDescription) -> Self {
        Self::Factory(d)
    }
}
