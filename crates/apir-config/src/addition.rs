//! # Description Additions
//!
//! An addition patches a description contributed by someone else: it
//! widens the `includes` of named properties and, for factories, reserves
//! more internal instance names. Additions may arrive before the
//! description they patch; the merge engine keeps them pending until then.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::description::{ConfigurableEntity, FactoryConfigurationDescription};
use crate::entity::{find_ignore_case_mut, Attributes};
use crate::error::{ConfigApiError, ConfigApiResult, DescriptionKind};

/// Patch for one property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptionAddition {
    /// Values to append to the property's `includes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes: Option<Vec<String>>,
    /// Unrecognised keys.
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl PropertyDescriptionAddition {
    /// Addition that appends `includes`.
    pub fn includes<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            includes: Some(values.into_iter().map(Into::into).collect()),
            attributes: Attributes::new(),
        }
    }
}

/// Patch for a configuration description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDescriptionAddition {
    /// Per-property patches.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, PropertyDescriptionAddition>,
    /// Unrecognised keys.
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl ConfigurationDescriptionAddition {
    /// Builder: add a property patch.
    pub fn with_property(mut self, name: impl Into<String>, addition: PropertyDescriptionAddition) -> Self {
        self.properties.insert(name.into(), addition);
        self
    }

    /// Apply the property patches to `entity`, described as `kind` `key`
    /// in error messages.
    pub fn apply_to(
        &self,
        entity: &mut ConfigurableEntity,
        kind: DescriptionKind,
        key: &str,
    ) -> ConfigApiResult<()> {
        for (name, addition) in &self.properties {
            let pd = find_ignore_case_mut(&mut entity.properties, name).ok_or_else(|| {
                ConfigApiError::PropertyNotDefined {
                    property: name.clone(),
                    kind,
                    key: key.to_string(),
                }
            })?;
            if let Some(includes) = &addition.includes {
                pd.add_includes(includes);
            }
        }
        Ok(())
    }
}

/// Patch for a factory configuration description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FactoryConfigurationDescriptionAddition {
    /// Property patches.
    #[serde(flatten)]
    pub entity: ConfigurationDescriptionAddition,
    /// Instance names to reserve for the internal region.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_names: Vec<String>,
}

impl FactoryConfigurationDescriptionAddition {
    /// Apply property patches and internal names to `description`.
    pub fn apply_to(&self, description: &mut FactoryConfigurationDescription, key: &str) -> ConfigApiResult<()> {
        self.entity
            .apply_to(&mut description.entity, DescriptionKind::FactoryConfiguration, key)?;
        description.add_internal_names(&self.internal_names);
        Ok(())
    }
}
