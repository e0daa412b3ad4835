//! # Configuration API Aggregate
//!
//! [`ConfigurationApi`] is the aggregate root attached to a feature or an
//! assembly: every configuration, factory and framework property schema it
//! knows about, the names reserved for the internal region, its own region
//! and validation mode, the per-origin region cache built up by merges, and
//! additions still waiting for their base description.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use apir_core::{ArtifactId, Mode, Region};

use crate::addition::{ConfigurationDescriptionAddition, FactoryConfigurationDescriptionAddition};
use crate::description::{ConfigurationDescription, FactoryConfigurationDescription};
use crate::entity::Attributes;
use crate::error::{ConfigApiError, ConfigApiResult, DescriptionKind};
use crate::property::FrameworkPropertyDescription;

fn is_strict(mode: &Mode) -> bool {
    *mode == Mode::Strict
}

/// Configuration schemas of a feature or assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigurationApi {
    /// Configuration schemas by pid.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub configurations: IndexMap<String, ConfigurationDescription>,
    /// Factory configuration schemas by factory pid.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub factories: IndexMap<String, FactoryConfigurationDescription>,
    /// Framework property schemas by name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub framework_properties: IndexMap<String, FrameworkPropertyDescription>,
    /// Configuration pids only the internal region may configure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_configurations: Vec<String>,
    /// Factory pids only the internal region may configure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_factories: Vec<String>,
    /// Framework properties only the internal region may set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_framework_properties: Vec<String>,
    /// The aggregate's own region; unset means inherit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    /// Default validation mode.
    #[serde(default, skip_serializing_if = "is_strict")]
    pub mode: Mode,
    /// Region of every contributing artifact seen so far.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub region_cache: IndexMap<ArtifactId, Region>,
    /// Pending configuration additions by pid.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub configuration_additions: IndexMap<String, ConfigurationDescriptionAddition>,
    /// Pending factory additions by factory pid.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub factory_configuration_additions: IndexMap<String, FactoryConfigurationDescriptionAddition>,
    /// Unrecognised keys.
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl ConfigurationApi {
    /// Empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON form.
    pub fn parse(json: &str) -> ConfigApiResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode from a JSON value.
    pub fn from_json(value: serde_json::Value) -> ConfigApiResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Encode to a JSON value.
    pub fn to_json(&self) -> ConfigApiResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Encode to a pretty-printed JSON string.
    pub fn to_json_string(&self) -> ConfigApiResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The region recorded for this aggregate's own contributor.
    pub fn detect_region(&self) -> Region {
        self.region.unwrap_or(Region::Global)
    }

    /// Whether a configuration pid is reserved for the internal region.
    pub fn is_internal_configuration(&self, pid: &str) -> bool {
        self.internal_configurations.iter().any(|p| p == pid)
    }

    /// Whether a factory pid is reserved for the internal region.
    pub fn is_internal_factory(&self, factory_pid: &str) -> bool {
        self.internal_factories.iter().any(|p| p == factory_pid)
    }

    /// Whether a framework property is reserved for the internal region.
    pub fn is_internal_framework_property(&self, name: &str) -> bool {
        self.internal_framework_properties.iter().any(|p| p == name)
    }

    /// Fail if an addition is still waiting for its base description.
    ///
    /// Call once the last contributor of a merge chain has been folded in.
    pub fn ensure_no_pending_additions(&self) -> ConfigApiResult<()> {
        if let Some(key) = self.configuration_additions.keys().next() {
            return Err(ConfigApiError::UnresolvedAddition {
                kind: DescriptionKind::Configuration,
                key: key.clone(),
            });
        }
        if let Some(key) = self.factory_configuration_additions.keys().next() {
            return Err(ConfigApiError::UnresolvedAddition {
                kind: DescriptionKind::FactoryConfiguration,
                key: key.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_document() -> serde_json::Value {
        json!({
            "configurations": {
                "org.acme.Service": {
                    "title": "Service",
                    "properties": {"port": {"type": "INTEGER", "includes": ["80"]}}
                }
            },
            "factories": {
                "org.acme.Logger": {"internal-names": ["system"], "region": "INTERNAL"}
            },
            "framework-properties": {"org.osgi.framework.bootdelegation": {"type": "BOOLEAN"}},
            "internal-configurations": ["org.acme.Internal"],
            "internal-factories": ["org.acme.InternalFactory"],
            "internal-framework-properties": ["secret.prop"],
            "region": "INTERNAL",
            "mode": "LENIENT",
            "region-cache": {"g:a:1": "GLOBAL", "g:b:1": "INTERNAL"},
            "configuration-additions": {"org.acme.Other": {"properties": {"p": {"includes": ["x"]}}}},
            "factory-configuration-additions": {"org.acme.OtherFactory": {"internal-names": ["n"]}},
            "vendor": "acme"
        })
    }

    #[test]
    fn decodes_every_section() {
        let api = ConfigurationApi::from_json(full_document()).unwrap();
        assert_eq!(api.configurations.len(), 1);
        assert_eq!(api.factories["org.acme.Logger"].internal_names, vec!["system"]);
        assert!(api.framework_properties.contains_key("org.osgi.framework.bootdelegation"));
        assert!(api.is_internal_configuration("org.acme.Internal"));
        assert!(api.is_internal_factory("org.acme.InternalFactory"));
        assert!(api.is_internal_framework_property("secret.prop"));
        assert_eq!(api.region, Some(Region::Internal));
        assert_eq!(api.mode, Mode::Lenient);
        assert_eq!(
            api.region_cache.get(&ArtifactId::parse("g:b:1").unwrap()),
            Some(&Region::Internal)
        );
        assert!(api.configuration_additions.contains_key("org.acme.Other"));
        assert_eq!(api.attributes.get("vendor"), Some(&json!("acme")));
    }

    #[test]
    fn roundtrip_is_lossless() {
        let doc = full_document();
        let api = ConfigurationApi::from_json(doc.clone()).unwrap();
        assert_eq!(api.to_json().unwrap(), doc);
        let reparsed = ConfigurationApi::parse(&api.to_json_string().unwrap()).unwrap();
        assert_eq!(reparsed, api);
    }

    #[test]
    fn defaults() {
        let api = ConfigurationApi::parse("{}").unwrap();
        assert_eq!(api.mode, Mode::Strict);
        assert!(api.region.is_none());
        assert_eq!(api.detect_region(), Region::Global);
        assert_eq!(api.to_json().unwrap(), json!({}));
    }

    #[test]
    fn bad_enum_value_is_fatal() {
        assert!(ConfigurationApi::parse(r#"{"mode": "LOOSE"}"#).is_err());
        assert!(ConfigurationApi::parse(r#"{"region": "PUBLIC"}"#).is_err());
        assert!(ConfigurationApi::parse(r#"{"region-cache": {"bad": "GLOBAL"}}"#).is_err());
    }

    #[test]
    fn pending_additions_detected() {
        let api = ConfigurationApi::from_json(full_document()).unwrap();
        let err = api.ensure_no_pending_additions().unwrap_err();
        assert_eq!(
            err.to_string(),
            "No base description for configuration description addition org.acme.Other"
        );
        assert!(ConfigurationApi::new().ensure_no_pending_additions().is_ok());
    }
}
