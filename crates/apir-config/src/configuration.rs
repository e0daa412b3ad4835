//! # Live Configurations
//!
//! A [`Configuration`] is one configuration instance as supplied by the
//! host: a pid (plus factory pid and instance name for factory instances),
//! a flat property map, and the artifacts it came from. Property names are
//! looked up case-insensitively.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use apir_core::ArtifactId;

use crate::entity::find_ignore_case;

/// A configuration instance to validate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    /// Configuration pid; for factory instances `factoryPid~name`.
    pub pid: String,
    /// Factory pid of a factory instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory_pid: Option<String>,
    /// Property values.
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
    /// Artifacts that supplied this configuration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feature_origins: Vec<ArtifactId>,
    /// Per-property origins, overriding `feature_origins`.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub property_origins: IndexMap<String, Vec<ArtifactId>>,
}

impl Configuration {
    /// A singleton configuration.
    pub fn new(pid: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            ..Self::default()
        }
    }

    /// A factory configuration instance.
    pub fn factory(factory_pid: impl Into<String>, name: impl Into<String>) -> Self {
        let factory_pid = factory_pid.into();
        let name = name.into();
        Self {
            pid: format!("{factory_pid}~{name}"),
            factory_pid: Some(factory_pid),
            ..Self::default()
        }
    }

    /// Builder: set a property.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Builder: add a feature origin.
    pub fn with_origin(mut self, origin: ArtifactId) -> Self {
        self.feature_origins.push(origin);
        self
    }

    /// Whether this is a factory instance.
    pub fn is_factory(&self) -> bool {
        self.factory_pid.is_some()
    }

    /// Instance name of a factory instance.
    pub fn name(&self) -> Option<&str> {
        let factory_pid = self.factory_pid.as_deref()?;
        self.pid
            .strip_prefix(factory_pid)
            .and_then(|rest| rest.strip_prefix('~'))
    }

    /// Property value by name, ignoring case.
    pub fn property(&self, name: &str) -> Option<&Value> {
        find_ignore_case(&self.properties, name).map(|(_, v)| v)
    }

    /// Origins of one property: its own if recorded, else the configuration's.
    pub fn origins_of(&self, property: &str) -> &[ArtifactId] {
        match find_ignore_case(&self.property_origins, property) {
            Some((_, origins)) if !origins.is_empty() => origins,
            _ => &self.feature_origins,
        }
    }
}
