//! # Feature Validator
//!
//! Validates every configuration and framework property a feature supplies
//! against a [`ConfigurationApi`]. Each configuration is validated in the
//! scope of the region its contributing artifacts resolve to.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use apir_core::{ArtifactId, Region};

use crate::api::ConfigurationApi;
use crate::configuration::Configuration;
use crate::error::ConfigApiResult;
use crate::validation::configuration::{region_of_origins, ConfigurationValidator};
use crate::validation::property::PropertyValidator;
use crate::validation::result::{record, ConfigurationValidationResult, FeatureValidationResult, PropertyValidationResult};

/// A framework property value and the artifacts that set it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FrameworkProperty {
    /// Property value.
    pub value: Value,
    /// Contributing artifacts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feature_origins: Vec<ArtifactId>,
}

/// Configurations and framework properties of one feature or assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FeatureContent {
    /// Configuration instances.
    #[serde(default)]
    pub configurations: Vec<Configuration>,
    /// Framework properties by name.
    #[serde(default)]
    pub framework_properties: IndexMap<String, FrameworkProperty>,
}

/// Feature-wide configuration check.
#[derive(Debug, Clone)]
pub struct FeatureValidator {
    live_values: bool,
    default_region: Region,
}

impl Default for FeatureValidator {
    fn default() -> Self {
        Self {
            live_values: false,
            default_region: Region::Global,
        }
    }
}

impl FeatureValidator {
    /// Validator treating unknown origins as GLOBAL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: validate live values.
    pub fn with_live_values(mut self, live_values: bool) -> Self {
        self.live_values = live_values;
        self
    }

    /// Builder: region assumed for artifacts missing from the region cache.
    pub fn with_default_region(mut self, region: Region) -> Self {
        self.default_region = region;
        self
    }

    /// Validate a whole feature.
    pub fn validate_feature(&self, feature: &FeatureContent, api: &ConfigurationApi) -> ConfigApiResult<FeatureValidationResult> {
        self.validate(&feature.configurations, &feature.framework_properties, api)
    }

    /// Validate configurations and framework properties against `api`.
    pub fn validate(
        &self,
        configurations: &[Configuration],
        framework_properties: &IndexMap<String, FrameworkProperty>,
        api: &ConfigurationApi,
    ) -> ConfigApiResult<FeatureValidationResult> {
        let validator = ConfigurationValidator::new()
            .with_live_values(self.live_values)
            .with_region_cache(api.region_cache.clone());
        let mut result = FeatureValidationResult::default();

        for config in configurations {
            let region = region_of_origins(self.default_region, &config.feature_origins, &api.region_cache);
            debug!(pid = %config.pid, %region, "validating configuration");
            let outcome = match config.factory_pid.as_deref() {
                Some(factory_pid) => self.validate_factory(&validator, config, factory_pid, region, api)?,
                None => self.validate_singleton(&validator, config, region, api)?,
            };
            if let Some(outcome) = outcome {
                result.configuration_results.insert(config.pid.clone(), outcome);
            }
        }

        let property_validator = PropertyValidator::new().with_live_values(self.live_values);
        for (name, prop) in framework_properties {
            let region = region_of_origins(self.default_region, &prop.feature_origins, &api.region_cache);
            if let Some(desc) = api.framework_properties.get(name) {
                let outcome = property_validator.validate(Some(&prop.value), desc, api.mode);
                result.framework_property_results.insert(name.clone(), outcome);
            } else if region == Region::Global && api.is_internal_framework_property(name) {
                let mut outcome = PropertyValidationResult::default();
                record(&mut outcome, api.mode, None, "Framework property is not allowed");
                result.framework_property_results.insert(name.clone(), outcome);
            }
        }

        Ok(result)
    }

    fn validate_singleton(
        &self,
        validator: &ConfigurationValidator,
        config: &Configuration,
        region: Region,
        api: &ConfigurationApi,
    ) -> ConfigApiResult<Option<ConfigurationValidationResult>> {
        if let Some(desc) = api.configurations.get(&config.pid) {
            return validator.validate(config, desc, region, Some(api.mode)).map(Some);
        }
        if region == Region::Global && api.is_internal_configuration(&config.pid) {
            let mut outcome = ConfigurationValidationResult::default();
            record(&mut outcome, api.mode, None, "Configuration is not allowed");
            return Ok(Some(outcome));
        }
        Ok(None)
    }

    fn validate_factory(
        &self,
        validator: &ConfigurationValidator,
        config: &Configuration,
        factory_pid: &str,
        region: Region,
        api: &ConfigurationApi,
    ) -> ConfigApiResult<Option<ConfigurationValidationResult>> {
        if let Some(desc) = api.factories.get(factory_pid) {
            let mut outcome = validator.validate(config, desc, region, Some(api.mode))?;
            if region == Region::Global {
                if let Some(name) = config.name().filter(|n| desc.internal_names.iter().any(|i| i == n)) {
                    let mode = desc.entity.mode.unwrap_or(api.mode);
                    let msg = format!("Factory configuration with name {name} is not allowed");
                    record(&mut outcome, mode, Some(&desc.entity.describable), &msg);
                }
            }
            return Ok(Some(outcome));
        }
        if region == Region::Global && api.is_internal_factory(factory_pid) {
            let mut outcome = ConfigurationValidationResult::default();
            record(&mut outcome, api.mode, None, "Factory configuration is not allowed");
            return Ok(Some(outcome));
        }
        Ok(None)
    }
}
