//! # Configuration Validator
//!
//! Validates one [`Configuration`] against a configuration or factory
//! configuration description. Declared properties go through the
//! [`PropertyValidator`]; undeclared ones are checked against the region
//! rules: internal property names need the internal region, and anything
//! outside the always-allowed service properties needs either the internal
//! region or `allow-additional-properties`.
//!
//! The region of a property is derived from the artifacts that supplied it,
//! looked up in the per-origin region cache accumulated by merges.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::trace;

use apir_core::{ArtifactId, Mode, Region};

use crate::configuration::Configuration;
use crate::description::{ConfigurableEntity, DescriptionRef};
use crate::error::{ConfigApiError, ConfigApiResult};
use crate::validation::property::PropertyValidator;
use crate::validation::result::{record, ConfigurationValidationResult, PropertyValidationResult};

/// Service ranking property; must hold a 32-bit integer.
pub const SERVICE_RANKING: &str = "service.ranking";

/// Undeclared properties every configuration may carry.
pub const ALLOWED_PROPERTIES: [&str; 3] = ["service.description", "service.vendor", SERVICE_RANKING];

/// Region of a set of contributing artifacts.
///
/// Any GLOBAL contributor makes the result GLOBAL. Artifacts missing from
/// the cache count as `default`, and so does an empty origin list.
pub fn region_of_origins(default: Region, origins: &[ArtifactId], cache: &IndexMap<ArtifactId, Region>) -> Region {
    if origins.is_empty() {
        return default;
    }
    let any_global = origins
        .iter()
        .any(|id| cache.get(id).copied().unwrap_or(default) == Region::Global);
    if any_global {
        Region::Global
    } else {
        Region::Internal
    }
}

/// Region of one property of `config`: its own origins if recorded,
/// otherwise the configuration's.
pub fn region_info(
    default: Region,
    config: &Configuration,
    property: &str,
    cache: &IndexMap<ArtifactId, Region>,
) -> Region {
    region_of_origins(default, config.origins_of(property), cache)
}

fn is_allowed_property(name: &str) -> bool {
    ALLOWED_PROPERTIES.iter().any(|p| p.eq_ignore_ascii_case(name))
}

fn is_integer(value: &Value) -> bool {
    value
        .as_i64()
        .is_some_and(|n| i32::try_from(n).is_ok())
}

/// Validates configurations against their descriptions.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationValidator {
    property_validator: PropertyValidator,
    cache: IndexMap<ArtifactId, Region>,
}

impl ConfigurationValidator {
    /// Validator with an empty region cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: validate live values.
    pub fn with_live_values(mut self, live_values: bool) -> Self {
        self.property_validator = self.property_validator.with_live_values(live_values);
        self
    }

    /// Builder: use a per-origin region cache.
    pub fn with_region_cache(mut self, cache: IndexMap<ArtifactId, Region>) -> Self {
        self.cache = cache;
        self
    }

    /// Whether live values are validated.
    pub fn is_live_values(&self) -> bool {
        self.property_validator.is_live_values()
    }

    /// The per-origin region cache.
    pub fn region_cache(&self) -> &IndexMap<ArtifactId, Region> {
        &self.cache
    }

    /// Validate `config` against `desc` in the scope of `region`.
    ///
    /// The description's mode wins over `mode`, which defaults to STRICT.
    /// Validating a factory instance against a singleton description (or
    /// the reverse) is an error regardless of mode.
    pub fn validate<'a>(
        &self,
        config: &Configuration,
        desc: impl Into<DescriptionRef<'a>>,
        region: Region,
        mode: Option<Mode>,
    ) -> ConfigApiResult<ConfigurationValidationResult> {
        let desc = desc.into();
        match (config.is_factory(), desc.is_factory()) {
            (true, false) => {
                return Err(ConfigApiError::DescriptionMismatch(
                    "Factory configuration cannot be validated against non factory configuration description",
                ))
            }
            (false, true) => {
                return Err(ConfigApiError::DescriptionMismatch(
                    "Configuration cannot be validated against factory configuration description",
                ))
            }
            _ => {}
        }

        let entity = desc.entity();
        let mode = entity.mode.or(mode).unwrap_or_default();
        let not_allowed = if desc.is_factory() {
            "Factory configuration is not allowed"
        } else {
            "Configuration is not allowed"
        };

        let mut result = ConfigurationValidationResult::default();
        let disallowed = if entity.properties.is_empty() {
            region == Region::Global && !entity.allow_additional_properties
        } else {
            region == Region::Global && entity.region() == Region::Internal
        };

        if disallowed {
            trace!(pid = %config.pid, "configuration not allowed in global scope");
            record(&mut result, mode, Some(&entity.describable), not_allowed);
            self.mark_global_properties(config, &mut result, region);
        } else if !entity.properties.is_empty() {
            self.validate_properties(config, entity, &mut result.property_results, region, mode);
        }

        if let Some(deprecated) = &entity.describable.deprecated {
            record(&mut result, Mode::Lenient, Some(&entity.describable), deprecated);
        }

        Ok(result)
    }

    /// Flag every globally supplied property to fall back to its default
    /// once the configuration itself has been rejected under a definitive
    /// mode.
    fn mark_global_properties(&self, config: &Configuration, result: &mut ConfigurationValidationResult, region: Region) {
        if !result.use_default_value {
            return;
        }
        for name in config.properties.keys() {
            if region_info(region, config, name, &self.cache) == Region::Global {
                result.property_results.insert(
                    name.clone(),
                    PropertyValidationResult {
                        use_default_value: true,
                        ..Default::default()
                    },
                );
            }
        }
    }

    fn validate_properties(
        &self,
        config: &Configuration,
        entity: &ConfigurableEntity,
        results: &mut IndexMap<String, PropertyValidationResult>,
        region: Region,
        mode: Mode,
    ) {
        for (name, pd) in &entity.properties {
            let outcome = self.property_validator.validate(config.property(name), pd, mode);
            results.insert(name.clone(), outcome);
        }

        for (name, value) in &config.properties {
            if entity.declares(name) {
                continue;
            }
            let prop_region = region_info(region, config, name, &self.cache);
            let mut outcome = PropertyValidationResult::default();

            if entity.is_internal_property(name) {
                if prop_region != Region::Internal {
                    record(&mut outcome, mode, Some(&entity.describable), "Property is not allowed");
                }
            } else if name.eq_ignore_ascii_case(SERVICE_RANKING) {
                if !is_integer(value) {
                    record(
                        &mut outcome,
                        mode,
                        Some(&entity.describable),
                        "service.ranking must be of type Integer",
                    );
                }
            } else if !is_allowed_property(name)
                && prop_region != Region::Internal
                && !entity.allow_additional_properties
            {
                record(&mut outcome, mode, Some(&entity.describable), "Property is not allowed");
            }

            results.insert(name.clone(), outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::{ConfigurationDescription, FactoryConfigurationDescription};
    use crate::property::{PropertyDescription, PropertyType};
    use serde_json::json;

    fn id(s: &str) -> ArtifactId {
        ArtifactId::parse(s).unwrap()
    }

    fn described() -> ConfigurationDescription {
        ConfigurationDescription(
            ConfigurableEntity::default().with_property("port", PropertyDescription::of_type(PropertyType::Integer)),
        )
    }

    #[test]
    fn mismatched_kinds_are_fatal() {
        let v = ConfigurationValidator::new();
        let factory = Configuration::factory("f", "n");
        let err = v
            .validate(&factory, &ConfigurationDescription::new(), Region::Global, None)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Factory configuration cannot be validated against non factory configuration description"
        );

        let single = Configuration::new("pid");
        let err = v
            .validate(&single, &FactoryConfigurationDescription::new(), Region::Global, None)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration cannot be validated against factory configuration description"
        );
    }

    #[test]
    fn empty_schema_not_allowed_in_global() {
        let v = ConfigurationValidator::new();
        let config = Configuration::new("pid").with_property("a", 1);
        let r = v
            .validate(&config, &ConfigurationDescription::new(), Region::Global, None)
            .unwrap();
        assert_eq!(r.errors, vec!["Configuration is not allowed"]);

        let r = v
            .validate(&config, &ConfigurationDescription::new(), Region::Internal, None)
            .unwrap();
        assert!(r.is_valid());
        assert!(r.property_results.is_empty());
    }

    #[test]
    fn empty_factory_schema_message() {
        let v = ConfigurationValidator::new();
        let config = Configuration::factory("f", "n");
        let r = v
            .validate(&config, &FactoryConfigurationDescription::new(), Region::Global, None)
            .unwrap();
        assert_eq!(r.errors, vec!["Factory configuration is not allowed"]);
    }

    #[test]
    fn empty_schema_with_additional_properties_is_allowed() {
        let v = ConfigurationValidator::new();
        let mut entity = ConfigurableEntity::default();
        entity.allow_additional_properties = true;
        let config = Configuration::new("pid").with_property("anything", "x");
        let r = v
            .validate(&config, &ConfigurationDescription(entity), Region::Global, None)
            .unwrap();
        assert!(r.is_valid());
    }

    #[test]
    fn internal_schema_rejected_in_global_scope() {
        let v = ConfigurationValidator::new();
        let desc = ConfigurationDescription(described().0.with_region(Region::Internal));
        let config = Configuration::new("pid").with_property("port", 1);
        let r = v.validate(&config, &desc, Region::Global, None).unwrap();
        assert_eq!(r.errors, vec!["Configuration is not allowed"]);
        let r = v.validate(&config, &desc, Region::Internal, None).unwrap();
        assert!(r.is_valid());
    }

    #[test]
    fn declared_properties_are_validated() {
        let v = ConfigurationValidator::new();
        let config = Configuration::new("pid").with_property("PORT", "x");
        let r = v.validate(&config, &described(), Region::Global, None).unwrap();
        assert!(!r.is_valid());
        assert_eq!(r.property_results["port"].errors, vec!["Value is not a integer"]);
        assert_eq!(r.all_errors(), vec!["port : Value is not a integer"]);
    }

    #[test]
    fn additional_property_rules() {
        let v = ConfigurationValidator::new();
        let config = Configuration::new("pid")
            .with_property("port", 80)
            .with_property("extra", "x")
            .with_property("service.vendor", "acme")
            .with_property("Service.Ranking", 5);
        let r = v.validate(&config, &described(), Region::Global, None).unwrap();
        assert_eq!(r.property_results["extra"].errors, vec!["Property is not allowed"]);
        assert!(r.property_results["service.vendor"].is_valid());
        assert!(r.property_results["Service.Ranking"].is_valid());

        let r = v.validate(&config, &described(), Region::Internal, None).unwrap();
        assert!(r.is_valid());
    }

    #[test]
    fn service_ranking_must_be_integer() {
        let v = ConfigurationValidator::new();
        for bad in [json!("5"), json!(1.5), json!(i64::from(i32::MAX) + 1)] {
            let config = Configuration::new("pid").with_property(SERVICE_RANKING, bad);
            let r = v.validate(&config, &described(), Region::Internal, None).unwrap();
            assert_eq!(
                r.property_results[SERVICE_RANKING].errors,
                vec!["service.ranking must be of type Integer"]
            );
        }
    }

    #[test]
    fn internal_property_names_need_internal_origin() {
        let mut entity = described().0;
        entity.internal_property_names.push("secret".into());
        let desc = ConfigurationDescription(entity);

        let global = id("g:global:1");
        let internal = id("g:internal:1");
        let mut cache = IndexMap::new();
        cache.insert(global.clone(), Region::Global);
        cache.insert(internal.clone(), Region::Internal);
        let v = ConfigurationValidator::new().with_region_cache(cache);

        let mut config = Configuration::new("pid").with_property("secret", "x").with_origin(global);
        let r = v.validate(&config, &desc, Region::Global, None).unwrap();
        assert_eq!(r.property_results["secret"].errors, vec!["Property is not allowed"]);

        config.property_origins.insert("secret".into(), vec![internal]);
        let r = v.validate(&config, &desc, Region::Global, None).unwrap();
        assert!(r.is_valid());
    }

    #[test]
    fn region_of_origins_prefers_global() {
        let a = id("g:a:1");
        let b = id("g:b:1");
        let mut cache = IndexMap::new();
        cache.insert(a.clone(), Region::Internal);
        cache.insert(b.clone(), Region::Global);
        assert_eq!(region_of_origins(Region::Global, &[], &cache), Region::Global);
        assert_eq!(region_of_origins(Region::Internal, &[], &cache), Region::Internal);
        assert_eq!(region_of_origins(Region::Global, &[a.clone()], &cache), Region::Internal);
        assert_eq!(region_of_origins(Region::Internal, &[a.clone(), b], &cache), Region::Global);
        assert_eq!(region_of_origins(Region::Global, &[a, id("g:unknown:1")], &cache), Region::Global);
    }

    #[test]
    fn description_mode_wins() {
        let v = ConfigurationValidator::new();
        let desc = ConfigurationDescription::from(ConfigurableEntity::default().with_mode(Mode::Lenient));
        let config = Configuration::new("pid");
        let r = v.validate(&config, &desc, Region::Global, Some(Mode::Strict)).unwrap();
        assert!(r.errors.is_empty());
        assert_eq!(r.warnings, vec!["Configuration is not allowed"]);
    }

    #[test]
    fn definitive_marks_global_properties() {
        let internal = id("g:internal:1");
        let mut cache = IndexMap::new();
        cache.insert(internal.clone(), Region::Internal);
        let v = ConfigurationValidator::new().with_region_cache(cache);

        let mut config = Configuration::new("pid").with_property("a", 1).with_property("b", 2);
        config.property_origins.insert("b".into(), vec![internal]);

        let r = v
            .validate(&config, &ConfigurationDescription::new(), Region::Global, Some(Mode::Definitive))
            .unwrap();
        assert!(r.use_default_value);
        assert_eq!(r.warnings, vec!["Configuration is not allowed"]);
        assert!(r.property_results["a"].use_default_value);
        assert!(!r.property_results.contains_key("b"));

        let r = v
            .validate(&config, &ConfigurationDescription::new(), Region::Global, Some(Mode::Strict))
            .unwrap();
        assert!(r.property_results.is_empty());
    }

    #[test]
    fn deprecated_description_warns() {
        let v = ConfigurationValidator::new();
        let mut entity = described().0;
        entity.describable.deprecated = Some("Use org.acme.Other".into());
        entity.describable.since = Some("3.1".into());
        let config = Configuration::new("pid").with_property("port", 1);
        let r = v
            .validate(&config, &ConfigurationDescription(entity), Region::Global, None)
            .unwrap();
        assert!(r.is_valid());
        assert_eq!(r.warnings, vec!["Use org.acme.Other. Since : 3.1"]);
    }

    #[test]
    fn live_values_flag_reaches_property_validator() {
        let v = ConfigurationValidator::new().with_live_values(true);
        assert!(v.is_live_values());
        let config = Configuration::new("pid").with_property("port", "$[env:PORT]");
        let r = v.validate(&config, &described(), Region::Global, None).unwrap();
        assert!(!r.is_valid());
        let r = ConfigurationValidator::new()
            .validate(&config, &described(), Region::Global, None)
            .unwrap();
        assert!(r.is_valid());
    }
}
