//! Validation result types.
//!
//! Findings are collected, never raised. Each result carries error and
//! warning lists plus the "use default value" flag set by definitive modes.

use indexmap::IndexMap;

use apir_core::Mode;

use crate::entity::Describable;

/// Record `msg` on `result` according to `mode`, with the entity's
/// since/enforce-on context appended.
pub(crate) fn record<R: Findings>(result: &mut R, mode: Mode, desc: Option<&Describable>, msg: &str) {
    let postfix = desc.map(Describable::message_postfix).unwrap_or_default();
    let message = format!("{msg}{postfix}");
    if mode.reports_error() {
        result.add_error(message);
    } else if mode.reports_warning() {
        result.add_warning(message);
    }
    if mode.uses_default() {
        result.set_use_default_value(true);
    }
}

/// Shared mutation surface of the result types.
pub trait Findings {
    /// Add an error.
    fn add_error(&mut self, error: String);
    /// Add a warning.
    fn add_warning(&mut self, warning: String);
    /// Set the "use default value" flag.
    fn set_use_default_value(&mut self, value: bool);
}

// ---------------------------------------------------------------------------
// PropertyValidationResult
// ---------------------------------------------------------------------------

/// Outcome of validating one property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyValidationResult {
    /// Errors.
    pub errors: Vec<String>,
    /// Warnings.
    pub warnings: Vec<String>,
    /// The declared default should replace the supplied value.
    pub use_default_value: bool,
}

impl PropertyValidationResult {
    /// No errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Findings for PropertyValidationResult {
    fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    fn set_use_default_value(&mut self, value: bool) {
        self.use_default_value = value;
    }
}

// ---------------------------------------------------------------------------
// ConfigurationValidationResult
// ---------------------------------------------------------------------------

/// Outcome of validating one configuration instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationValidationResult {
    /// Configuration-level errors.
    pub errors: Vec<String>,
    /// Configuration-level warnings.
    pub warnings: Vec<String>,
    /// The whole configuration should fall back to defaults.
    pub use_default_value: bool,
    /// Per-property results, in configuration order.
    pub property_results: IndexMap<String, PropertyValidationResult>,
}

impl ConfigurationValidationResult {
    /// No errors on the configuration or any property.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.property_results.values().all(|r| r.is_valid())
    }

    /// Every message of the configuration and its properties, errors first,
    /// property messages prefixed with the property name.
    pub fn all_errors(&self) -> Vec<String> {
        let mut out = self.errors.clone();
        for (name, result) in &self.property_results {
            out.extend(result.errors.iter().map(|e| format!("{name} : {e}")));
        }
        out
    }

    /// Every warning, property warnings prefixed with the property name.
    pub fn all_warnings(&self) -> Vec<String> {
        let mut out = self.warnings.clone();
        for (name, result) in &self.property_results {
            out.extend(result.warnings.iter().map(|w| format!("{name} : {w}")));
        }
        out
    }
}

impl Findings for ConfigurationValidationResult {
    fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    fn set_use_default_value(&mut self, value: bool) {
        self.use_default_value = value;
    }
}

// ---------------------------------------------------------------------------
// FeatureValidationResult
// ---------------------------------------------------------------------------

/// Outcome of validating every configuration and framework property of a
/// feature or assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureValidationResult {
    /// Results by configuration pid.
    pub configuration_results: IndexMap<String, ConfigurationValidationResult>,
    /// Results by framework property name.
    pub framework_property_results: IndexMap<String, PropertyValidationResult>,
}

impl FeatureValidationResult {
    /// No errors anywhere.
    pub fn is_valid(&self) -> bool {
        self.configuration_results.values().all(|r| r.is_valid())
            && self.framework_property_results.values().all(|r| r.is_valid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_follows_mode_table() {
        let cases = [
            (Mode::Strict, 1, 0, false),
            (Mode::Lenient, 0, 1, false),
            (Mode::Silent, 0, 0, false),
            (Mode::Definitive, 0, 1, true),
            (Mode::SilentDefinitive, 0, 0, true),
        ];
        for (mode, errors, warnings, use_default) in cases {
            let mut r = PropertyValidationResult::default();
            record(&mut r, mode, None, "bad");
            assert_eq!(r.errors.len(), errors, "{mode}");
            assert_eq!(r.warnings.len(), warnings, "{mode}");
            assert_eq!(r.use_default_value, use_default, "{mode}");
        }
    }

    #[test]
    fn record_appends_context() {
        let desc = Describable {
            since: Some("2.0".into()),
            ..Default::default()
        };
        let mut r = ConfigurationValidationResult::default();
        record(&mut r, Mode::Strict, Some(&desc), "Configuration is not allowed");
        assert_eq!(r.errors, vec!["Configuration is not allowed. Since : 2.0"]);
    }

    #[test]
    fn configuration_validity_includes_properties() {
        let mut r = ConfigurationValidationResult::default();
        assert!(r.is_valid());
        let mut p = PropertyValidationResult::default();
        p.add_error("nope".into());
        r.property_results.insert("a".into(), p);
        assert!(!r.is_valid());
        assert_eq!(r.all_errors(), vec!["a : nope"]);
    }

    #[test]
    fn feature_validity() {
        let mut f = FeatureValidationResult::default();
        assert!(f.is_valid());
        let mut p = PropertyValidationResult::default();
        p.add_warning("meh".into());
        f.framework_property_results.insert("fw".into(), p);
        assert!(f.is_valid());
        let mut c = ConfigurationValidationResult::default();
        c.add_error("no".into());
        f.configuration_results.insert("pid".into(), c);
        assert!(!f.is_valid());
    }
}
