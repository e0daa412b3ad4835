//! # Package Exports
//!
//! An [`ApiExport`] is one package a region makes visible. Besides its name
//! it may carry a feature toggle, the artifact the package lived in before
//! the toggle moved it, deprecation metadata and free-form properties.
//!
//! Deprecation is either whole-package or member-scoped, never both; the
//! [`Deprecation`] enum makes the mixed form unrepresentable.

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use apir_core::{parse_date, ArtifactId, Mode};

// ---------------------------------------------------------------------------
// Deprecation
// ---------------------------------------------------------------------------

/// Severity override attached to a deprecation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeprecationMode {
    /// Usage is an error.
    Strict,
    /// Usage is a warning.
    Lenient,
}

impl DeprecationMode {
    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "STRICT",
            Self::Lenient => "LENIENT",
        }
    }

    /// Parse `STRICT` / `LENIENT`, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("STRICT") {
            Some(Self::Strict)
        } else if value.eq_ignore_ascii_case("LENIENT") {
            Some(Self::Lenient)
        } else {
            None
        }
    }
}

impl From<DeprecationMode> for Mode {
    fn from(m: DeprecationMode) -> Self {
        match m {
            DeprecationMode::Strict => Mode::Strict,
            DeprecationMode::Lenient => Mode::Lenient,
        }
    }
}

impl fmt::Display for DeprecationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message and schedule of one deprecation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationInfo {
    /// Human-readable explanation.
    pub message: String,
    /// Version or date since which the package is deprecated.
    pub since: Option<String>,
    /// Planned removal, usually `YYYY-MM-DD`.
    pub for_removal: Option<String>,
    /// Severity override.
    pub mode: Option<DeprecationMode>,
}

impl DeprecationInfo {
    /// Deprecation with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            since: None,
            for_removal: None,
            mode: None,
        }
    }

    /// Builder: set `since`.
    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    /// Builder: set the removal schedule.
    pub fn for_removal(mut self, removal: impl Into<String>) -> Self {
        self.for_removal = Some(removal.into());
        self
    }

    /// Builder: set the severity override.
    pub fn mode(mut self, mode: DeprecationMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// The removal schedule as a date, when it is one.
    pub fn for_removal_date(&self) -> Option<NaiveDate> {
        self.for_removal.as_deref().and_then(|s| parse_date(s).ok())
    }

    /// Only a message is set, so the entry serializes as a bare string.
    pub fn is_message_only(&self) -> bool {
        self.since.is_none() && self.for_removal.is_none() && self.mode.is_none()
    }
}

/// Deprecation metadata of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deprecation {
    /// The whole package is deprecated.
    Package(DeprecationInfo),
    /// Individual members (classes) are deprecated.
    Members(IndexMap<String, DeprecationInfo>),
}

impl Deprecation {
    /// Whole-package info, if this is a package deprecation.
    pub fn package_info(&self) -> Option<&DeprecationInfo> {
        match self {
            Self::Package(info) => Some(info),
            Self::Members(_) => None,
        }
    }

    /// Member infos; empty for a package deprecation.
    pub fn member_infos(&self) -> impl Iterator<Item = (&str, &DeprecationInfo)> {
        let members = match self {
            Self::Members(m) => Some(m),
            Self::Package(_) => None,
        };
        members
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

// ---------------------------------------------------------------------------
// ApiExport
// ---------------------------------------------------------------------------

/// A package exported through a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiExport {
    name: String,
    /// Feature toggle that enables the export.
    pub toggle: Option<String>,
    /// Artifact providing the package while the toggle is off.
    pub previous_artifact_id: Option<ArtifactId>,
    /// Deprecation metadata.
    pub deprecation: Option<Deprecation>,
    /// Passthrough properties.
    pub properties: IndexMap<String, String>,
}

impl ApiExport {
    /// Export of `name` with no extras.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            toggle: None,
            previous_artifact_id: None,
            deprecation: None,
            properties: IndexMap::new(),
        }
    }

    /// Package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builder: set deprecation metadata.
    pub fn with_deprecation(mut self, deprecation: Deprecation) -> Self {
        self.deprecation = Some(deprecation);
        self
    }

    /// Builder: set the toggle.
    pub fn with_toggle(mut self, toggle: impl Into<String>) -> Self {
        self.toggle = Some(toggle.into());
        self
    }

    /// Whole-package deprecation info, if any.
    pub fn package_deprecation(&self) -> Option<&DeprecationInfo> {
        self.deprecation.as_ref().and_then(Deprecation::package_info)
    }

    /// No toggle, previous artifact, deprecation or properties.
    pub fn is_plain(&self) -> bool {
        self.toggle.is_none()
            && self.previous_artifact_id.is_none()
            && self.deprecation.is_none()
            && self.properties.is_empty()
    }
}

impl fmt::Display for ApiExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_date_parses_when_dated() {
        let info = DeprecationInfo::new("gone").for_removal("2030-01-31");
        assert_eq!(info.for_removal_date(), parse_date("2030-01-31").ok());
        let vague = DeprecationInfo::new("gone").for_removal("next major");
        assert!(vague.for_removal_date().is_none());
    }

    #[test]
    fn message_only_detection() {
        assert!(DeprecationInfo::new("m").is_message_only());
        assert!(!DeprecationInfo::new("m").since("1.2").is_message_only());
        assert!(!DeprecationInfo::new("m").mode(DeprecationMode::Lenient).is_message_only());
    }

    #[test]
    fn member_infos_empty_for_package() {
        let dep = Deprecation::Package(DeprecationInfo::new("m"));
        assert_eq!(dep.member_infos().count(), 0);
        assert!(dep.package_info().is_some());
    }

    #[test]
    fn member_infos_preserve_order() {
        let mut members = IndexMap::new();
        members.insert("Zeta".to_string(), DeprecationInfo::new("z"));
        members.insert("Alpha".to_string(), DeprecationInfo::new("a"));
        let dep = Deprecation::Members(members);
        let names: Vec<&str> = dep.member_infos().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        assert!(dep.package_info().is_none());
    }

    #[test]
    fn deprecation_mode_maps_to_validation_mode() {
        assert_eq!(Mode::from(DeprecationMode::Strict), Mode::Strict);
        assert_eq!(Mode::from(DeprecationMode::Lenient), Mode::Lenient);
        assert_eq!(DeprecationMode::parse("lenient"), Some(DeprecationMode::Lenient));
        assert_eq!(DeprecationMode::parse("silent"), None);
    }

    #[test]
    fn plain_export() {
        let e = ApiExport::new("org.acme.api");
        assert!(e.is_plain());
        assert!(!e.clone().with_toggle("feature.x").is_plain());
        assert_eq!(e.to_string(), "org.acme.api");
    }
}
