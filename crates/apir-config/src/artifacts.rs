//! # Artifact Rules
//!
//! Version rules restrict which versions of an artifact an assembly may
//! contain. A rule names the artifact (version ignored), the allowed and
//! denied version ranges, the message to report, and optionally a date from
//! which the rule is enforced.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use apir_core::{parse_date, ArtifactId, Mode, Version, VersionRange};

use crate::entity::Attributes;

fn is_strict(mode: &Mode) -> bool {
    *mode == Mode::Strict
}

/// Convert a Maven style version (`1.2.3-SNAPSHOT`, `2.1b`, `r123`) to a
/// [`Version`].
///
/// Up to three leading numeric segments become major, minor and micro;
/// whatever follows becomes the qualifier, with characters a qualifier may
/// not hold replaced by `_`. Every input converts.
pub fn artifact_version(value: &str) -> Version {
    let value = value.trim();
    let (base, suffix) = value.split_once('-').unwrap_or((value, ""));

    let mut numbers = [0u64; 3];
    let mut count = 0;
    let mut rest = base;
    while count < numbers.len() {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let Ok(n) = rest[..digits].parse() else {
            break;
        };
        numbers[count] = n;
        count += 1;
        rest = &rest[digits..];
        match rest.strip_prefix('.') {
            Some(next) if count < numbers.len() && next.starts_with(|c: char| c.is_ascii_digit()) => rest = next,
            Some(next) => {
                rest = next;
                break;
            }
            None => break,
        }
    }

    let qualifier: String = [rest, suffix]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    Version::new(numbers[0], numbers[1], numbers[2]).with_qualifier(qualifier)
}

/// One version rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VersionRule {
    /// Mode override for this rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    /// Artifact the rule applies to; the version is ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<ArtifactId>,
    /// Message reported for a violation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Ranges of allowed versions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_version_ranges: Vec<VersionRange>,
    /// Ranges of denied versions, checked after the allowed ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub denied_version_ranges: Vec<VersionRange>,
    /// Date (`YYYY-MM-DD`) from which the rule is enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_on: Option<String>,
    /// Unrecognised keys.
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl VersionRule {
    /// Whether `version` is allowed. Without allowed ranges nothing is.
    pub fn is_allowed(&self, version: &Version) -> bool {
        self.allowed_version_ranges.iter().any(|r| r.includes(version))
            && !self.denied_version_ranges.iter().any(|r| r.includes(version))
    }

    /// Whether the rule applies to `id`.
    pub fn matches(&self, id: &ArtifactId) -> bool {
        self.artifact_id.as_ref().is_some_and(|a| a.is_same(id))
    }

    /// The enforce-on date, if set and well formed.
    pub fn enforce_on_date(&self) -> Option<NaiveDate> {
        self.enforce_on.as_deref().and_then(|d| parse_date(d).ok())
    }

    /// Whether the rule is enforced on `today`. A rule without a valid
    /// enforce-on date is always enforced.
    pub fn is_enforced(&self, today: NaiveDate) -> bool {
        self.enforce_on_date().map_or(true, |d| d <= today)
    }
}

/// The artifact rules attached to an assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArtifactRules {
    /// Default mode.
    #[serde(default, skip_serializing_if = "is_strict")]
    pub mode: Mode,
    /// Rules for bundles.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bundle_version_rules: Vec<VersionRule>,
    /// Unrecognised keys.
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl ArtifactRules {
    /// Rules applying to `id`.
    pub fn rules_for<'a>(&'a self, id: &'a ArtifactId) -> impl Iterator<Item = &'a VersionRule> + 'a {
        self.bundle_version_rules.iter().filter(move |r| r.matches(id))
    }
}
