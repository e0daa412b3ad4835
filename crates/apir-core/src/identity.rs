//! # Feature Origin Identity
//!
//! [`ArtifactId`] identifies the module or feature that contributed an
//! export, an import, or a configuration. It is deliberately thin: the
//! identifier is kept as written and only split on `:` to answer the one
//! question the engines ask, "is this the same artifact, ignoring version?".
//!
//! Accepted shapes are `group:artifact`, `group:artifact:version` and
//! `group:artifact:type[:classifier]:version`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identity of a contributing artifact (a "feature origin").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Parse an artifact id, requiring non-empty group and artifact segments.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        let mut segments = trimmed.split(':');
        let group = segments.next().unwrap_or_default();
        let artifact = segments.next().unwrap_or_default();
        if group.is_empty() || artifact.is_empty() || trimmed.split(':').any(str::is_empty) {
            return Err(ValidationError::InvalidArtifactId(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw identifier as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The group segment.
    pub fn group_id(&self) -> &str {
        self.0.split(':').next().unwrap_or_default()
    }

    /// The artifact segment.
    pub fn artifact_id(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or_default()
    }

    /// The trailing version segment, if the id carries one.
    pub fn version(&self) -> Option<&str> {
        let segments: Vec<&str> = self.0.split(':').collect();
        if segments.len() >= 3 {
            segments.last().copied()
        } else {
            None
        }
    }

    /// Everything except the version: group, artifact, and any type or
    /// classifier in between.
    fn coordinates(&self) -> Vec<&str> {
        let segments: Vec<&str> = self.0.split(':').collect();
        if segments.len() >= 3 {
            segments[..segments.len() - 1].to_vec()
        } else {
            segments
        }
    }

    /// Whether both ids name the same artifact regardless of version.
    pub fn is_same(&self, other: &ArtifactId) -> bool {
        self.coordinates() == other.coordinates()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ArtifactId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> Self {
        id.0
    }
}
