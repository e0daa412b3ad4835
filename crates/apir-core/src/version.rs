//! # OSGi Versions and Version Ranges
//!
//! Package exports carry a [`Version`]; package imports and artifact rules
//! carry a [`VersionRange`]. Both follow OSGi semantics:
//!
//! - a version is `major[.minor[.micro[.qualifier]]]`, missing numeric
//!   segments default to zero, and the qualifier compares as a plain string;
//! - a range is either an interval such as `[1.0,2.0)` or `(1,2]`, or a bare
//!   version `1.0` meaning "at least 1.0".

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// An OSGi version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    major: u64,
    minor: u64,
    micro: u64,
    qualifier: String,
}

impl Version {
    /// The empty version `0.0.0`, used for exports that declare none.
    pub const fn empty() -> Self {
        Self {
            major: 0,
            minor: 0,
            micro: 0,
            qualifier: String::new(),
        }
    }

    /// Build a version from its numeric parts.
    pub fn new(major: u64, minor: u64, micro: u64) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: String::new(),
        }
    }

    /// Build a version with a qualifier.
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// Parse `major[.minor[.micro[.qualifier]]]`.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        let invalid = |reason: &str| ValidationError::InvalidVersion {
            value: value.to_string(),
            reason: reason.to_string(),
        };
        if trimmed.is_empty() {
            return Err(invalid("empty"));
        }

        let mut parts = trimmed.splitn(4, '.');
        let mut numeric = [0u64; 3];
        let labels = ["major", "minor", "micro"];
        for (slot, label) in numeric.iter_mut().zip(labels) {
            match parts.next() {
                Some(part) => {
                    *slot = part
                        .parse()
                        .map_err(|_| invalid(&format!("{label} is not a number")))?;
                }
                None => break,
            }
        }
        let qualifier = parts.next().unwrap_or_default();
        if !qualifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(invalid("qualifier contains illegal characters"));
        }

        Ok(Self {
            major: numeric[0],
            minor: numeric[1],
            micro: numeric[2],
            qualifier: qualifier.to_string(),
        })
    }

    /// Major component.
    pub fn major(&self) -> u64 {
        self.major
    }

    /// Minor component.
    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// Micro component.
    pub fn micro(&self) -> u64 {
        self.micro
    }

    /// Qualifier, empty when absent.
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::empty()
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.micro)
            .cmp(&(other.major, other.minor, other.micro))
            .then_with(|| self.qualifier.cmp(&other.qualifier))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if !self.qualifier.is_empty() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Version {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.to_string()
    }
}

// ---------------------------------------------------------------------------
// VersionRange
// ---------------------------------------------------------------------------

/// An OSGi version range.
///
/// `right == None` means the range is unbounded above, which is what a bare
/// version string denotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionRange {
    left_closed: bool,
    left: Version,
    right: Option<Version>,
    right_closed: bool,
}

impl VersionRange {
    /// `[version, ∞)`.
    pub fn at_least(version: Version) -> Self {
        Self {
            left_closed: true,
            left: version,
            right: None,
            right_closed: false,
        }
    }

    /// An explicit interval.
    pub fn interval(left_closed: bool, left: Version, right: Version, right_closed: bool) -> Self {
        Self {
            left_closed,
            left,
            right: Some(right),
            right_closed,
        }
    }

    /// Parse `[a,b)`, `(a,b]`, `[a,b]`, `(a,b)` or a bare version `a`.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        let invalid = |reason: &str| ValidationError::InvalidVersionRange {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let left_closed = match trimmed.chars().next() {
            Some('[') => true,
            Some('(') => false,
            Some(_) => {
                let version = Version::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
                return Ok(Self::at_least(version));
            }
            None => return Err(invalid("empty")),
        };
        let right_closed = match trimmed.chars().last() {
            Some(']') => true,
            Some(')') => false,
            _ => return Err(invalid("missing closing ']' or ')'")),
        };
        if trimmed.len() < 2 {
            return Err(invalid("missing bounds"));
        }

        let inner = &trimmed[1..trimmed.len() - 1];
        let (left, right) = inner
            .split_once(',')
            .ok_or_else(|| invalid("interval needs two bounds separated by ','"))?;
        if right.contains(',') {
            return Err(invalid("interval has more than two bounds"));
        }
        let left = Version::parse(left).map_err(|e| invalid(&e.to_string()))?;
        let right = Version::parse(right).map_err(|e| invalid(&e.to_string()))?;
        if left > right {
            return Err(invalid("left bound is greater than right bound"));
        }

        Ok(Self::interval(left_closed, left, right, right_closed))
    }

    /// Whether `version` falls inside the range.
    pub fn includes(&self, version: &Version) -> bool {
        let above_left = if self.left_closed {
            version >= &self.left
        } else {
            version > &self.left
        };
        if !above_left {
            return false;
        }
        match &self.right {
            None => true,
            Some(right) if self.right_closed => version <= right,
            Some(right) => version < right,
        }
    }

    /// Whether no version can satisfy the range, e.g. `(1,1)`.
    pub fn is_empty(&self) -> bool {
        match &self.right {
            None => false,
            Some(right) => {
                right < &self.left || (right == &self.left && !(self.left_closed && self.right_closed))
            }
        }
    }

    /// Lower bound.
    pub fn left(&self) -> &Version {
        &self.left
    }

    /// Upper bound, `None` when unbounded.
    pub fn right(&self) -> Option<&Version> {
        self.right.as_ref()
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.right {
            None if self.left_closed => write!(f, "{}", self.left),
            None => write!(f, "({},)", self.left),
            Some(right) => write!(
                f,
                "{}{},{}{}",
                if self.left_closed { '[' } else { '(' },
                self.left,
                right,
                if self.right_closed { ']' } else { ')' }
            ),
        }
    }
}

impl std::str::FromStr for VersionRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionRange {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VersionRange> for String {
    fn from(r: VersionRange) -> Self {
        r.to_string()
    }
}
