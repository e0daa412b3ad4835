//! # Validation Modes and Configuration Regions
//!
//! [`Mode`] decides what a failed check turns into. The five modes form an
//! explicit total order by [`Mode::level`]; merging two aggregates keeps the
//! mode with the lower level (see [`Mode::merge`]), so a STRICT contributor
//! always wins over a lenient one.
//!
//! | Mode               | error | warning | use default |
//! |--------------------|:-----:|:-------:|:-----------:|
//! | STRICT             |   x   |         |             |
//! | LENIENT            |       |    x    |             |
//! | SILENT             |       |         |             |
//! | DEFINITIVE         |       |    x    |      x      |
//! | SILENT_DEFINITIVE  |       |         |      x      |
//!
//! [`Region`] is the two-valued visibility used by configuration schemas.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Validation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Failures are errors.
    #[default]
    Strict,
    /// Failures are warnings.
    Lenient,
    /// Failures are ignored.
    Silent,
    /// Failures are warnings and the default value replaces the supplied one.
    Definitive,
    /// Failures are ignored and the default value replaces the supplied one.
    SilentDefinitive,
}

impl Mode {
    /// All modes in level order.
    pub fn all() -> &'static [Mode] {
        &[
            Self::Strict,
            Self::Lenient,
            Self::Silent,
            Self::Definitive,
            Self::SilentDefinitive,
        ]
    }

    /// Position in the total order used when merging.
    pub const fn level(self) -> u8 {
        match self {
            Self::Strict => 0,
            Self::Lenient => 1,
            Self::Silent => 2,
            Self::Definitive => 3,
            Self::SilentDefinitive => 4,
        }
    }

    /// The mode kept when two contributors disagree: the lower level.
    pub fn merge(a: Mode, b: Mode) -> Mode {
        if b.level() < a.level() {
            b
        } else {
            a
        }
    }

    /// Failures become errors.
    pub fn reports_error(self) -> bool {
        matches!(self, Self::Strict)
    }

    /// Failures become warnings.
    pub fn reports_warning(self) -> bool {
        matches!(self, Self::Lenient | Self::Definitive)
    }

    /// Failures replace the supplied value with the declared default.
    pub fn uses_default(self) -> bool {
        matches!(self, Self::Definitive | Self::SilentDefinitive)
    }

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "STRICT",
            Self::Lenient => "LENIENT",
            Self::Silent => "SILENT",
            Self::Definitive => "DEFINITIVE",
            Self::SilentDefinitive => "SILENT_DEFINITIVE",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidMode(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// Visibility of a configuration, factory configuration or property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    /// Visible to every contributor.
    Global,
    /// Visible only to contributors in the internal region.
    Internal,
}

impl Region {
    /// All regions.
    pub fn all() -> &'static [Region] {
        &[Self::Global, Self::Internal]
    }

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "GLOBAL",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Region {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidRegion(s.to_string()))
    }
}
