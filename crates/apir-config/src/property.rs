//! # Property Descriptions
//!
//! A [`PropertyDescription`] declares what one configuration property may
//! hold: its type, how many values, allowed options, numeric range, values
//! that must or must not appear, and an optional pattern.
//!
//! Cardinality: `1` (the default, `0` is accepted as a synonym) means a
//! single value, `n > 1` a list of at most `n` values, `-1` an unbounded
//! list.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use apir_core::Mode;

use crate::entity::{is_false, Attributes, Describable, Described};

/// Declared value type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    /// Any string.
    #[default]
    String,
    /// `true` / `false`.
    Boolean,
    /// 8-bit signed integer.
    Byte,
    /// 16-bit signed integer.
    Short,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// A single character.
    Character,
    /// A secret string.
    Password,
    /// An absolute URL.
    Url,
    /// An e-mail address.
    Email,
    /// An absolute path.
    Path,
}

impl PropertyType {
    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Boolean => "BOOLEAN",
            Self::Byte => "BYTE",
            Self::Short => "SHORT",
            Self::Integer => "INTEGER",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Character => "CHARACTER",
            Self::Password => "PASSWORD",
            Self::Url => "URL",
            Self::Email => "EMAIL",
            Self::Path => "PATH",
        }
    }

    fn is_default(&self) -> bool {
        *self == Self::String
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lowest allowed value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,
    /// Highest allowed value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,
}

/// One allowed value of an enumerated property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyOption {
    /// The allowed value, compared as text.
    pub value: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Display description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A value pattern, compiled once when the description is decoded. A
/// pattern that does not compile rejects the whole description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern {
    source: String,
    anchored: Regex,
}

impl Pattern {
    /// Compile `source`; matches must cover the whole value.
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let anchored = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self { source, anchored })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `text` matches in full.
    pub fn is_match(&self, text: &str) -> bool {
        self.anchored.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl TryFrom<String> for Pattern {
    type Error = regex::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Pattern> for String {
    fn from(p: Pattern) -> Self {
        p.source
    }
}

fn default_cardinality() -> i32 {
    1
}

fn is_single(c: &i32) -> bool {
    *c == 1
}

/// Schema of one configuration or framework property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PropertyDescription {
    /// Descriptive fields.
    #[serde(flatten)]
    pub describable: Describable,
    /// Value type.
    #[serde(rename = "type", default, skip_serializing_if = "PropertyType::is_default")]
    pub property_type: PropertyType,
    /// Number of values; see module docs.
    #[serde(default = "default_cardinality", skip_serializing_if = "is_single")]
    pub cardinality: i32,
    /// Placeholder variable name for tooling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    /// Numeric bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    /// Values that must be present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes: Option<Vec<String>>,
    /// Values that must not be present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excludes: Option<Vec<String>>,
    /// Allowed values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<PropertyOption>>,
    /// Pattern every value must match in full.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<Pattern>,
    /// A value must be supplied.
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Value used when the supplied one is rejected under a definitive mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Validation mode override for this property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    /// Unrecognised keys.
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Default for PropertyDescription {
    fn default() -> Self {
        Self {
            describable: Describable::default(),
            property_type: PropertyType::String,
            cardinality: 1,
            variable: None,
            range: None,
            includes: None,
            excludes: None,
            options: None,
            regex: None,
            required: false,
            default: None,
            mode: None,
            attributes: Attributes::new(),
        }
    }
}

impl PropertyDescription {
    /// A property of the given type.
    pub fn of_type(property_type: PropertyType) -> Self {
        Self {
            property_type,
            ..Self::default()
        }
    }

    /// Builder: set cardinality.
    pub fn with_cardinality(mut self, cardinality: i32) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Builder: set `includes`.
    pub fn with_includes<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Whether the property holds a single value.
    pub fn is_single_valued(&self) -> bool {
        self.cardinality == 0 || self.cardinality == 1
    }

    /// Append values to `includes`, keeping order and dropping repeats.
    pub fn add_includes<'a>(&mut self, values: impl IntoIterator<Item = &'a String>) {
        let includes = self.includes.get_or_insert_with(Vec::new);
        for value in values {
            if !includes.contains(value) {
                includes.push(value.clone());
            }
        }
    }
}

impl Described for PropertyDescription {
    fn describable(&self) -> &Describable {
        &self.describable
    }
}

/// Framework properties are described exactly like configuration properties.
pub type FrameworkPropertyDescription = PropertyDescription;
