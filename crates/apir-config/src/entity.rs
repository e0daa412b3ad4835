//! # Shared Entity Pieces
//!
//! Every schema record carries the same descriptive fields (title,
//! description, deprecation, since, enforce-on) and keeps any JSON keys it
//! does not recognise in a side map so they survive a round trip.
//! [`Describable`] holds the descriptive fields; the [`Described`] trait
//! gives validators uniform access to them.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Unrecognised JSON keys, preserved verbatim.
pub type Attributes = Map<String, Value>;

/// Descriptive fields shared by all schema records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Describable {
    /// Short title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Deprecation message; present means deprecated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    /// Version or date the entity exists since.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    /// Date from which the rule is enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_on: Option<String>,
}

impl Describable {
    /// Suffix appended to every finding raised against this entity.
    pub fn message_postfix(&self) -> String {
        let mut postfix = String::new();
        if let Some(since) = &self.since {
            postfix.push_str(". Since : ");
            postfix.push_str(since);
        }
        if let Some(enforce_on) = &self.enforce_on {
            postfix.push_str(". Enforced on : ");
            postfix.push_str(enforce_on);
        }
        postfix
    }
}

/// Access to the descriptive fields of a schema record.
pub trait Described {
    /// The descriptive fields.
    fn describable(&self) -> &Describable;
}

impl Described for Describable {
    fn describable(&self) -> &Describable {
        self
    }
}

/// Deserialize a property map, rejecting names that differ only by case.
pub(crate) fn case_insensitive_map<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let map = IndexMap::<String, T>::deserialize(deserializer)?;
    let mut seen = HashSet::new();
    for key in map.keys() {
        if !seen.insert(key.to_lowercase()) {
            return Err(D::Error::custom(format!("Duplicate property name '{key}'")));
        }
    }
    Ok(map)
}

/// Case-insensitive lookup in a property map.
pub fn find_ignore_case<'a, T>(map: &'a IndexMap<String, T>, name: &str) -> Option<(&'a String, &'a T)> {
    map.get_key_value(name)
        .or_else(|| map.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)))
}

/// Mutable case-insensitive lookup in a property map.
pub fn find_ignore_case_mut<'a, T>(map: &'a mut IndexMap<String, T>, name: &str) -> Option<&'a mut T> {
    let key = map
        .keys()
        .find(|k| k.as_str() == name)
        .or_else(|| map.keys().find(|k| k.eq_ignore_ascii_case(name)))
        .cloned()?;
    map.get_mut(&key)
}

pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}
