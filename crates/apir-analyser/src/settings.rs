//! # Task Settings
//!
//! Analyser tasks read plain string settings. Settings files may use
//! booleans and numbers for convenience; they are stored as text and
//! interpreted by the task that reads them.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AnalyserError, AnalyserResult};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<Scalar> for String {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Text(t) => t,
        }
    }
}

fn scalar_map<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, Scalar>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, v)| (k, v.into())).collect())
}

/// Settings of one task, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskConfiguration {
    values: IndexMap<String, String>,
}

impl<'de> Deserialize<'de> for TaskConfiguration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self {
            values: scalar_map(deserializer)?,
        })
    }
}

impl TaskConfiguration {
    /// No settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Set a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Raw value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Boolean value: `true` in any case is true, any other text is false.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .map_or(default, |v| v.trim().eq_ignore_ascii_case("true"))
    }

    /// Integer value; malformed text is an error.
    pub fn get_int(&self, task: &str, key: &str) -> AnalyserResult<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| AnalyserError::InvalidSetting {
                    task: task.to_string(),
                    key: key.to_string(),
                    value: v.to_string(),
                }),
        }
    }

    /// Comma separated list with blanks dropped; `None` if the key is unset.
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
    }
}

/// Settings for a whole analyser run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyserSettings {
    /// Task ids to run; unset runs every task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<Vec<String>>,
    /// Settings by task id.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub tasks: IndexMap<String, TaskConfiguration>,
}

impl AnalyserSettings {
    /// Whether the task runs.
    pub fn is_enabled(&self, task_id: &str) -> bool {
        self.enabled
            .as_ref()
            .map_or(true, |ids| ids.iter().any(|id| id == task_id))
    }

    /// Settings of a task; empty if none were given.
    pub fn configuration_for(&self, task_id: &str) -> TaskConfiguration {
        self.tasks.get(task_id).cloned().unwrap_or_default()
    }

    /// Builder: settings for one task.
    pub fn with_task(mut self, task_id: impl Into<String>, configuration: TaskConfiguration) -> Self {
        self.tasks.insert(task_id.into(), configuration);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn booleans_are_lenient() {
        let cfg = TaskConfiguration::new()
            .with("a", "TRUE")
            .with("b", "yes")
            .with("c", "false");
        assert!(cfg.get_bool("a", false));
        assert!(!cfg.get_bool("b", true));
        assert!(!cfg.get_bool("c", true));
        assert!(cfg.get_bool("missing", true));
    }

    #[test]
    fn integers_are_strict() {
        let cfg = TaskConfiguration::new().with("n", " 30 ").with("bad", "thirty");
        assert_eq!(cfg.get_int("t", "n").unwrap(), Some(30));
        assert_eq!(cfg.get_int("t", "missing").unwrap(), None);
        assert!(matches!(
            cfg.get_int("t", "bad"),
            Err(AnalyserError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn lists_drop_blanks() {
        let cfg = TaskConfiguration::new().with("order", "global, ,internal,");
        assert_eq!(cfg.get_list("order").unwrap(), vec!["global", "internal"]);
        assert!(cfg.get_list("missing").is_none());
    }

    #[test]
    fn settings_from_json_scalars() {
        let s: AnalyserSettings = serde_json::from_value(json!({
            "enabled": ["api-regions-check-order"],
            "tasks": {
                "api-regions-check-deprecated-api": {"strict": true, "removal-period": 30, "regions": "global"}
            }
        }))
        .unwrap();
        assert!(s.is_enabled("api-regions-check-order"));
        assert!(!s.is_enabled("artifact-rules"));
        let cfg = s.configuration_for("api-regions-check-deprecated-api");
        assert!(cfg.get_bool("strict", false));
        assert_eq!(cfg.get_int("x", "removal-period").unwrap(), Some(30));
        assert!(s.configuration_for("unknown").get("strict").is_none());
    }

    #[test]
    fn everything_enabled_by_default() {
        assert!(AnalyserSettings::default().is_enabled("anything"));
    }
}
