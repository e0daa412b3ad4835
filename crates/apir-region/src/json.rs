//! # Region JSON Codec
//!
//! The persisted form is an ordered array of region objects:
//!
//! ```json
//! [
//!   { "name": "global", "exports": ["org.acme.api", "# comment"] },
//!   { "name": "internal", "feature-origins": ["org.acme:impl:1.0"],
//!     "exports": [{ "name": "org.acme.impl", "deprecated": "use api" }] }
//! ]
//! ```
//!
//! Decoding reads the known keys into typed fields and keeps every other
//! key as a passthrough string property. Encoding emits the compact form
//! (bare strings wherever an object would carry only a name or message).

use indexmap::IndexMap;
use serde_json::{Map, Value};

use apir_core::ArtifactId;

use crate::error::{RegionError, RegionResult};
use crate::export::{ApiExport, Deprecation, DeprecationInfo, DeprecationMode};
use crate::region::{ApiRegion, ApiRegions};

const NAME: &str = "name";
const PARENT: &str = "parent";
const EXPORTS: &str = "exports";
const FEATURE_ORIGINS: &str = "feature-origins";
const TOGGLE: &str = "toggle";
const PREVIOUS_ARTIFACT_ID: &str = "previous-artifact-id";
const PREVIOUS_LEGACY: &str = "previous";
const DEPRECATED: &str = "deprecated";
const MSG: &str = "msg";
const SINCE: &str = "since";
const FOR_REMOVAL: &str = "for-removal";
const MODE: &str = "mode";
const MEMBERS: &str = "members";

/// Exports whose name starts with this are comments.
const COMMENT_PREFIX: char = '#';

fn malformed(context: impl Into<String>, detail: impl Into<String>) -> RegionError {
    RegionError::Malformed {
        context: context.into(),
        detail: detail.into(),
    }
}

fn as_str<'a>(value: &'a Value, context: &str) -> RegionResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| malformed(context, "expected a string"))
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

impl ApiRegions {
    /// Parse a region document.
    pub fn parse(json: &str) -> RegionResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }

    /// Decode a region document from a JSON value.
    pub fn from_json(value: &Value) -> RegionResult<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| malformed("regions", "expected an array of region objects"))?;
        let mut regions = ApiRegions::new();
        for (pos, item) in items.iter().enumerate() {
            let obj = item
                .as_object()
                .ok_or_else(|| malformed(format!("regions[{pos}]"), "expected an object"))?;
            let (region, parent) = decode_region(obj, pos)?;
            match parent {
                Some(parent) => regions.add_with_parent(region, &parent)?,
                None => regions.add(region)?,
            }
        }
        Ok(regions)
    }
}

fn decode_region(obj: &Map<String, Value>, pos: usize) -> RegionResult<(ApiRegion, Option<String>)> {
    let name = obj
        .get(NAME)
        .ok_or_else(|| malformed(format!("regions[{pos}]"), "missing name"))
        .and_then(|v| as_str(v, &format!("regions[{pos}].name")))?;
    let mut region = ApiRegion::new(name);
    let mut parent = None;

    for (key, value) in obj {
        match key.as_str() {
            NAME => {}
            PARENT => parent = Some(as_str(value, &format!("{name}.parent"))?.to_string()),
            FEATURE_ORIGINS => {
                let origins = value
                    .as_array()
                    .ok_or_else(|| malformed(format!("{name}.{FEATURE_ORIGINS}"), "expected an array"))?;
                for origin in origins {
                    let id = ArtifactId::parse(as_str(origin, &format!("{name}.{FEATURE_ORIGINS}"))?)?;
                    region.feature_origins.push(id);
                }
            }
            EXPORTS => {
                let exports = value
                    .as_array()
                    .ok_or_else(|| malformed(format!("{name}.{EXPORTS}"), "expected an array"))?;
                for export in exports {
                    if let Some(export) = decode_export(export, name)? {
                        region.add(export)?;
                    }
                }
            }
            _ => {
                let text = as_str(value, &format!("{name}.{key}"))?;
                region.properties.insert(key.clone(), text.to_string());
            }
        }
    }
    Ok((region, parent))
}

fn decode_export(value: &Value, region: &str) -> RegionResult<Option<ApiExport>> {
    match value {
        Value::String(name) if name.starts_with(COMMENT_PREFIX) => Ok(None),
        Value::String(name) => Ok(Some(ApiExport::new(name.as_str()))),
        Value::Object(obj) => {
            let name = obj
                .get(NAME)
                .ok_or_else(|| malformed(format!("{region}.{EXPORTS}"), "export object without name"))
                .and_then(|v| as_str(v, &format!("{region}.{EXPORTS}.name")))?;
            let mut export = ApiExport::new(name);
            for (key, value) in obj {
                let context = format!("{region}.{name}.{key}");
                match key.as_str() {
                    NAME => {}
                    TOGGLE => export.toggle = Some(as_str(value, &context)?.to_string()),
                    PREVIOUS_ARTIFACT_ID | PREVIOUS_LEGACY => {
                        export.previous_artifact_id = Some(ArtifactId::parse(as_str(value, &context)?)?)
                    }
                    DEPRECATED => export.deprecation = Some(decode_deprecation(value, name)?),
                    _ => {
                        export
                            .properties
                            .insert(key.clone(), as_str(value, &context)?.to_string());
                    }
                }
            }
            Ok(Some(export))
        }
        _ => Err(malformed(
            format!("{region}.{EXPORTS}"),
            "export must be a string or an object",
        )),
    }
}

fn decode_deprecation(value: &Value, export: &str) -> RegionResult<Deprecation> {
    let bad = |detail: &str| RegionError::MalformedDeprecation {
        export: export.to_string(),
        detail: detail.to_string(),
    };
    match value {
        Value::String(msg) => Ok(Deprecation::Package(DeprecationInfo::new(msg.as_str()))),
        Value::Object(obj) => {
            let has_msg = obj.contains_key(MSG);
            let has_members = obj.contains_key(MEMBERS);
            if has_msg && has_members {
                return Err(bad("msg and members are mutually exclusive"));
            }
            if has_msg {
                return Ok(Deprecation::Package(decode_info(obj, export)?));
            }
            if !has_members {
                return Err(bad("either msg or members is required"));
            }
            if [SINCE, FOR_REMOVAL, MODE].iter().any(|k| obj.contains_key(*k)) {
                return Err(bad("since, for-removal and mode belong to the individual members"));
            }
            let members = obj
                .get(MEMBERS)
                .and_then(Value::as_object)
                .ok_or_else(|| bad("members must be an object"))?;
            let mut infos = IndexMap::new();
            for (member, info) in members {
                let info = match info {
                    Value::String(msg) => DeprecationInfo::new(msg.as_str()),
                    Value::Object(info) => decode_info(info, export)?,
                    _ => return Err(bad("member deprecation must be a string or an object")),
                };
                infos.insert(member.clone(), info);
            }
            Ok(Deprecation::Members(infos))
        }
        _ => Err(bad("deprecated must be a string or an object")),
    }
}

fn decode_info(obj: &Map<String, Value>, export: &str) -> RegionResult<DeprecationInfo> {
    let bad = |detail: String| RegionError::MalformedDeprecation {
        export: export.to_string(),
        detail,
    };
    let text = |key: &str| -> RegionResult<Option<String>> {
        match obj.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(bad(format!("{key} must be a string"))),
        }
    };
    let message = text(MSG)?.ok_or_else(|| bad(format!("{MSG} is required")))?;
    let mode = match text(MODE)? {
        None => None,
        Some(m) => Some(DeprecationMode::parse(&m).ok_or_else(|| bad(format!("unknown mode {m}")))?),
    };
    Ok(DeprecationInfo {
        message,
        since: text(SINCE)?,
        for_removal: text(FOR_REMOVAL)?,
        mode,
    })
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

impl ApiRegions {
    /// Encode to the persisted JSON form.
    pub fn to_json(&self) -> Value {
        let regions = self
            .list_regions()
            .iter()
            .enumerate()
            .map(|(idx, region)| {
                let mut obj = Map::new();
                obj.insert(NAME.into(), Value::String(region.name().to_string()));
                if let Some(parent) = self.explicit_parent_name(idx) {
                    obj.insert(PARENT.into(), Value::String(parent.to_string()));
                }
                obj.insert(
                    EXPORTS.into(),
                    Value::Array(region.list_exports().iter().map(encode_export).collect()),
                );
                if !region.feature_origins.is_empty() {
                    obj.insert(
                        FEATURE_ORIGINS.into(),
                        Value::Array(
                            region
                                .feature_origins
                                .iter()
                                .map(|o| Value::String(o.to_string()))
                                .collect(),
                        ),
                    );
                }
                for (key, value) in &region.properties {
                    obj.insert(key.clone(), Value::String(value.clone()));
                }
                Value::Object(obj)
            })
            .collect();
        Value::Array(regions)
    }

    /// Encode to a pretty-printed JSON string.
    pub fn to_json_string(&self) -> RegionResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }
}

fn encode_export(export: &ApiExport) -> Value {
    if export.is_plain() {
        return Value::String(export.name().to_string());
    }
    let mut obj = Map::new();
    obj.insert(NAME.into(), Value::String(export.name().to_string()));
    if let Some(toggle) = &export.toggle {
        obj.insert(TOGGLE.into(), Value::String(toggle.clone()));
    }
    if let Some(previous) = &export.previous_artifact_id {
        obj.insert(PREVIOUS_ARTIFACT_ID.into(), Value::String(previous.to_string()));
    }
    if let Some(deprecation) = &export.deprecation {
        obj.insert(DEPRECATED.into(), encode_deprecation(deprecation));
    }
    for (key, value) in &export.properties {
        obj.insert(key.clone(), Value::String(value.clone()));
    }
    Value::Object(obj)
}

fn encode_deprecation(deprecation: &Deprecation) -> Value {
    match deprecation {
        Deprecation::Package(info) if info.is_message_only() => Value::String(info.message.clone()),
        Deprecation::Package(info) => Value::Object(encode_info(info)),
        Deprecation::Members(members) => {
            let encoded: Map<String, Value> = members
                .iter()
                .map(|(member, info)| {
                    let value = if info.is_message_only() {
                        Value::String(info.message.clone())
                    } else {
                        Value::Object(encode_info(info))
                    };
                    (member.clone(), value)
                })
                .collect();
            let mut obj = Map::new();
            obj.insert(MEMBERS.into(), Value::Object(encoded));
            Value::Object(obj)
        }
    }
}

fn encode_info(info: &DeprecationInfo) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert(MSG.into(), Value::String(info.message.clone()));
    if let Some(since) = &info.since {
        obj.insert(SINCE.into(), Value::String(since.clone()));
    }
    if let Some(removal) = &info.for_removal {
        obj.insert(FOR_REMOVAL.into(), Value::String(removal.clone()));
    }
    if let Some(mode) = info.mode {
        obj.insert(MODE.into(), Value::String(mode.as_str().to_string()));
    }
    obj
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn comments_are_skipped() {
        let regions = ApiRegions::from_json(&json!([
            {"name": "global", "exports": ["# public api", "a.api"]}
        ]))
        .unwrap();
        let global = regions.region_by_name("global").unwrap();
        assert_eq!(global.list_exports().len(), 1);
        assert_eq!(global.list_exports()[0].name(), "a.api");
    }

    #[test]
    fn extra_keys_become_properties() {
        let regions = ApiRegions::from_json(&json!([
            {"name": "global", "exports": [], "owner": "platform"}
        ]))
        .unwrap();
        assert_eq!(
            regions.region_by_name("global").unwrap().properties.get("owner").map(String::as_str),
            Some("platform")
        );
    }

    #[test]
    fn export_object_fields() {
        let regions = ApiRegions::from_json(&json!([
            {"name": "global", "exports": [{
                "name": "p",
                "toggle": "feature.p",
                "previous-artifact-id": "g:old:1",
                "note": "x"
            }]}
        ]))
        .unwrap();
        let export = regions.all_export_by_name("global", "p").unwrap();
        assert_eq!(export.toggle.as_deref(), Some("feature.p"));
        assert_eq!(export.previous_artifact_id.as_ref().unwrap().as_str(), "g:old:1");
        assert_eq!(export.properties.get("note").map(String::as_str), Some("x"));
    }

    #[test]
    fn legacy_previous_key() {
        let regions = ApiRegions::from_json(&json!([
            {"name": "global", "exports": [{"name": "p", "previous": "g:old:1"}]}
        ]))
        .unwrap();
        assert!(regions.all_export_by_name("global", "p").unwrap().previous_artifact_id.is_some());
    }

    #[test]
    fn deprecation_string_and_object() {
        let regions = ApiRegions::from_json(&json!([
            {"name": "global", "exports": [
                {"name": "a", "deprecated": "use b"},
                {"name": "b", "deprecated": {"msg": "use c", "since": "1.2", "for-removal": "2030-01-01", "mode": "LENIENT"}}
            ]}
        ]))
        .unwrap();
        let a = regions.all_export_by_name("global", "a").unwrap();
        assert_eq!(a.package_deprecation().unwrap().message, "use b");
        let b = regions.all_export_by_name("global", "b").unwrap().package_deprecation().unwrap();
        assert_eq!(b.since.as_deref(), Some("1.2"));
        assert_eq!(b.for_removal.as_deref(), Some("2030-01-01"));
        assert_eq!(b.mode, Some(DeprecationMode::Lenient));
    }

    #[test]
    fn deprecation_members() {
        let regions = ApiRegions::from_json(&json!([
            {"name": "global", "exports": [
                {"name": "a", "deprecated": {"members": {"Foo": "gone", "Bar": {"msg": "later", "since": "2"}}}}
            ]}
        ]))
        .unwrap();
        let dep = regions.all_export_by_name("global", "a").unwrap().deprecation.clone().unwrap();
        let members: Vec<(&str, &DeprecationInfo)> = dep.member_infos().collect();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].0, "Foo");
        assert_eq!(members[1].1.since.as_deref(), Some("2"));
    }

    #[test]
    fn deprecation_mixing_is_fatal() {
        let err = ApiRegions::from_json(&json!([
            {"name": "global", "exports": [
                {"name": "a", "deprecated": {"msg": "x", "members": {"Foo": "y"}}}
            ]}
        ]))
        .unwrap_err();
        assert!(matches!(err, RegionError::MalformedDeprecation { .. }));
    }

    #[test]
    fn members_with_top_level_since_is_fatal() {
        let err = ApiRegions::from_json(&json!([
            {"name": "global", "exports": [
                {"name": "a", "deprecated": {"since": "1", "members": {"Foo": "y"}}}
            ]}
        ]))
        .unwrap_err();
        assert!(matches!(err, RegionError::MalformedDeprecation { .. }));
    }

    #[test]
    fn unknown_deprecation_mode_is_fatal() {
        assert!(ApiRegions::from_json(&json!([
            {"name": "global", "exports": [{"name": "a", "deprecated": {"msg": "x", "mode": "SILENT"}}]}
        ]))
        .is_err());
    }

    #[test]
    fn duplicate_export_in_json_is_fatal() {
        let err = ApiRegions::from_json(&json!([
            {"name": "global", "exports": ["a", {"name": "a"}]}
        ]))
        .unwrap_err();
        assert!(matches!(err, RegionError::DuplicateExport { .. }));
    }

    #[test]
    fn non_array_document_is_malformed() {
        assert!(matches!(
            ApiRegions::from_json(&json!({"name": "global"})),
            Err(RegionError::Malformed { .. })
        ));
    }

    #[test]
    fn encodes_compact_form() {
        let input = json!([
            {"name": "global", "exports": ["a", {"name": "b", "deprecated": "old"}]},
            {"name": "internal", "exports": [], "feature-origins": ["g:f:1"]}
        ]);
        let regions = ApiRegions::from_json(&input).unwrap();
        assert_eq!(regions.to_json(), input);
    }

    #[test]
    fn explicit_parent_survives_encoding() {
        let input = json!([
            {"name": "global", "exports": []},
            {"name": "internal", "exports": []},
            {"name": "friends", "parent": "global", "exports": []}
        ]);
        let regions = ApiRegions::from_json(&input).unwrap();
        assert_eq!(regions.parent("friends").unwrap().name(), "global");
        assert_eq!(regions.to_json(), input);
    }
}
