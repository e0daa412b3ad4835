//! # Validate Subcommand
//!
//! Validates the configurations and framework properties of a feature
//! against a configuration API document and prints every finding.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use apir_config::{ConfigurationApi, FeatureContent, FeatureValidationResult, FeatureValidator};
use apir_core::{Mode, Region};

use crate::read_json;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration API document.
    #[arg(long)]
    pub api: PathBuf,

    /// Feature content: `configurations` and `framework-properties`.
    #[arg(long)]
    pub configurations: PathBuf,

    /// Override the API's validation mode (strict, lenient, silent,
    /// definitive, silent_definitive).
    #[arg(long)]
    pub mode: Option<Mode>,

    /// Validate live values: placeholders are not required for passwords.
    #[arg(long)]
    pub live_values: bool,

    /// Region assumed for contributors the API does not know.
    #[arg(long, default_value = "global")]
    pub default_region: Region,
}

/// Findings as `ERROR`/`WARN` lines, configurations first.
pub fn render_findings(result: &FeatureValidationResult) -> String {
    let mut out = String::new();
    for (pid, outcome) in &result.configuration_results {
        for e in outcome.all_errors() {
            let _ = writeln!(out, "ERROR configuration {pid}: {e}");
        }
        for w in outcome.all_warnings() {
            let _ = writeln!(out, "WARN  configuration {pid}: {w}");
        }
    }
    for (name, outcome) in &result.framework_property_results {
        for e in &outcome.errors {
            let _ = writeln!(out, "ERROR framework property {name}: {e}");
        }
        for w in &outcome.warnings {
            let _ = writeln!(out, "WARN  framework property {name}: {w}");
        }
    }
    out
}

/// Load both documents and validate.
pub fn validate_files(args: &ValidateArgs) -> Result<FeatureValidationResult> {
    let value: serde_json::Value = read_json(&args.api)?;
    let mut api = ConfigurationApi::from_json(value)
        .with_context(|| format!("invalid configuration API in {}", args.api.display()))?;
    if let Some(mode) = args.mode {
        api.mode = mode;
    }
    let feature: FeatureContent = read_json(&args.configurations)?;
    tracing::debug!(
        configurations = feature.configurations.len(),
        framework_properties = feature.framework_properties.len(),
        mode = %api.mode,
        "validating feature"
    );

    let result = FeatureValidator::new()
        .with_live_values(args.live_values)
        .with_default_region(args.default_region)
        .validate_feature(&feature, &api)?;
    Ok(result)
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let result = validate_files(args)?;
    print!("{}", render_findings(&result));
    if result.is_valid() {
        println!("OK: configuration is valid");
        Ok(0)
    } else {
        println!("FAILED: configuration has errors");
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const API: &str = r#"{
        "configurations": {
            "org.acme.http": {"properties": {"port": {"type": "INTEGER"}}}
        },
        "internal-configurations": ["org.acme.secret"]
    }"#;

    const FEATURE: &str = r#"{
        "configurations": [
            {"pid": "org.acme.http", "properties": {"port": "eighty"}},
            {"pid": "org.acme.secret", "properties": {}}
        ]
    }"#;

    fn args(dir: &Path, mode: Option<Mode>) -> ValidateArgs {
        let api = dir.join("api.json");
        let configurations = dir.join("feature.json");
        std::fs::write(&api, API).unwrap();
        std::fs::write(&configurations, FEATURE).unwrap();
        ValidateArgs {
            api,
            configurations,
            mode,
            live_values: false,
            default_region: Region::Global,
        }
    }

    #[test]
    fn strict_findings_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate_files(&args(dir.path(), None)).unwrap();
        assert!(!result.is_valid());
        assert_eq!(
            render_findings(&result),
            "ERROR configuration org.acme.http: port : Value is not a integer\n\
             ERROR configuration org.acme.secret: Configuration is not allowed\n"
        );
        assert_eq!(run_validate(&args(dir.path(), None)).unwrap(), 1);
    }

    #[test]
    fn lenient_mode_downgrades() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate_files(&args(dir.path(), Some(Mode::Lenient))).unwrap();
        assert!(result.is_valid());
        assert!(render_findings(&result).starts_with("WARN  configuration org.acme.http"));
    }

    #[test]
    fn internal_default_region_allows_internal_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(dir.path(), None);
        a.default_region = Region::Internal;
        let result = validate_files(&a).unwrap();
        assert!(!result.configuration_results.contains_key("org.acme.secret"));
    }
}
