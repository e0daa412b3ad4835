//! # Analyse Subcommand
//!
//! Runs the analyser tasks over an assembly snapshot. Task settings come
//! from an optional YAML file:
//!
//! ```yaml
//! enabled: [api-regions-exportsimports, api-regions-check-order]
//! tasks:
//!   api-regions-check-order:
//!     order: global,internal
//!   api-regions-check-deprecated-api:
//!     strict: true
//!     removal-period: 30
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;

use apir_analyser::{Analyser, AnalyserSettings, AnalysisReport, AssemblyDescriptor};

use crate::read_json;

/// Arguments for the analyse subcommand.
#[derive(Args, Debug)]
pub struct AnalyseArgs {
    /// Assembly snapshot (JSON).
    pub assembly: PathBuf,

    /// Analyser settings (YAML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Date treated as today (YYYY-MM-DD); defaults to the current UTC date.
    #[arg(long, value_parser = parse_today)]
    pub today: Option<NaiveDate>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

fn parse_today(value: &str) -> Result<NaiveDate, apir_core::ValidationError> {
    apir_core::parse_date(value)
}

/// Read analyser settings; an absent path means defaults.
pub fn load_settings(path: Option<&Path>) -> Result<AnalyserSettings> {
    let Some(path) = path else {
        return Ok(AnalyserSettings::default());
    };
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("failed to parse YAML in {}", path.display()))
}

/// Report as `ERROR`/`WARN` lines followed by a summary line.
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    for e in &report.errors {
        let _ = writeln!(out, "ERROR {e}");
    }
    for w in &report.warnings {
        let _ = writeln!(out, "WARN  {w}");
    }
    let _ = write!(out, "{} error(s), {} warning(s)", report.errors.len(), report.warnings.len());
    out
}

/// Load the inputs and run every enabled task.
pub fn analyse(args: &AnalyseArgs) -> Result<AnalysisReport> {
    let assembly: AssemblyDescriptor = read_json(&args.assembly)?;
    let settings = load_settings(args.config.as_deref())?;
    let mut analyser = Analyser::with_default_tasks();
    if let Some(today) = args.today {
        analyser = analyser.with_today(today);
    }
    let report = analyser
        .run(&assembly, &settings)
        .with_context(|| format!("analysis of {} failed", assembly.id))?;
    Ok(report)
}

/// Execute the analyse subcommand.
pub fn run_analyse(args: &AnalyseArgs) -> Result<u8> {
    let report = analyse(args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_report(&report));
    }
    Ok(if report.has_errors() { 1 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSEMBLY: &str = r#"{
        "id": "org.acme:assembly:1",
        "modules": [
            {"id": "org.acme:provider:1", "exports": [{"name": "org.acme.api", "version": "1.0"}]},
            {"id": "org.acme:consumer:1", "imports": [{"name": "org.acme.api"}, {"name": "org.acme.gone"}]}
        ],
        "api-regions": [{"name": "global", "exports": ["org.acme.api"]}]
    }"#;

    fn args(dir: &Path, settings: Option<&str>) -> AnalyseArgs {
        let assembly = dir.join("assembly.json");
        std::fs::write(&assembly, ASSEMBLY).unwrap();
        let config = settings.map(|s| {
            let path = dir.join("analyser.yaml");
            std::fs::write(&path, s).unwrap();
            path
        });
        AnalyseArgs {
            assembly,
            config,
            today: NaiveDate::from_ymd_opt(2025, 1, 1),
            json: false,
        }
    }

    #[test]
    fn missing_import_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(dir.path(), Some("tasks:\n  api-regions-check-order:\n    order: global\n"));
        let report = analyse(&a).unwrap();
        assert_eq!(
            report.error_messages(),
            vec!["Bundle consumer:1 is importing package(s) org.acme.gone in start level 0 but no bundle is exporting these for that start level."]
        );
        assert!(render_report(&report).ends_with("1 error(s), 0 warning(s)"));
        assert_eq!(run_analyse(&a).unwrap(), 1);
    }

    #[test]
    fn enabled_list_from_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = "enabled: [api-regions-check-order]\ntasks:\n  api-regions-check-order:\n    order: global\n";
        assert_eq!(run_analyse(&args(dir.path(), Some(yaml))).unwrap(), 0);
    }

    #[test]
    fn yaml_scalars_become_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyser.yaml");
        std::fs::write(
            &path,
            "tasks:\n  api-regions-check-deprecated-api:\n    strict: true\n    removal-period: 30\n",
        )
        .unwrap();
        let settings = load_settings(Some(&path)).unwrap();
        let cfg = settings.configuration_for("api-regions-check-deprecated-api");
        assert!(cfg.get_bool("strict", false));
        assert_eq!(cfg.get("removal-period"), Some("30"));
    }

    #[test]
    fn unknown_task_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = analyse(&args(dir.path(), Some("enabled: [nope]\n"))).unwrap_err();
        assert!(format!("{err:#}").contains("Unknown analyser task: nope"));
    }

    #[test]
    fn settings_default_without_file() {
        assert_eq!(load_settings(None).unwrap(), AnalyserSettings::default());
    }
}
