//! Validates the assembly's configurations and framework properties against
//! its configuration API.

use tracing::debug;

use apir_config::FeatureValidator;
use apir_core::ArtifactId;

use crate::error::AnalyserResult;
use crate::report::AnalysisReport;
use crate::task::{AnalyserTask, TaskContext};

/// Validate live values instead of placeholders.
pub const LIVE_VALUES: &str = "live-values";

/// Configuration API check.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckConfigurationApi;

fn report_all(report: &mut AnalysisReport, subject: Option<&ArtifactId>, errors: Vec<String>, warnings: Vec<String>) {
    for message in errors {
        match subject {
            Some(id) => report.add_artifact_error(id, message),
            None => report.add_error(message),
        }
    }
    for message in warnings {
        match subject {
            Some(id) => report.add_artifact_warning(id, message),
            None => report.add_warning(message),
        }
    }
}

impl AnalyserTask for CheckConfigurationApi {
    fn id(&self) -> &'static str {
        "configuration-api"
    }

    fn name(&self) -> &'static str {
        "Configuration API Check"
    }

    fn execute(&self, ctx: &mut TaskContext<'_>) -> AnalyserResult<()> {
        let assembly = ctx.assembly;
        let Some(api) = &assembly.configuration_api else {
            debug!("no configuration api");
            return Ok(());
        };

        let validator = FeatureValidator::new().with_live_values(ctx.configuration.get_bool(LIVE_VALUES, false));
        let result = validator.validate(&assembly.configurations, &assembly.framework_properties, api)?;

        for (pid, outcome) in &result.configuration_results {
            let subject = assembly
                .configurations
                .iter()
                .find(|c| &c.pid == pid)
                .and_then(|c| c.feature_origins.first());
            let prefix = |m: String| format!("Configuration {pid}: {m}");
            report_all(
                ctx.report,
                subject,
                outcome.all_errors().into_iter().map(prefix).collect(),
                outcome.all_warnings().into_iter().map(prefix).collect(),
            );
        }
        for (name, outcome) in &result.framework_property_results {
            let subject = assembly
                .framework_properties
                .get(name)
                .and_then(|p| p.feature_origins.first());
            let prefix = |m: &String| format!("Framework property {name}: {m}");
            report_all(
                ctx.report,
                subject,
                outcome.errors.iter().map(prefix).collect(),
                outcome.warnings.iter().map(prefix).collect(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::AssemblyDescriptor;
    use crate::settings::TaskConfiguration;
    use apir_config::{Configuration, ConfigurationApi, FrameworkProperty};
    use chrono::NaiveDate;
    use serde_json::json;

    fn id(s: &str) -> ArtifactId {
        ArtifactId::parse(s).unwrap()
    }

    fn assembly() -> AssemblyDescriptor {
        let mut a = AssemblyDescriptor::new(id("g:assembly:1"));
        a.configuration_api = Some(
            ConfigurationApi::from_json(json!({
                "configurations": {
                    "org.acme.http": {"properties": {"port": {"type": "INTEGER"}}}
                },
                "framework-properties": {"org.acme.level": {"type": "INTEGER"}},
                "internal-framework-properties": ["org.acme.secret"]
            }))
            .unwrap(),
        );
        a
    }

    fn run(assembly: &AssemblyDescriptor) -> AnalysisReport {
        let cfg = TaskConfiguration::new();
        let mut report = AnalysisReport::new();
        let mut ctx = TaskContext {
            assembly,
            configuration: &cfg,
            today: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            report: &mut report,
        };
        CheckConfigurationApi.execute(&mut ctx).unwrap();
        report
    }

    #[test]
    fn configuration_findings_carry_origin() {
        let mut a = assembly();
        a.configurations.push(
            Configuration::new("org.acme.http")
                .with_property("port", "eighty")
                .with_origin(id("g:customer:1")),
        );
        let report = run(&a);
        assert_eq!(
            report.error_messages(),
            vec!["Configuration org.acme.http: port : Value is not a integer"]
        );
        assert_eq!(report.errors[0].subject, Some(id("g:customer:1")));
    }

    #[test]
    fn framework_properties_are_checked() {
        let mut a = assembly();
        a.framework_properties.insert(
            "org.acme.secret".into(),
            FrameworkProperty {
                value: json!("x"),
                feature_origins: vec![],
            },
        );
        a.framework_properties.insert(
            "org.acme.level".into(),
            FrameworkProperty {
                value: json!(3),
                feature_origins: vec![],
            },
        );
        let report = run(&a);
        assert_eq!(
            report.error_messages(),
            vec!["Framework property org.acme.secret: Framework property is not allowed"]
        );
        assert_eq!(report.errors[0].subject, None);
    }

    #[test]
    fn nothing_to_do_without_api() {
        let mut a = AssemblyDescriptor::new(id("g:assembly:1"));
        a.configurations.push(Configuration::new("anything").with_property("x", 1));
        assert!(run(&a).is_valid());
    }
}
