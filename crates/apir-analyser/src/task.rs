//! # Analyser Tasks
//!
//! Every check implements [`AnalyserTask`] and runs against a
//! [`TaskContext`]: the assembly snapshot, the task's own settings, the date
//! the run treats as today, and the report findings are written to.
//! [`Analyser`] runs the enabled tasks in registration order.

use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::descriptor::AssemblyDescriptor;
use crate::error::{AnalyserError, AnalyserResult};
use crate::report::AnalysisReport;
use crate::settings::{AnalyserSettings, TaskConfiguration};
use crate::tasks;

/// Inputs and output of one task execution.
#[derive(Debug)]
pub struct TaskContext<'a> {
    /// The assembly under analysis.
    pub assembly: &'a AssemblyDescriptor,
    /// Settings of the running task.
    pub configuration: &'a TaskConfiguration,
    /// Date treated as today.
    pub today: NaiveDate,
    /// Where findings go.
    pub report: &'a mut AnalysisReport,
}

/// One analyser check.
pub trait AnalyserTask: Send + Sync + fmt::Debug {
    /// Stable id, used in settings.
    fn id(&self) -> &'static str;

    /// Human readable name.
    fn name(&self) -> &'static str;

    /// Run the check, writing findings to `ctx.report`.
    ///
    /// An `Err` means the input could not be analysed at all.
    fn execute(&self, ctx: &mut TaskContext<'_>) -> AnalyserResult<()>;
}

/// Runs a set of analyser tasks over an assembly.
#[derive(Debug, Default)]
pub struct Analyser {
    tasks: Vec<Box<dyn AnalyserTask>>,
    today: Option<NaiveDate>,
}

impl Analyser {
    /// Analyser without tasks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyser with every built-in task.
    pub fn with_default_tasks() -> Self {
        Self {
            tasks: tasks::default_tasks(),
            today: None,
        }
    }

    /// Builder: register a task.
    pub fn with_task(mut self, task: Box<dyn AnalyserTask>) -> Self {
        self.tasks.push(task);
        self
    }

    /// Builder: fix the date treated as today.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Ids of the registered tasks.
    pub fn task_ids(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|t| t.id()).collect()
    }

    /// Run every enabled task and collect the findings.
    pub fn run(&self, assembly: &AssemblyDescriptor, settings: &AnalyserSettings) -> AnalyserResult<AnalysisReport> {
        if let Some(enabled) = &settings.enabled {
            if let Some(unknown) = enabled.iter().find(|id| !self.tasks.iter().any(|t| t.id() == id.as_str())) {
                return Err(AnalyserError::UnknownTask(unknown.clone()));
            }
        }

        let today = self.today.unwrap_or_else(apir_core::today);
        let mut report = AnalysisReport::new();
        for task in &self.tasks {
            if !settings.is_enabled(task.id()) {
                debug!(task = task.id(), "task disabled");
                continue;
            }
            let configuration = settings.configuration_for(task.id());
            info!(task = task.id(), assembly = %assembly.id, "running {}", task.name());
            let mut ctx = TaskContext {
                assembly,
                configuration: &configuration,
                today,
                report: &mut report,
            };
            task.execute(&mut ctx)?;
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apir_core::ArtifactId;

    #[derive(Debug)]
    struct Always;

    impl AnalyserTask for Always {
        fn id(&self) -> &'static str {
            "always"
        }

        fn name(&self) -> &'static str {
            "Always complains"
        }

        fn execute(&self, ctx: &mut TaskContext<'_>) -> AnalyserResult<()> {
            let msg = ctx.configuration.get("msg").unwrap_or("complaint").to_string();
            ctx.report.add_warning(format!("{msg} on {}", ctx.today));
            Ok(())
        }
    }

    fn assembly() -> AssemblyDescriptor {
        AssemblyDescriptor::new(ArtifactId::parse("g:assembly:1").unwrap())
    }

    #[test]
    fn runs_enabled_tasks_with_settings() {
        let analyser = Analyser::new()
            .with_task(Box::new(Always))
            .with_today(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        let settings = AnalyserSettings::default().with_task("always", TaskConfiguration::new().with("msg", "hi"));
        let report = analyser.run(&assembly(), &settings).unwrap();
        assert_eq!(report.warning_messages(), vec!["hi on 2025-03-01"]);
    }

    #[test]
    fn disabled_tasks_are_skipped() {
        let analyser = Analyser::new().with_task(Box::new(Always));
        let settings = AnalyserSettings {
            enabled: Some(vec![]),
            ..Default::default()
        };
        assert!(analyser.run(&assembly(), &settings).unwrap().warnings.is_empty());
    }

    #[test]
    fn unknown_enabled_task_is_an_error() {
        let analyser = Analyser::new().with_task(Box::new(Always));
        let settings = AnalyserSettings {
            enabled: Some(vec!["nope".into()]),
            ..Default::default()
        };
        assert!(matches!(
            analyser.run(&assembly(), &settings),
            Err(AnalyserError::UnknownTask(id)) if id == "nope"
        ));
    }

    #[test]
    fn default_task_ids() {
        assert_eq!(
            Analyser::with_default_tasks().task_ids(),
            vec![
                "api-regions-exportsimports",
                "api-regions-check-deprecated-api",
                "api-regions-check-order",
                "artifact-rules",
                "configuration-api",
                "api-regions-crossfeature-dups",
            ]
        );
    }
}
