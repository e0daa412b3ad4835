//! Checks module versions against the assembly's artifact rules.

use tracing::{debug, trace};

use apir_config::artifact_version;
use apir_core::Mode;

use crate::error::AnalyserResult;
use crate::task::{AnalyserTask, TaskContext};

/// Artifact version rule check.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckArtifactRules;

impl AnalyserTask for CheckArtifactRules {
    fn id(&self) -> &'static str {
        "artifact-rules"
    }

    fn name(&self) -> &'static str {
        "Artifact Rules Check"
    }

    fn execute(&self, ctx: &mut TaskContext<'_>) -> AnalyserResult<()> {
        let assembly = ctx.assembly;
        let Some(rules) = &assembly.artifact_rules else {
            debug!("no artifact rules");
            return Ok(());
        };

        for module in &assembly.modules {
            for rule in rules.rules_for(&module.id) {
                let version = artifact_version(module.id.version().unwrap_or("0.0.0"));
                if rule.is_allowed(&version) {
                    trace!(module = %module.id, %version, "allowed");
                    continue;
                }
                let message = format!(
                    "Artifact {} not allowed by rule: {}",
                    module.id,
                    rule.message.as_deref().unwrap_or_default()
                );
                match rule.mode.unwrap_or(rules.mode) {
                    Mode::Strict if rule.is_enforced(ctx.today) => {
                        ctx.report.add_artifact_error(&module.id, message)
                    }
                    Mode::Strict | Mode::Lenient | Mode::Definitive => {
                        ctx.report.add_artifact_warning(&module.id, message)
                    }
                    Mode::Silent | Mode::SilentDefinitive => {}
                }
            }
        }
        Ok(())
    }
}
