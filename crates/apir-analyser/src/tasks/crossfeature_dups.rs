//! # Cross-Feature Duplicate Exports
//!
//! The packages a region exports belong to the features that define the
//! regions. A module contributed by any other feature must not export one
//! of them as well.
//!
//! Feature and package patterns match exactly, or by prefix when they end
//! in `*`.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use apir_core::ArtifactId;
use apir_region::ApiRegion;

use crate::error::AnalyserResult;
use crate::task::{AnalyserTask, TaskContext};
use crate::tasks::bracketed;

/// Comma separated regions to check; unset checks every region.
pub const REGIONS: &str = "regions";
/// Comma separated feature id patterns owning the region exports. Defaults
/// to the feature origins of all regions.
pub const DEFINING_FEATURES: &str = "definingFeatures";
/// Comma separated package patterns reported as warnings.
pub const WARNING_PACKAGES: &str = "warningPackages";
/// Comma separated package patterns not reported.
pub const IGNORED_PACKAGES: &str = "ignoredPackages";

/// Cross-feature duplicate export check.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckCrossFeatureDups;

fn matches_any(value: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| match p.strip_suffix('*') {
        Some(prefix) => value.starts_with(prefix),
        None => value == p,
    })
}

impl AnalyserTask for CheckCrossFeatureDups {
    fn id(&self) -> &'static str {
        "api-regions-crossfeature-dups"
    }

    fn name(&self) -> &'static str {
        "Cross-Feature Duplicate Export Check"
    }

    fn execute(&self, ctx: &mut TaskContext<'_>) -> AnalyserResult<()> {
        let Some(regions) = ctx.assembly.regions()? else {
            debug!("no regions to check");
            return Ok(());
        };

        let defining = ctx.configuration.get_list(DEFINING_FEATURES).unwrap_or_else(|| {
            let mut origins: Vec<String> = Vec::new();
            for origin in regions.list_regions().iter().flat_map(|r| &r.feature_origins) {
                if !origins.iter().any(|o| o == origin.as_str()) {
                    origins.push(origin.to_string());
                }
            }
            origins
        });
        if defining.is_empty() {
            debug!("no defining features");
            return Ok(());
        }

        let checked = ctx.configuration.get_list(REGIONS).unwrap_or_default();
        let ignored = ctx.configuration.get_list(IGNORED_PACKAGES).unwrap_or_default();
        let warning = ctx.configuration.get_list(WARNING_PACKAGES).unwrap_or_default();
        let checked_regions: Vec<&ApiRegion> = regions
            .list_regions()
            .iter()
            .filter(|r| checked.is_empty() || checked.iter().any(|c| c == r.name()))
            .collect();

        for module in &ctx.assembly.modules {
            let foreign: Vec<&ArtifactId> = module
                .feature_origins
                .iter()
                .filter(|o| !matches_any(o.as_str(), &defining))
                .collect();
            if foreign.is_empty() {
                trace!(module = %module.id, "only contributed by defining features");
                continue;
            }

            let mut reported = BTreeSet::new();
            for export in &module.exports {
                let package = export.name.as_str();
                if reported.contains(package) || matches_any(package, &ignored) {
                    continue;
                }
                let Some(region) = checked_regions.iter().find(|r| r.export_by_name(package).is_some()) else {
                    continue;
                };
                reported.insert(package);

                let message = format!(
                    "Package overlap found between region {} and bundle {} which comes from feature: {}. Both export package: {package}",
                    region.name(),
                    module.id,
                    bracketed(foreign.iter().map(|o| o.as_str()))
                );
                if matches_any(package, &warning) {
                    ctx.report.add_artifact_warning(&module.id, message);
                } else {
                    ctx.report.add_artifact_error(&module.id, message);
                }
            }
        }
        Ok(())
    }
}
