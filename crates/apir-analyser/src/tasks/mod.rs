//! Built-in analyser tasks.

use std::collections::BTreeSet;

use apir_region::ApiRegions;

use crate::descriptor::ModuleDescriptor;
use crate::task::AnalyserTask;

pub mod artifact_rules;
pub mod configuration_api;
pub mod crossfeature_dups;
pub mod deprecation;
pub mod exports_imports;
pub mod order;

pub use artifact_rules::CheckArtifactRules;
pub use configuration_api::CheckConfigurationApi;
pub use crossfeature_dups::CheckCrossFeatureDups;
pub use deprecation::CheckDeprecatedApi;
pub use exports_imports::CheckExportsImports;
pub use order::CheckRegionOrder;

/// Every built-in task, in the order they run.
pub fn default_tasks() -> Vec<Box<dyn AnalyserTask>> {
    vec![
        Box::new(CheckExportsImports),
        Box::new(CheckDeprecatedApi),
        Box::new(CheckRegionOrder),
        Box::new(CheckArtifactRules),
        Box::new(CheckConfigurationApi),
        Box::new(CheckCrossFeatureDups),
    ]
}

/// Names of the regions the module's features contribute to.
pub(crate) fn module_regions(module: &ModuleDescriptor, regions: &ApiRegions) -> BTreeSet<String> {
    module
        .feature_origins
        .iter()
        .flat_map(|origin| regions.regions_by_feature(origin))
        .map(|r| r.name().to_string())
        .collect()
}

/// `[a, b]` rendering of a name set.
pub(crate) fn bracketed<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    format!("[{}]", joined.join(", "))
}
