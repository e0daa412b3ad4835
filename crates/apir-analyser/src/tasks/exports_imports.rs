//! # Import/Export Visibility
//!
//! Checks that every package a module imports is exported by a module that
//! starts no later and that the importer is allowed to see.
//!
//! Modules are processed in start order groups. An exporter is visible to an
//! importer when:
//!
//! 1. both were contributed by a common feature, or
//! 2. the exporter belongs to no region, or to `global`, or
//! 3. one of the exporter's regions that lists the package is in the
//!    ancestor closure of one of the importer's regions.
//!
//! No candidate at all is a missing import. Candidates that are all
//! invisible or version-incompatible make a version-range finding with
//! region diagnostics. Several matches are reported, not resolved.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace, warn};

use apir_region::{ApiRegions, GLOBAL_REGION};

use crate::descriptor::{ModuleDescriptor, PackageImport};
use crate::error::AnalyserResult;
use crate::task::{AnalyserTask, TaskContext};
use crate::tasks::{bracketed, module_regions};

/// Setting that disables region checks.
pub const IGNORE_API_REGIONS: &str = "ignoreAPIRegions";

const NO_REGION: &str = " __NO_REGION__ ";
const OWN_FEATURE: &str = " __OWN_FEATURE__ ";

/// Package import/export visibility check.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckExportsImports;

#[derive(Debug, Default)]
struct ModuleFindings<'a> {
    missing: Vec<&'a PackageImport>,
    missing_with_version: Vec<&'a PackageImport>,
    missing_optional: Vec<&'a PackageImport>,
    several: Vec<&'a PackageImport>,
    region_info: Vec<(&'a PackageImport, BTreeSet<String>, BTreeSet<String>)>,
}

struct Resolver<'r> {
    regions: &'r ApiRegions,
    ignore_regions: bool,
}

impl Resolver<'_> {
    fn regions_of(&self, module: &ModuleDescriptor) -> BTreeSet<String> {
        let mut result = if self.ignore_regions {
            BTreeSet::new()
        } else {
            module_regions(module, self.regions)
        };
        if result.is_empty() {
            result.insert(NO_REGION.to_string());
        }
        result
    }

    /// Exporters of the package by name, each with the regions through
    /// which it exports the package.
    fn candidates<'m>(
        &self,
        exporting: &[&'m ModuleDescriptor],
        import: &PackageImport,
        importer: &ModuleDescriptor,
    ) -> Vec<(&'m ModuleDescriptor, BTreeSet<String>)> {
        let mut candidates = Vec::new();
        for &exporter in exporting {
            if !exporter.is_exporting(&import.name) {
                continue;
            }
            let shares_feature = !self.ignore_regions
                && exporter
                    .feature_origins
                    .iter()
                    .any(|o| importer.feature_origins.contains(o));
            if shares_feature {
                trace!(package = %import.name, exporter = %exporter.id, "exporter shares a feature with importer");
                candidates.push((exporter, BTreeSet::from([OWN_FEATURE.to_string()])));
                continue;
            }

            let regions: BTreeSet<String> = self
                .regions_of(exporter)
                .into_iter()
                .filter(|region| {
                    region == NO_REGION || self.regions.all_export_by_name(region, &import.name).is_some()
                })
                .collect();
            if !regions.is_empty() {
                candidates.push((exporter, regions));
            }
        }
        candidates
    }

    /// Importer's regions together with all their ancestors.
    fn visible_regions(&self, importer: &ModuleDescriptor) -> BTreeSet<String> {
        self.regions_of(importer)
            .iter()
            .flat_map(|r| self.regions.allowed_region_names(r))
            .map(String::from)
            .collect()
    }
}

impl AnalyserTask for CheckExportsImports {
    fn id(&self) -> &'static str {
        "api-regions-exportsimports"
    }

    fn name(&self) -> &'static str {
        "Bundle Import/Export Check"
    }

    fn execute(&self, ctx: &mut TaskContext<'_>) -> AnalyserResult<()> {
        let ignore_regions = ctx.configuration.get_bool(IGNORE_API_REGIONS, false);
        let assembly = ctx.assembly;

        let regions = match assembly.regions() {
            Ok(regions) => regions.unwrap_or_default(),
            Err(e) => {
                ctx.report
                    .add_error(format!("API Region does not represent a valid JSON 'api-regions': {e}"));
                return Ok(());
            }
        };
        let resolver = Resolver {
            regions: &regions,
            ignore_regions,
        };

        let mut groups: BTreeMap<i32, Vec<(usize, &ModuleDescriptor)>> = BTreeMap::new();
        for (idx, module) in assembly.modules.iter().enumerate() {
            groups.entry(module.start_order).or_default().push((idx, module));
        }

        let mut exporting: Vec<&ModuleDescriptor> = assembly.framework.iter().collect();
        let mut findings: BTreeMap<usize, ModuleFindings<'_>> = BTreeMap::new();

        for (start_order, group) in &groups {
            debug!(start_order, modules = group.len(), "checking start order group");
            exporting.extend(group.iter().map(|(_, m)| *m).filter(|m| !m.exports.is_empty()));

            for &(idx, importer) in group {
                for import in &importer.imports {
                    let candidates = resolver.candidates(&exporting, import, importer);
                    let entry = findings.entry(idx).or_default();
                    if candidates.is_empty() {
                        if import.optional {
                            entry.missing_optional.push(import);
                        } else {
                            entry.missing.push(import);
                        }
                        continue;
                    }

                    let mut matching = 0usize;
                    let mut exporting_regions = BTreeSet::new();
                    let mut importing_regions = BTreeSet::new();
                    for (exporter, ex_regions) in &candidates {
                        if !exporter.satisfies(import) {
                            continue;
                        }
                        if ex_regions.contains(NO_REGION)
                            || ex_regions.contains(GLOBAL_REGION)
                            || ex_regions.contains(OWN_FEATURE)
                        {
                            matching += 1;
                            continue;
                        }
                        let visible = resolver.visible_regions(importer);
                        exporting_regions.extend(ex_regions.iter().cloned());
                        importing_regions.extend(visible.iter().cloned());
                        if visible.iter().any(|r| ex_regions.contains(r)) {
                            matching += 1;
                        } else {
                            trace!(
                                package = %import.name,
                                exporter = %exporter.id,
                                importer = %importer.id,
                                "no overlapping region"
                            );
                        }
                    }

                    if matching == 0 {
                        if import.optional {
                            entry.missing_optional.push(import);
                        } else {
                            entry.missing_with_version.push(import);
                            entry.region_info.push((import, exporting_regions, importing_regions));
                        }
                    } else if matching > 1 {
                        entry.several.push(import);
                    }
                }
            }
        }

        let mut error_reported = false;
        for (idx, found) in &findings {
            let module = &assembly.modules[*idx];
            let prefix = format!("{} is importing", module.label());
            let level = module.start_order;

            if !found.missing.is_empty() {
                ctx.report.add_artifact_error(
                    &module.id,
                    format!(
                        "{prefix} package(s) {} in start level {level} but no bundle is exporting these for that start level.",
                        package_names(&found.missing)
                    ),
                );
                error_reported = true;
            }
            if !found.missing_with_version.is_empty() {
                let mut message = format!(
                    "{prefix} package(s) {} in start level {level} but no visible bundle is exporting these for that start level in the required version range.",
                    package_infos(&found.missing_with_version)
                );
                for (import, exported_in, imported_in) in &found.region_info {
                    if !exported_in.is_empty() {
                        message.push_str(&format!(
                            "\n{} is exported in regions {} but it is imported in regions {}",
                            import.name,
                            bracketed(exported_in),
                            bracketed(imported_in)
                        ));
                    }
                }
                ctx.report.add_artifact_error(&module.id, message);
                error_reported = true;
            }
            if !found.missing_optional.is_empty() {
                ctx.report.add_artifact_warning(
                    &module.id,
                    format!(
                        "{prefix} optional package(s) {} in start level {level} but no bundle is exporting these for that start level.",
                        package_names(&found.missing_optional)
                    ),
                );
            }
            if !found.several.is_empty() {
                ctx.report.add_artifact_warning(
                    &module.id,
                    format!(
                        "{prefix} package(s) {} in start level {level} but multiple bundles are exporting these for that start level.",
                        package_names(&found.several)
                    ),
                );
            }
        }

        if error_reported && assembly.complete {
            warn!(assembly = %assembly.id, "complete assembly has missing imports");
            ctx.report.add_error(format!(
                "Assembly {} is marked as 'complete' but has missing imports.",
                assembly.id
            ));
        }
        Ok(())
    }
}

fn package_names(imports: &[&PackageImport]) -> String {
    match imports {
        [single] => single.name.clone(),
        _ => bracketed(imports.iter().map(|i| i.name.as_str())),
    }
}

fn package_infos(imports: &[&PackageImport]) -> String {
    match imports {
        [single] => single.to_string(),
        _ => bracketed(imports.iter().map(|i| i.to_string())),
    }
}
