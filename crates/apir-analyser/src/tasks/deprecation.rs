//! # Deprecated API Usage
//!
//! Reports imports of packages that a region marks as deprecated.
//!
//! Only modules whose regions all lie within the checked region's ancestor
//! chain are checked. An import counts as deprecated only when no export of
//! the package from outside the declaring feature could satisfy it: a
//! non-deprecated provider always takes precedence.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::{debug, trace};

use apir_core::days_after;
use apir_region::{ApiRegion, ApiRegions, DeprecationInfo, DeprecationMode, GLOBAL_REGION};

use crate::descriptor::{ModuleDescriptor, PackageExport, PackageImport};
use crate::error::AnalyserResult;
use crate::task::{AnalyserTask, TaskContext};
use crate::tasks::module_regions;

/// Comma separated regions to check.
pub const REGIONS: &str = "regions";
/// Report findings without an explicit mode as errors.
pub const STRICT: &str = "strict";
/// Days ahead in which a scheduled removal is reported as an error.
pub const REMOVAL_PERIOD: &str = "removal-period";
/// Also check optional imports.
pub const CHECK_OPTIONAL_IMPORTS: &str = "check-optional-imports";

/// Deprecated package usage check.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckDeprecatedApi;

/// A deprecated package with the exports that provide it, split by whether
/// they come from the declaring feature.
#[derive(Debug)]
struct DeprecatedPackage<'a> {
    info: &'a DeprecationInfo,
    deprecated: Vec<&'a PackageExport>,
    non_deprecated: Vec<&'a PackageExport>,
}

impl<'a> DeprecatedPackage<'a> {
    fn is_deprecated(&self, import: &PackageImport) -> Option<&'a DeprecationInfo> {
        let matches = |export: &&PackageExport| match (&export.version, &import.version) {
            (Some(version), Some(range)) => range.includes(version),
            _ => true,
        };
        if self.non_deprecated.iter().any(matches) {
            return None;
        }
        self.deprecated.iter().any(matches).then_some(self.info)
    }
}

#[derive(Debug, Clone, Copy)]
struct Options {
    strict: bool,
    removal_period: Option<u32>,
    check_optional: bool,
}

fn first_origin_matches(module: &ModuleDescriptor, region: &ApiRegion) -> bool {
    match (region.feature_origins.first(), module.feature_origins.first()) {
        (None, _) => true,
        (Some(region_origin), Some(module_origin)) => module_origin.is_same(region_origin),
        (Some(_), None) => false,
    }
}

/// Deprecated packages visible from `region`, closest declaration first.
fn deprecated_packages<'a>(
    regions: &'a ApiRegions,
    region: &'a ApiRegion,
    modules: &'a [(&'a ModuleDescriptor, BTreeSet<String>)],
) -> HashMap<&'a str, DeprecatedPackage<'a>> {
    let mut result = HashMap::new();
    let chain = std::iter::once(region).chain(regions.ancestors(region.name()));
    for current in chain {
        for export in current.list_exports() {
            let Some(info) = export.package_deprecation() else {
                continue;
            };
            if result.contains_key(export.name()) {
                continue;
            }
            let mut package = DeprecatedPackage {
                info,
                deprecated: Vec::new(),
                non_deprecated: Vec::new(),
            };
            for (module, names) in modules {
                if !names.contains(current.name()) {
                    continue;
                }
                let from_declaring_feature = first_origin_matches(module, current);
                for provided in module.exports.iter().filter(|e| e.name == export.name()) {
                    if from_declaring_feature {
                        package.deprecated.push(provided);
                    } else {
                        package.non_deprecated.push(provided);
                    }
                }
            }
            result.insert(export.name(), package);
        }
    }
    result
}

fn in_scope(names: &BTreeSet<String>, region: &str, allowed: &[&str]) -> bool {
    names.contains(region) && names.iter().all(|n| allowed.contains(&n.as_str()))
}

fn finding(package: &str, info: &DeprecationInfo, options: Options, today: NaiveDate) -> (bool, String) {
    let mut message = format!("Usage of deprecated package found : {package} : {}", info.message);
    if let Some(since) = &info.since {
        message.push_str(&format!(" Deprecated since {since}"));
    }
    let mut is_error = match info.mode {
        Some(mode) => mode == DeprecationMode::Strict,
        None => options.strict,
    };
    if let Some(removal) = &info.for_removal {
        let imminent = match (options.removal_period, info.for_removal_date()) {
            (Some(days), Some(date)) => date <= days_after(today, days),
            _ => false,
        };
        if imminent {
            is_error = true;
            message.push_str(&format!(
                " The package is scheduled to be removed in less than {} days by {removal}",
                options.removal_period.unwrap_or_default()
            ));
        } else {
            message.push_str(&format!(" For removal : {removal}"));
        }
    }
    (is_error, message)
}

impl CheckDeprecatedApi {
    fn check_region(
        &self,
        ctx: &mut TaskContext<'_>,
        regions: &ApiRegions,
        region: &ApiRegion,
        modules: &[(&ModuleDescriptor, BTreeSet<String>)],
        options: Options,
    ) {
        let deprecated = deprecated_packages(regions, region, modules);
        debug!(region = region.name(), packages = deprecated.len(), "deprecated packages");
        let allowed = regions.allowed_region_names(region.name());

        for (module, names) in modules {
            if !in_scope(names, region.name(), &allowed) {
                trace!(module = %module.id, region = region.name(), "module out of scope");
                continue;
            }
            for import in &module.imports {
                if import.optional && !options.check_optional {
                    continue;
                }
                let Some(info) = deprecated
                    .get(import.name.as_str())
                    .and_then(|p| p.is_deprecated(import))
                else {
                    continue;
                };
                let (is_error, message) = finding(&import.name, info, options, ctx.today);
                if is_error {
                    ctx.report.add_artifact_error(&module.id, message);
                } else {
                    ctx.report.add_artifact_warning(&module.id, message);
                }
            }
        }
    }
}

impl AnalyserTask for CheckDeprecatedApi {
    fn id(&self) -> &'static str {
        "api-regions-check-deprecated-api"
    }

    fn name(&self) -> &'static str {
        "Region Deprecated API Check"
    }

    fn execute(&self, ctx: &mut TaskContext<'_>) -> AnalyserResult<()> {
        let Some(regions) = ctx.assembly.regions()? else {
            ctx.report.add_error("No regions configured");
            return Ok(());
        };

        let period = ctx.configuration.get_int(self.id(), REMOVAL_PERIOD)?;
        let options = Options {
            strict: ctx.configuration.get_bool(STRICT, false),
            removal_period: period.filter(|d| *d > 0).map(|d| u32::try_from(d).unwrap_or(u32::MAX)),
            check_optional: ctx.configuration.get_bool(CHECK_OPTIONAL_IMPORTS, false),
        };
        let names = ctx
            .configuration
            .get_list(REGIONS)
            .unwrap_or_else(|| vec![GLOBAL_REGION.to_string()]);

        let assembly = ctx.assembly;
        let modules: Vec<(&ModuleDescriptor, BTreeSet<String>)> = assembly
            .modules
            .iter()
            .map(|m| (m, module_regions(m, &regions)))
            .collect();

        for name in &names {
            match regions.region_by_name(name) {
                Some(region) => self.check_region(ctx, &regions, region, &modules, options),
                None => ctx.report.add_error(format!("Region not found: {name}")),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::AssemblyDescriptor;
    use crate::report::AnalysisReport;
    use crate::settings::TaskConfiguration;
    use apir_core::{ArtifactId, Version, VersionRange};
    use apir_region::{ApiExport, Deprecation};

    fn id(s: &str) -> ArtifactId {
        ArtifactId::parse(s).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn run(assembly: &AssemblyDescriptor, cfg: &TaskConfiguration) -> AnalysisReport {
        let mut report = AnalysisReport::new();
        let mut ctx = TaskContext {
            assembly,
            configuration: cfg,
            today: today(),
            report: &mut report,
        };
        CheckDeprecatedApi.execute(&mut ctx).unwrap();
        report
    }

    /// `global` is declared by f1 and also holds f2 (consumers) and f3
    /// (an independent provider).
    fn regions(info: DeprecationInfo) -> ApiRegions {
        let mut global = ApiRegion::new("global");
        global
            .add(ApiExport::new("org.acme.old").with_deprecation(Deprecation::Package(info)))
            .unwrap();
        global.feature_origins = vec![id("g:f1:1"), id("g:f2:1"), id("g:f3:1")];
        let mut regions = ApiRegions::new();
        regions.add(global).unwrap();
        regions
    }

    fn assembly(info: DeprecationInfo, import: PackageImport) -> AssemblyDescriptor {
        AssemblyDescriptor::new(id("g:assembly:1"))
            .with_regions(&regions(info))
            .with_module(
                ModuleDescriptor::new(id("g:provider:1"))
                    .with_origin(id("g:f1:1"))
                    .with_export(PackageExport::new("org.acme.old").with_version(Version::new(1, 5, 0))),
            )
            .with_module(
                ModuleDescriptor::new(id("g:consumer:1"))
                    .with_origin(id("g:f2:1"))
                    .with_import(import),
            )
    }

    fn import(range: &str) -> PackageImport {
        PackageImport::new("org.acme.old").with_version(VersionRange::parse(range).unwrap())
    }

    #[test]
    fn deprecated_import_is_a_warning_by_default() {
        let a = assembly(DeprecationInfo::new("Use org.acme.new").since("2.0"), import("[1.0,2.0)"));
        let report = run(&a, &TaskConfiguration::new());
        assert!(report.is_valid());
        assert_eq!(
            report.warning_messages(),
            vec!["Usage of deprecated package found : org.acme.old : Use org.acme.new Deprecated since 2.0"]
        );
        assert_eq!(report.warnings[0].subject, Some(id("g:consumer:1")));
    }

    #[test]
    fn strict_setting_and_mode_override() {
        let a = assembly(DeprecationInfo::new("gone"), import("[1.0,2.0)"));
        let strict = TaskConfiguration::new().with(STRICT, "true");
        assert_eq!(run(&a, &strict).errors.len(), 1);

        let a = assembly(DeprecationInfo::new("gone").mode(DeprecationMode::Lenient), import("[1.0,2.0)"));
        let report = run(&a, &strict);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn non_deprecated_provider_takes_precedence() {
        let independent = ModuleDescriptor::new(id("g:independent:1"))
            .with_origin(id("g:f3:1"))
            .with_export(PackageExport::new("org.acme.old").with_version(Version::new(3, 0, 0)));

        // 3.0 from f3 satisfies the import, so it is not a deprecated use.
        let a = assembly(DeprecationInfo::new("gone"), import("[1.0,4.0)")).with_module(independent.clone());
        assert!(run(&a, &TaskConfiguration::new()).warnings.is_empty());

        // Only the deprecated 1.5 satisfies [1.0,2.0).
        let a = assembly(DeprecationInfo::new("gone"), import("[1.0,2.0)")).with_module(independent.clone());
        assert_eq!(run(&a, &TaskConfiguration::new()).warnings.len(), 1);

        // Without a range any provider matches; the independent one wins.
        let a = assembly(DeprecationInfo::new("gone"), PackageImport::new("org.acme.old")).with_module(independent);
        assert!(run(&a, &TaskConfiguration::new()).warnings.is_empty());
    }

    #[test]
    fn imminent_removal_is_an_error() {
        let info = DeprecationInfo::new("gone").for_removal("2025-01-20");
        let a = assembly(info, import("[1.0,2.0)"));

        let report = run(&a, &TaskConfiguration::new().with(REMOVAL_PERIOD, "30"));
        assert_eq!(
            report.error_messages(),
            vec!["Usage of deprecated package found : org.acme.old : gone The package is scheduled to be removed in less than 30 days by 2025-01-20"]
        );

        let report = run(&a, &TaskConfiguration::new().with(REMOVAL_PERIOD, "10"));
        assert!(report.is_valid());
        assert_eq!(
            report.warning_messages(),
            vec!["Usage of deprecated package found : org.acme.old : gone For removal : 2025-01-20"]
        );
    }

    #[test]
    fn optional_imports_need_opt_in() {
        let a = assembly(DeprecationInfo::new("gone"), import("[1.0,2.0)").optional());
        assert!(run(&a, &TaskConfiguration::new()).warnings.is_empty());
        let cfg = TaskConfiguration::new().with(CHECK_OPTIONAL_IMPORTS, "true");
        assert_eq!(run(&a, &cfg).warnings.len(), 1);
    }

    #[test]
    fn modules_outside_the_region_are_skipped() {
        let outsider = ModuleDescriptor::new(id("g:outsider:1"))
            .with_origin(id("g:f9:1"))
            .with_import(import("[1.0,2.0)"));
        let a = assembly(DeprecationInfo::new("gone"), PackageImport::new("org.acme.unrelated")).with_module(outsider);
        assert!(run(&a, &TaskConfiguration::new()).warnings.is_empty());
    }

    #[test]
    fn straddling_module_is_out_of_scope() {
        let mut regions = regions(DeprecationInfo::new("gone"));
        let mut other = ApiRegion::new("other");
        other.feature_origins.push(id("g:f2:1"));
        regions.add(other).unwrap();
        let names = BTreeSet::from(["global".to_string(), "other".to_string()]);
        assert!(!in_scope(&names, "global", &regions.allowed_region_names("global")));
        assert!(in_scope(&names, "other", &regions.allowed_region_names("other")));
    }

    #[test]
    fn missing_regions_and_unknown_names() {
        let a = AssemblyDescriptor::new(id("g:assembly:1"));
        assert_eq!(run(&a, &TaskConfiguration::new()).error_messages(), vec!["No regions configured"]);

        let a = assembly(DeprecationInfo::new("gone"), import("[1.0,2.0)"));
        let report = run(&a, &TaskConfiguration::new().with(REGIONS, "global, nowhere"));
        assert_eq!(report.error_messages(), vec!["Region not found: nowhere"]);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn malformed_period_is_fatal() {
        let a = assembly(DeprecationInfo::new("gone"), import("[1.0,2.0)"));
        let cfg = TaskConfiguration::new().with(REMOVAL_PERIOD, "soon");
        let mut report = AnalysisReport::new();
        let mut ctx = TaskContext {
            assembly: &a,
            configuration: &cfg,
            today: today(),
            report: &mut report,
        };
        assert!(CheckDeprecatedApi.execute(&mut ctx).is_err());
    }
}
