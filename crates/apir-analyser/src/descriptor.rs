//! # Assembly Snapshot
//!
//! The host hands the analysers one [`AssemblyDescriptor`]: the modules of
//! an assembly with their package exports and imports, start order and
//! feature origins, plus the region, configuration API and artifact rule
//! documents attached to the assembly.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use apir_config::{ArtifactRules, Configuration, ConfigurationApi, FrameworkProperty};
use apir_core::{ArtifactId, Version, VersionRange};
use apir_region::{ApiRegions, RegionResult};

fn is_false(b: &bool) -> bool {
    !*b
}

// ---------------------------------------------------------------------------
// Packages
// ---------------------------------------------------------------------------

/// A package exported by a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageExport {
    /// Package name.
    pub name: String,
    /// Exported version; unset means `0.0.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
}

impl PackageExport {
    /// Export of `name` without a version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// Builder: set the version.
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Effective version.
    pub fn effective_version(&self) -> Version {
        self.version.clone().unwrap_or_default()
    }
}

/// A package imported by a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageImport {
    /// Package name.
    pub name: String,
    /// Accepted version range; unset accepts every version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionRange>,
    /// Resolution is optional.
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
}

impl PackageImport {
    /// Mandatory import of `name` accepting any version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            optional: false,
        }
    }

    /// Builder: set the accepted range.
    pub fn with_version(mut self, range: VersionRange) -> Self {
        self.version = Some(range);
        self
    }

    /// Builder: mark optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Whether `export` satisfies this import.
    pub fn is_satisfied_by(&self, export: &PackageExport) -> bool {
        export.name == self.name
            && self
                .version
                .as_ref()
                .map_or(true, |range| range.includes(&export.effective_version()))
    }
}

impl fmt::Display for PackageImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(range) = &self.version {
            write!(f, ";version={range}")?;
        }
        if self.optional {
            f.write_str(";resolution:=optional")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Modules
// ---------------------------------------------------------------------------

/// One module (bundle) of the assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleDescriptor {
    /// Module identity.
    pub id: ArtifactId,
    /// Start order; lower starts earlier.
    #[serde(default)]
    pub start_order: i32,
    /// Features that contributed the module.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feature_origins: Vec<ArtifactId>,
    /// Exported packages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exports: Vec<PackageExport>,
    /// Imported packages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<PackageImport>,
}

impl ModuleDescriptor {
    /// Module with no packages.
    pub fn new(id: ArtifactId) -> Self {
        Self {
            id,
            start_order: 0,
            feature_origins: Vec::new(),
            exports: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// Builder: set the start order.
    pub fn with_start_order(mut self, start_order: i32) -> Self {
        self.start_order = start_order;
        self
    }

    /// Builder: add a feature origin.
    pub fn with_origin(mut self, origin: ArtifactId) -> Self {
        self.feature_origins.push(origin);
        self
    }

    /// Builder: add an export.
    pub fn with_export(mut self, export: PackageExport) -> Self {
        self.exports.push(export);
        self
    }

    /// Builder: add an import.
    pub fn with_import(mut self, import: PackageImport) -> Self {
        self.imports.push(import);
        self
    }

    /// Whether any export has this package name.
    pub fn is_exporting(&self, package: &str) -> bool {
        self.exports.iter().any(|e| e.name == package)
    }

    /// Whether some export satisfies `import`, version included.
    pub fn satisfies(&self, import: &PackageImport) -> bool {
        self.exports.iter().any(|e| import.is_satisfied_by(e))
    }

    /// Report label: `Bundle artifact:version`.
    pub fn label(&self) -> String {
        format!(
            "Bundle {}:{}",
            self.id.artifact_id(),
            self.id.version().unwrap_or_default()
        )
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Everything the analysers look at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssemblyDescriptor {
    /// Assembly identity.
    pub id: ArtifactId,
    /// The assembly claims to resolve all its imports itself.
    #[serde(default, skip_serializing_if = "is_false")]
    pub complete: bool,
    /// Framework packages, visible to every module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<ModuleDescriptor>,
    /// Modules of the assembly.
    #[serde(default)]
    pub modules: Vec<ModuleDescriptor>,
    /// Raw region document, decoded on demand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_regions: Option<Value>,
    /// Configuration API of the assembly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_api: Option<ConfigurationApi>,
    /// Artifact version rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_rules: Option<ArtifactRules>,
    /// Configurations supplied by the assembly.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<Configuration>,
    /// Framework properties supplied by the assembly.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub framework_properties: IndexMap<String, FrameworkProperty>,
}

impl AssemblyDescriptor {
    /// Empty assembly.
    pub fn new(id: ArtifactId) -> Self {
        Self {
            id,
            complete: false,
            framework: None,
            modules: Vec::new(),
            api_regions: None,
            configuration_api: None,
            artifact_rules: None,
            configurations: Vec::new(),
            framework_properties: IndexMap::new(),
        }
    }

    /// Parse the JSON form.
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Builder: add a module.
    pub fn with_module(mut self, module: ModuleDescriptor) -> Self {
        self.modules.push(module);
        self
    }

    /// Builder: attach a region document.
    pub fn with_regions(mut self, regions: &ApiRegions) -> Self {
        self.api_regions = Some(regions.to_json());
        self
    }

    /// Decode the region document, if any.
    pub fn regions(&self) -> RegionResult<Option<ApiRegions>> {
        self.api_regions.as_ref().map(ApiRegions::from_json).transpose()
    }
}
