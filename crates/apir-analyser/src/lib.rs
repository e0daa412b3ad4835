//! # apir-analyser: Assembly Analysers
//!
//! Checks run over an [`AssemblyDescriptor`]: the modules of an assembly,
//! their package wiring, and the region, configuration API and artifact
//! rule documents attached to it.
//!
//! ## Tasks
//!
//! | Id | Check |
//! |----|-------|
//! | `api-regions-exportsimports` | Every import is satisfied by a visible, version-compatible export |
//! | `api-regions-check-deprecated-api` | Imports of deprecated packages |
//! | `api-regions-check-order` | Regions are declared in the configured order |
//! | `artifact-rules` | Module versions against artifact version rules |
//! | `configuration-api` | Configurations and framework properties against the configuration API |
//! | `api-regions-crossfeature-dups` | Region exports re-exported by modules of other features |
//!
//! Findings land in an [`AnalysisReport`]. A task returns `Err` only when
//! its input cannot be analysed at all.
//!
//! ```no_run
//! use apir_analyser::{Analyser, AnalyserSettings, AssemblyDescriptor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let assembly = AssemblyDescriptor::parse(&std::fs::read_to_string("assembly.json")?)?;
//! let report = Analyser::with_default_tasks().run(&assembly, &AnalyserSettings::default())?;
//! for error in &report.errors {
//!     eprintln!("{error}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod descriptor;
pub mod error;
pub mod report;
pub mod settings;
pub mod task;
pub mod tasks;

pub use descriptor::{AssemblyDescriptor, ModuleDescriptor, PackageExport, PackageImport};
pub use error::{AnalyserError, AnalyserResult};
pub use report::{AnalysisReport, Finding};
pub use settings::{AnalyserSettings, TaskConfiguration};
pub use task::{Analyser, AnalyserTask, TaskContext};
pub use tasks::{
    default_tasks, CheckArtifactRules, CheckConfigurationApi, CheckCrossFeatureDups, CheckDeprecatedApi,
    CheckExportsImports, CheckRegionOrder,
};
