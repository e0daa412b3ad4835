//! # apir-cli: CLI Tool for API Regions
//!
//! Provides the `apir` command-line interface over the region model, the
//! configuration API engine and the assembly analysers.
//!
//! ## Subcommands
//!
//! - `apir regions`: Parse a region document and list its regions.
//! - `apir merge`: Merge configuration API documents in order.
//! - `apir validate`: Validate a feature's configurations against an API.
//! - `apir analyse`: Run analyser tasks over an assembly snapshot.
//!
//! ```bash
//! apir regions api-regions.json
//! apir merge platform.json org.acme:extension:1.0=extension.json -o merged.json
//! apir validate --api merged.json --configurations feature.json --mode lenient
//! apir analyse assembly.json --config analyser.yaml
//! ```
//!
//! Every handler returns the process exit code: `0` when clean, `1` when
//! the input has errors.

pub mod analyse;
pub mod merge;
pub mod regions;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Read and decode a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse JSON in {}", path.display()))
}

/// Write `content` to `out`, or to stdout when no path is given.
pub fn write_output(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, format!("{content}\n"))
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}
