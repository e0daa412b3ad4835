//! # Regions Subcommand
//!
//! Parses a region document and lists each region with its parent and the
//! number of exports visible from it, ancestors included.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use apir_region::ApiRegions;

/// Arguments for the regions subcommand.
#[derive(Args, Debug)]
pub struct RegionsArgs {
    /// Region JSON document.
    pub file: PathBuf,

    /// Print the normalized JSON instead of the summary.
    #[arg(long)]
    pub json: bool,
}

/// One line per region: name, parent and effective export count.
pub fn render_summary(regions: &ApiRegions) -> String {
    let mut out = String::new();
    for region in regions.list_regions() {
        let parent = regions.parent(region.name()).map_or("-", |p| p.name());
        let _ = writeln!(
            out,
            "{:<16} parent: {:<16} exports: {} ({} own)",
            region.name(),
            parent,
            regions.list_all_exports(region.name()).len(),
            region.list_exports().len()
        );
    }
    let _ = write!(out, "Total: {} regions", regions.len());
    out
}

/// Execute the regions subcommand.
pub fn run_regions(args: &RegionsArgs) -> Result<u8> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let regions = ApiRegions::parse(&content)
        .with_context(|| format!("invalid region document {}", args.file.display()))?;
    tracing::debug!(regions = regions.len(), "parsed region document");

    if args.json {
        println!("{}", regions.to_json_string()?);
    } else {
        println!("{}", render_summary(&regions));
    }
    Ok(0)
}
