//! # Merge Subcommand
//!
//! Merges configuration API documents in the order given. The first input
//! becomes the aggregate; every later one is merged as an independent
//! contributor. An optional prototype is merged last with prototype
//! semantics. Additions still waiting for their base at the end fail the
//! merge.
//!
//! Inputs are written `ID=PATH` to name the contributing artifact, or just
//! `PATH`, in which case the contributor is `file:<file stem>`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use apir_config::{merge, ConfigurationApi, MergeKind};
use apir_core::ArtifactId;

use crate::{read_json, write_output};

/// Arguments for the merge subcommand.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Contributor documents, `ID=PATH` or `PATH`, in merge order.
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Prototype document merged into the aggregate, `ID=PATH` or `PATH`.
    #[arg(long)]
    pub prototype: Option<String>,

    /// Output file; stdout when omitted.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Split an `ID=PATH` input into contributor id and path.
pub fn parse_input(input: &str) -> Result<(ArtifactId, PathBuf)> {
    if let Some((id, path)) = input.split_once('=') {
        let id = ArtifactId::parse(id).with_context(|| format!("invalid contributor id in '{input}'"))?;
        return Ok((id, PathBuf::from(path)));
    }
    let path = PathBuf::from(input);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && !s.contains(':'))
        .with_context(|| format!("cannot derive a contributor id from '{input}'; use ID=PATH"))?;
    let id = ArtifactId::parse(&format!("file:{stem}"))?;
    Ok((id, path))
}

fn load(path: &Path) -> Result<ConfigurationApi> {
    let value: serde_json::Value = read_json(path)?;
    ConfigurationApi::from_json(value).with_context(|| format!("invalid configuration API in {}", path.display()))
}

/// Merge `inputs` in order, then `prototype` if given.
pub fn merge_inputs(inputs: &[String], prototype: Option<&str>) -> Result<ConfigurationApi> {
    let mut aggregate: Option<ConfigurationApi> = None;
    for input in inputs {
        let (id, path) = parse_input(input)?;
        let kind = if aggregate.is_none() {
            MergeKind::Initial
        } else {
            MergeKind::Ordinary
        };
        tracing::info!(contributor = %id, path = %path.display(), "merging");
        aggregate = Some(merge(aggregate, load(&path)?, &id, kind).with_context(|| format!("merging {id} failed"))?);
    }
    let mut aggregate = aggregate.context("no input documents")?;

    if let Some(prototype) = prototype {
        let (id, path) = parse_input(prototype)?;
        tracing::info!(prototype = %id, path = %path.display(), "merging prototype");
        aggregate = merge(Some(aggregate), load(&path)?, &id, MergeKind::Prototype)
            .with_context(|| format!("merging prototype {id} failed"))?;
    }

    aggregate.ensure_no_pending_additions()?;
    Ok(aggregate)
}

/// Execute the merge subcommand.
pub fn run_merge(args: &MergeArgs) -> Result<u8> {
    let aggregate = merge_inputs(&args.inputs, args.prototype.as_deref())?;
    write_output(args.out.as_deref(), &aggregate.to_json_string()?)?;
    Ok(0)
}
