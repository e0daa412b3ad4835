//! # Regions and the Region Registry
//!
//! [`ApiRegions`] owns every region of an aggregate in declaration order.
//! Parent links are indices into that arena, so ancestor walks are plain
//! loops and no region ever holds a reference to another.
//!
//! Unless a parent is named explicitly, a region's parent is the region
//! declared just before it; the first region (conventionally `global`) is
//! the root. Visibility is monotonic up the chain: a region sees its own
//! exports and those of every ancestor.

use std::collections::HashMap;

use indexmap::IndexMap;

use apir_core::ArtifactId;

use crate::error::{RegionError, RegionResult};
use crate::export::ApiExport;

/// Name of the root region visible to everyone.
pub const GLOBAL_REGION: &str = "global";

// ---------------------------------------------------------------------------
// ApiRegion
// ---------------------------------------------------------------------------

/// A named set of exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRegion {
    name: String,
    exports: Vec<ApiExport>,
    /// Artifacts that contributed this region.
    pub feature_origins: Vec<ArtifactId>,
    /// Passthrough properties.
    pub properties: IndexMap<String, String>,
}

impl ApiRegion {
    /// Empty region.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exports: Vec::new(),
            feature_origins: Vec::new(),
            properties: IndexMap::new(),
        }
    }

    /// Region name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add an export; a second export with the same name is rejected.
    pub fn add(&mut self, export: ApiExport) -> RegionResult<()> {
        if self.export_by_name(export.name()).is_some() {
            return Err(RegionError::DuplicateExport {
                export: export.name().to_string(),
                region: self.name.clone(),
            });
        }
        self.exports.push(export);
        Ok(())
    }

    /// Remove an export by name, returning it.
    pub fn remove(&mut self, name: &str) -> Option<ApiExport> {
        let pos = self.exports.iter().position(|e| e.name() == name)?;
        Some(self.exports.remove(pos))
    }

    /// Own exports in declaration order.
    pub fn list_exports(&self) -> &[ApiExport] {
        &self.exports
    }

    /// Own export by package name.
    pub fn export_by_name(&self, name: &str) -> Option<&ApiExport> {
        self.exports.iter().find(|e| e.name() == name)
    }

    /// Whether any of this region's origins is the same artifact as `id`.
    pub fn has_origin(&self, id: &ArtifactId) -> bool {
        self.feature_origins.iter().any(|o| o.is_same(id))
    }

    /// No exports.
    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ApiRegions
// ---------------------------------------------------------------------------

/// Arena of regions with single-parent links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRegions {
    regions: Vec<ApiRegion>,
    parents: Vec<Option<usize>>,
    index: HashMap<String, usize>,
}

impl ApiRegions {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a region whose parent is the previously added region.
    pub fn add(&mut self, region: ApiRegion) -> RegionResult<()> {
        let parent = self.regions.len().checked_sub(1);
        self.insert(region, parent)
    }

    /// Append a region under an explicitly named parent.
    pub fn add_with_parent(&mut self, region: ApiRegion, parent: &str) -> RegionResult<()> {
        let parent_idx = self
            .index
            .get(parent)
            .copied()
            .ok_or_else(|| RegionError::UnknownParent {
                name: region.name().to_string(),
                parent: parent.to_string(),
            })?;
        self.insert(region, Some(parent_idx))
    }

    fn insert(&mut self, region: ApiRegion, parent: Option<usize>) -> RegionResult<()> {
        if self.index.contains_key(region.name()) {
            return Err(RegionError::DuplicateRegion {
                name: region.name().to_string(),
            });
        }
        self.index.insert(region.name().to_string(), self.regions.len());
        self.regions.push(region);
        self.parents.push(parent);
        Ok(())
    }

    /// All regions in declaration order.
    pub fn list_regions(&self) -> &[ApiRegion] {
        &self.regions
    }

    /// Region names in declaration order.
    pub fn region_names(&self) -> Vec<&str> {
        self.regions.iter().map(ApiRegion::name).collect()
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// No regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region by name.
    pub fn region_by_name(&self, name: &str) -> Option<&ApiRegion> {
        self.index.get(name).map(|&i| &self.regions[i])
    }

    /// Mutable region by name.
    pub fn region_by_name_mut(&mut self, name: &str) -> Option<&mut ApiRegion> {
        match self.index.get(name) {
            Some(&i) => self.regions.get_mut(i),
            None => None,
        }
    }

    /// Regions contributed by an artifact (version-insensitive).
    pub fn regions_by_feature(&self, id: &ArtifactId) -> Vec<&ApiRegion> {
        self.regions.iter().filter(|r| r.has_origin(id)).collect()
    }

    /// Parent of the named region.
    pub fn parent(&self, name: &str) -> Option<&ApiRegion> {
        let idx = *self.index.get(name)?;
        self.parents[idx].map(|p| &self.regions[p])
    }

    /// Whether the parent link of `name` is the implicit "previous region" one.
    pub fn has_implicit_parent(&self, name: &str) -> bool {
        match self.index.get(name) {
            Some(&idx) => self.parents[idx] == idx.checked_sub(1),
            None => false,
        }
    }

    fn chain(&self, idx: usize) -> Vec<usize> {
        let mut chain = vec![idx];
        let mut cursor = self.parents[idx];
        while let Some(p) = cursor {
            // Parents always precede their children, so this terminates.
            chain.push(p);
            cursor = self.parents[p];
        }
        chain
    }

    /// Ancestors of the named region, closest first, excluding itself.
    pub fn ancestors(&self, name: &str) -> Vec<&ApiRegion> {
        match self.index.get(name) {
            Some(&idx) => self
                .chain(idx)
                .into_iter()
                .skip(1)
                .map(|i| &self.regions[i])
                .collect(),
            None => Vec::new(),
        }
    }

    /// `{name} ∪ ancestors(name)`; empty for an unknown region.
    pub fn allowed_region_names(&self, name: &str) -> Vec<&str> {
        match self.index.get(name) {
            Some(&idx) => self
                .chain(idx)
                .into_iter()
                .map(|i| self.regions[i].name())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Exports visible from the named region, outermost ancestor first.
    ///
    /// A name declared closer to the region shadows the same name further
    /// up the chain.
    pub fn list_all_exports(&self, name: &str) -> Vec<&ApiExport> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        let chain = self.chain(idx);
        let mut result = Vec::new();
        for (depth, &region_idx) in chain.iter().enumerate().rev() {
            for export in self.regions[region_idx].list_exports() {
                let shadowed = chain[..depth]
                    .iter()
                    .any(|&closer| self.regions[closer].export_by_name(export.name()).is_some());
                if !shadowed {
                    result.push(export);
                }
            }
        }
        result
    }

    /// Closest visible export with the given package name.
    pub fn all_export_by_name(&self, region: &str, export: &str) -> Option<&ApiExport> {
        let &idx = self.index.get(region)?;
        self.chain(idx)
            .into_iter()
            .find_map(|i| self.regions[i].export_by_name(export))
    }

    /// Names of all regions (in declaration order) that export `package`.
    pub fn regions_exporting(&self, package: &str) -> Vec<&str> {
        self.regions
            .iter()
            .filter(|r| r.export_by_name(package).is_some())
            .map(ApiRegion::name)
            .collect()
    }

    /// Explicit parent name for serialization; `None` when implicit.
    pub(crate) fn explicit_parent_name(&self, idx: usize) -> Option<&str> {
        let parent = self.parents[idx]?;
        if Some(parent) == idx.checked_sub(1) {
            None
        } else {
            Some(self.regions[parent].name())
        }
    }

    pub(crate) fn region_at_mut(&mut self, idx: usize) -> &mut ApiRegion {
        &mut self.regions[idx]
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}
