//! # Region Merge
//!
//! Folds the regions of one contributing artifact into an aggregate.
//! Regions are matched by name; unknown regions are appended. Within a
//! matched region, exports the aggregate already has are kept as they are
//! and new ones are appended, so the first contributor of a package wins.
//!
//! Provenance is tracked on every region touched: the source's declared
//! origins, or the source artifact itself when it declares none.

use tracing::debug;

use apir_core::ArtifactId;

use crate::error::RegionResult;
use crate::region::{ApiRegion, ApiRegions};

impl ApiRegions {
    /// Merge `source`, contributed by `source_id`, into `self`.
    pub fn merge_from(&mut self, source: &ApiRegions, source_id: &ArtifactId) -> RegionResult<()> {
        for region in source.list_regions() {
            let idx = match self.index_of(region.name()) {
                Some(idx) => idx,
                None => {
                    let parent = source
                        .parent(region.name())
                        .map(|p| p.name().to_string())
                        .filter(|p| self.index_of(p).is_some());
                    debug!(region = region.name(), source = %source_id, "adding region");
                    match parent {
                        Some(parent) => self.add_with_parent(ApiRegion::new(region.name()), &parent)?,
                        None => self.add(ApiRegion::new(region.name()))?,
                    }
                    self.len() - 1
                }
            };

            let target = self.region_at_mut(idx);
            for export in region.list_exports() {
                if target.export_by_name(export.name()).is_none() {
                    target.add(export.clone())?;
                } else {
                    debug!(
                        region = region.name(),
                        export = export.name(),
                        "keeping earlier export"
                    );
                }
            }
            for (key, value) in &region.properties {
                target.properties.insert(key.clone(), value.clone());
            }

            let origins: Vec<ArtifactId> = if region.feature_origins.is_empty() {
                vec![source_id.clone()]
            } else {
                region.feature_origins.clone()
            };
            for origin in origins {
                if !target.feature_origins.contains(&origin) {
                    target.feature_origins.push(origin);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ApiExport;

    fn id(s: &str) -> ArtifactId {
        ArtifactId::parse(s).unwrap()
    }

    fn regions(layout: &[(&str, &[&str])]) -> ApiRegions {
        let mut regions = ApiRegions::new();
        for (name, exports) in layout {
            let mut region = ApiRegion::new(*name);
            for e in *exports {
                region.add(ApiExport::new(*e)).unwrap();
            }
            regions.add(region).unwrap();
        }
        regions
    }

    #[test]
    fn merge_into_empty_records_source_origin() {
        let mut target = ApiRegions::new();
        let source = regions(&[("global", &["a"]), ("internal", &["b"])]);
        target.merge_from(&source, &id("g:f1:1")).unwrap();
        assert_eq!(target.region_names(), vec!["global", "internal"]);
        assert_eq!(target.parent("internal").unwrap().name(), "global");
        assert_eq!(
            target.region_by_name("global").unwrap().feature_origins,
            vec![id("g:f1:1")]
        );
    }

    #[test]
    fn merge_appends_new_exports_and_origins() {
        let mut target = regions(&[("global", &["a"])]);
        target.merge_from(&regions(&[("global", &["a"])]), &id("g:f0:1")).unwrap();
        target
            .merge_from(&regions(&[("global", &["a", "c"])]), &id("g:f2:1"))
            .unwrap();
        let global = target.region_by_name("global").unwrap();
        let names: Vec<&str> = global.list_exports().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(global.feature_origins, vec![id("g:f0:1"), id("g:f2:1")]);
    }

    #[test]
    fn declared_origins_win_over_source_id() {
        let mut source = regions(&[("global", &["a"])]);
        source
            .region_by_name_mut("global")
            .unwrap()
            .feature_origins
            .push(id("g:declared:1"));
        let mut target = ApiRegions::new();
        target.merge_from(&source, &id("g:f1:1")).unwrap();
        assert_eq!(
            target.region_by_name("global").unwrap().feature_origins,
            vec![id("g:declared:1")]
        );
    }

    #[test]
    fn new_region_keeps_source_parent() {
        let mut target = regions(&[("global", &[]), ("internal", &[])]);
        let mut source = ApiRegions::new();
        source.add(ApiRegion::new("global")).unwrap();
        source.add(ApiRegion::new("friends")).unwrap();
        target.merge_from(&source, &id("g:f:1")).unwrap();
        assert_eq!(target.parent("friends").unwrap().name(), "global");
    }
}
