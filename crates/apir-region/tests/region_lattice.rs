//! Visibility invariants of the region chain.

use apir_region::{ApiExport, ApiRegion, ApiRegions};
use proptest::prelude::*;

/// Build a chain of `exports.len()` regions, region i exporting the given
/// package indices (so names can repeat across regions).
fn chain(exports: &[Vec<u8>]) -> ApiRegions {
    let mut regions = ApiRegions::new();
    for (i, pkgs) in exports.iter().enumerate() {
        let mut region = ApiRegion::new(format!("r{i}"));
        for p in pkgs {
            let name = format!("pkg{p}");
            if region.export_by_name(&name).is_none() {
                region.add(ApiExport::new(name)).unwrap();
            }
        }
        regions.add(region).unwrap();
    }
    regions
}

fn layout() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(0u8..8, 0..5), 1..6)
}

proptest! {
    #[test]
    fn all_exports_cover_parent(exports in layout()) {
        let regions = chain(&exports);
        for name in regions.region_names() {
            let own: Vec<&str> = regions.list_all_exports(name).iter().map(|e| e.name()).collect();
            if let Some(parent) = regions.parent(name) {
                for e in regions.list_all_exports(parent.name()) {
                    prop_assert!(own.contains(&e.name()));
                }
            }
        }
    }

    #[test]
    fn own_definition_shadows_ancestor(exports in layout()) {
        let regions = chain(&exports);
        for region in regions.list_regions() {
            for export in region.list_exports() {
                let visible = regions.all_export_by_name(region.name(), export.name()).unwrap();
                prop_assert!(std::ptr::eq(visible, export));
            }
        }
    }

    #[test]
    fn visible_names_are_unique(exports in layout()) {
        let regions = chain(&exports);
        for name in regions.region_names() {
            let mut names: Vec<&str> = regions.list_all_exports(name).iter().map(|e| e.name()).collect();
            let before = names.len();
            names.sort_unstable();
            names.dedup();
            prop_assert_eq!(before, names.len());
        }
    }

    #[test]
    fn allowed_names_start_with_self_and_end_at_root(exports in layout()) {
        let regions = chain(&exports);
        for name in regions.region_names() {
            let allowed = regions.allowed_region_names(name);
            prop_assert_eq!(allowed.first().copied(), Some(name));
            prop_assert_eq!(allowed.last().copied(), Some("r0"));
        }
    }
}

#[test]
fn json_roundtrip_preserves_graph() {
    let doc = r#"[
        {"name": "global", "exports": ["a", {"name": "b", "deprecated": {"msg": "m", "since": "1"}}]},
        {"name": "internal", "feature-origins": ["g:f:1"], "exports": [{"name": "c", "toggle": "t"}], "team": "core"}
    ]"#;
    let regions = ApiRegions::parse(doc).unwrap();
    let again = ApiRegions::parse(&regions.to_json_string().unwrap()).unwrap();
    assert_eq!(regions, again);
}
