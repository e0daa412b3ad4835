//! Property tests for the version-range algebra.

use apir_core::{Version, VersionRange};
use proptest::prelude::*;

fn version() -> impl Strategy<Value = Version> {
    (0u64..20, 0u64..20, 0u64..20).prop_map(|(a, b, c)| Version::new(a, b, c))
}

proptest! {
    #[test]
    fn at_least_includes_everything_above(lo in version(), candidate in version()) {
        let range = VersionRange::at_least(lo.clone());
        prop_assert_eq!(range.includes(&candidate), candidate >= lo);
    }

    #[test]
    fn half_open_interval_matches_comparisons(a in version(), b in version(), candidate in version()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let range = VersionRange::interval(true, lo.clone(), hi.clone(), false);
        prop_assert_eq!(range.includes(&candidate), candidate >= lo && candidate < hi);
    }

    #[test]
    fn display_reparses_to_same_range(a in version(), b in version(), lc in any::<bool>(), rc in any::<bool>()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let range = VersionRange::interval(lc, lo, hi, rc);
        let reparsed = VersionRange::parse(&range.to_string()).unwrap();
        prop_assert_eq!(reparsed, range);
    }

    #[test]
    fn empty_ranges_include_nothing(a in version(), candidate in version()) {
        let range = VersionRange::interval(false, a.clone(), a, false);
        prop_assert!(range.is_empty());
        prop_assert!(!range.includes(&candidate));
    }
}

#[test]
fn bare_version_reparses() {
    let range = VersionRange::parse("2.1").unwrap();
    assert_eq!(VersionRange::parse(&range.to_string()).unwrap(), range);
}
