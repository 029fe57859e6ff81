//! Property-based tests for the version type and the ledger.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use tempfile::TempDir;

use modver::core::ledger::Ledger;
use modver::core::version::Version;

/// Strategy for release versions with room for one more bump.
fn release_version() -> impl Strategy<Value = Version> {
    (0..u32::MAX, 0..u32::MAX, 0..u32::MAX).prop_map(|(a, b, c)| Version::new(a, b, c))
}

/// Strategy for any version, including the unknown marker.
fn any_version() -> impl Strategy<Value = Version> {
    prop_oneof![
        1 => Just(Version::Unknown),
        9 => (any::<u32>(), any::<u32>(), any::<u32>())
            .prop_map(|(a, b, c)| Version::new(a, b, c)),
    ]
}

/// Small versions so orderings collide often.
fn small_version() -> impl Strategy<Value = Version> {
    prop_oneof![
        1 => Just(Version::Unknown),
        9 => (0u32..3, 0u32..3, 0u32..3).prop_map(|(a, b, c)| Version::new(a, b, c)),
    ]
}

/// Strategy for module names.
fn module_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,12}"
}

fn module_map() -> impl Strategy<Value = BTreeMap<String, Version>> {
    prop::collection::btree_map(module_name(), any_version(), 0..8)
}

fn ledger_from(dir: &TempDir, publish: Version, modules: &BTreeMap<String, Version>) -> Ledger {
    let path = dir.path().join("versions.yml");
    let mut ledger = Ledger::empty(&path);
    if !publish.is_unknown() {
        ledger.set_version_to_publish(publish).unwrap();
    }
    ledger.sanitize_modules(modules.keys().cloned());
    for (name, version) in modules {
        ledger.record_first_version(name, *version).unwrap();
    }
    ledger
}

proptest! {
    /// Text form round-trips for every version.
    #[test]
    fn parse_display_roundtrip(v in any_version()) {
        prop_assert_eq!(Version::parse(&v.to_string()), Ok(v));
    }

    /// Ordering is transitive.
    #[test]
    fn ordering_transitive(a in small_version(), b in small_version(), c in small_version()) {
        if a < b && b < c {
            prop_assert!(a < c);
        }
    }

    /// Unknown sorts before every release version.
    #[test]
    fn unknown_is_least(v in release_version()) {
        prop_assert!(Version::Unknown < v);
    }

    /// Every bump strictly increases the version.
    #[test]
    fn bumps_are_monotonic(v in release_version()) {
        let (major, minor, _) = v.release().unwrap();

        let patch = v.bump_next_patch().unwrap();
        prop_assert!(patch > v);

        let minor_bump = v.bump_next_minor().unwrap();
        prop_assert!(minor_bump > v);
        prop_assert_eq!(minor_bump.release(), Some((major, minor + 1, 0)));

        let major_bump = v.bump_next_major().unwrap();
        prop_assert!(major_bump > v);
        prop_assert_eq!(major_bump.release(), Some((major + 1, 0, 0)));
    }

    /// Text with a separator count other than two never parses.
    #[test]
    fn wrong_arity_rejected(parts in prop::collection::vec(0u32..1000, 1..6)) {
        prop_assume!(parts.len() != 3);
        let text = parts.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(".");
        prop_assert!(Version::parse(&text).is_err());
    }

    /// Sanitize leaves exactly the current set, keeps surviving values, and
    /// a second pass changes nothing.
    #[test]
    fn sanitize_correct_and_idempotent(
        existing in module_map(),
        current in prop::collection::btree_set(module_name(), 0..8),
    ) {
        let dir = TempDir::new().unwrap();
        let mut ledger = ledger_from(&dir, Version::Unknown, &existing);

        ledger.sanitize_modules(current.iter().cloned());
        let keys: BTreeSet<String> = ledger.modules().map(|(n, _)| n.to_string()).collect();
        prop_assert_eq!(&keys, &current);
        for (name, version) in ledger.modules() {
            let expected = existing.get(name).copied().unwrap_or(Version::Unknown);
            prop_assert_eq!(version, expected);
        }

        let once = ledger.clone();
        let report = ledger.sanitize_modules(current.iter().cloned());
        prop_assert!(report.is_noop());
        prop_assert_eq!(ledger, once);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Persisting then loading yields the same ledger.
    #[test]
    fn persist_load_roundtrip(publish in any_version(), modules in module_map()) {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_from(&dir, publish, &modules);

        ledger.persist().unwrap();
        let loaded = Ledger::load(ledger.path()).unwrap();
        prop_assert_eq!(loaded, ledger);
    }
}
