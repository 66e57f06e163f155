use std::cell::Cell;
use std::collections::BTreeSet;
use std::fmt;

use storefront_catalog::{
    MAX_SUFFIX_ATTEMPTS, ResolveError, Slug, SlugIndex, SlugLookup, ensure_unique, lookup_fn,
    normalize,
};

#[derive(Debug)]
struct StoreDown;

impl fmt::Display for StoreDown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store unreachable")
    }
}

impl std::error::Error for StoreDown {}

fn owners(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn slug(s: &str) -> Slug {
    Slug::parse(s).unwrap()
}

#[test]
fn free_candidate_is_unchanged() {
    let index = SlugIndex::new();
    let resolved = ensure_unique(&slug("face-wash"), "p1", &index).unwrap();
    assert_eq!(resolved, "face-wash");
}

#[test]
fn owner_self_match_is_unchanged() {
    let index = SlugIndex::from_assignments([("p1", "face-wash")]);
    let resolved = ensure_unique(&slug("face-wash"), "p1", &index).unwrap();
    assert_eq!(resolved, "face-wash");
}

#[test]
fn shared_with_owner_still_collides() {
    let index = SlugIndex::from_assignments([("p1", "face-wash"), ("p2", "face-wash")]);
    let resolved = ensure_unique(&slug("face-wash"), "p1", &index).unwrap();
    assert_eq!(resolved, "face-wash-1");
}

#[test]
fn converges_on_first_free_suffix() {
    for k in [1u32, 2, 7, 998] {
        let lookup = lookup_fn(move |s: &str| -> Result<BTreeSet<String>, StoreDown> {
            let taken = s == "toner"
                || s.strip_prefix("toner-")
                    .and_then(|n| n.parse::<u32>().ok())
                    .is_some_and(|n| n < k);
            Ok(if taken { owners(&["other"]) } else { BTreeSet::new() })
        });
        let resolved = ensure_unique(&slug("toner"), "me", &lookup).unwrap();
        assert_eq!(resolved.as_str(), format!("toner-{k}"));
    }
}

#[test]
fn suffix_owned_by_self_is_accepted() {
    let index = SlugIndex::from_assignments([("p1", "serum"), ("p2", "serum-1")]);
    let resolved = ensure_unique(&slug("serum"), "p2", &index).unwrap();
    assert_eq!(resolved, "serum-1");
}

#[test]
fn exhausted_cap_falls_back_to_owner_id() {
    let calls = Cell::new(0u32);
    let lookup = lookup_fn(|_: &str| -> Result<BTreeSet<String>, StoreDown> {
        calls.set(calls.get() + 1);
        Ok(owners(&["someone-else"]))
    });
    let owner = "3f2a9c1e-77aa-4b3c-9d1e-0123456789ab";
    let resolved = ensure_unique(&slug("lip-balm"), owner, &lookup).unwrap();
    assert_eq!(resolved, "lip-balm-3f2a9c1e");
    // the bare candidate plus every suffix
    assert_eq!(calls.get(), MAX_SUFFIX_ATTEMPTS + 1);
}

#[test]
fn fallback_uses_short_ids_whole() {
    let lookup = lookup_fn(|_: &str| -> Result<BTreeSet<String>, StoreDown> {
        Ok(owners(&["x"]))
    });
    assert_eq!(ensure_unique(&slug("a"), "42", &lookup).unwrap(), "a-42");
}

#[test]
fn fallback_cleans_odd_ids() {
    let lookup = lookup_fn(|_: &str| -> Result<BTreeSet<String>, StoreDown> {
        Ok(owners(&["x"]))
    });
    assert_eq!(
        ensure_unique(&slug("a"), "AB_CD/EF-GH", &lookup).unwrap(),
        "a-ab-cd-ef"
    );
}

#[test]
fn fallback_looks_past_an_unusable_prefix() {
    let lookup = lookup_fn(|_: &str| -> Result<BTreeSet<String>, StoreDown> {
        Ok(owners(&["x"]))
    });
    assert_eq!(
        ensure_unique(&slug("lip-balm"), "!!!!!!!!ab12", &lookup).unwrap(),
        "lip-balm-ab12"
    );
}

#[test]
fn fallback_never_returns_the_taken_candidate() {
    let lookup = lookup_fn(|_: &str| -> Result<BTreeSet<String>, StoreDown> {
        Ok(owners(&["x"]))
    });
    let resolved = ensure_unique(&slug("lip-balm"), "!!!!!!!!", &lookup).unwrap();
    assert_ne!(resolved, "lip-balm");
    assert_eq!(resolved, format!("lip-balm-{}", MAX_SUFFIX_ATTEMPTS + 1).as_str());
}

#[test]
fn lookup_failure_propagates() {
    let lookup = lookup_fn(|_: &str| -> Result<BTreeSet<String>, StoreDown> { Err(StoreDown) });
    let err = ensure_unique(&slug("mask"), "p1", &lookup).unwrap_err();
    let ResolveError::Lookup { slug, .. } = &err;
    assert_eq!(slug, "mask");
    assert_eq!(
        err.to_string(),
        "Slug lookup failed for 'mask': store unreachable"
    );
}

#[test]
fn lookup_failure_mid_probe_propagates() {
    let lookup = lookup_fn(|s: &str| -> Result<BTreeSet<String>, StoreDown> {
        match s {
            "mask" => Ok(owners(&["p9"])),
            "mask-1" => Err(StoreDown),
            _ => Ok(BTreeSet::new()),
        }
    });
    let err = ensure_unique(&slug("mask"), "p1", &lookup).unwrap_err();
    let ResolveError::Lookup { slug, .. } = err;
    assert_eq!(slug, "mask-1");
}

#[test]
fn index_assign_moves_owner() {
    let mut index = SlugIndex::new();
    index.assign("p1", "old-slug");
    index.assign("p1", "new-slug");

    assert_eq!(index.slug_of("p1"), Some("new-slug"));
    assert!(index.owners_of("old-slug").unwrap().is_empty());
    assert_eq!(index.owners_of("new-slug").unwrap(), owners(&["p1"]));
    assert_eq!(index.len(), 1);
}

#[test]
fn index_reports_duplicates() {
    let index = SlugIndex::from_assignments([
        ("p1", "cream"),
        ("p2", "cream"),
        ("p3", "gel"),
        ("p4", "Bad/Slug"),
        ("p5", "Bad/Slug"),
    ]);
    assert_eq!(
        index.duplicates(),
        vec![("Bad/Slug", vec!["p4", "p5"]), ("cream", vec!["p1", "p2"])]
    );
}

#[test]
fn sequential_resolution_through_index() {
    let mut index = SlugIndex::new();
    let mut assigned = Vec::new();
    for id in ["a", "b", "c"] {
        let resolved = ensure_unique(&normalize("Rose Water"), id, &index).unwrap();
        index.assign(id, resolved.as_str());
        assigned.push(resolved.into_string());
    }
    assert_eq!(assigned, vec!["rose-water", "rose-water-1", "rose-water-2"]);
}
