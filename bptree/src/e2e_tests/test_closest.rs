//! Test nearest-match lookups on either side of leaf boundaries.

use crate::bplus::{BPlusTree, Key};
use crate::e2e_tests::helpers::*;

fn key_of<V>(entry: Option<(Key, V)>) -> Option<Key> {
    entry.map(|(key, _)| key)
}

#[test]
fn test_closest_within_leaf() {
    let tree: BPlusTree = build_tree((0..100).map(|k| k * 10));

    for probe in 0..990 {
        let expected = probe - probe % 10;
        let found = key_of(tree.get_closest(probe)).expect("non-empty tree");
        assert!(found == expected || found == expected + 10, "probe {probe} found {found}");
    }
}

#[test]
fn test_closest_exact_hits() {
    let tree: BPlusTree = build_tree((0..100).map(|k| k * 10));

    for key in (0..100).map(|k| k * 10) {
        assert_eq!(tree.get_closest(key), Some((key, &make_val(key))));
    }
}

#[test]
fn test_near_min_and_max_are_global() {
    let mut tree: BPlusTree = build_tree((0..100).map(|k| k * 10));
    for key in (0..100).filter(|k| k % 4 != 0).map(|k| k * 10) {
        tree.del(key);
    }
    assert_valid(&tree);

    for probe in 0..=1000u32 {
        let floor = (probe / 40) * 40;
        let ceiling = probe.div_ceil(40) * 40;
        assert_eq!(key_of(tree.get_near_min(probe)), Some(floor.min(960)), "floor of {probe}");
        assert_eq!(
            key_of(tree.get_near_max(probe)),
            (ceiling <= 960).then_some(ceiling),
            "ceiling of {probe}"
        );
    }
}

#[test]
fn test_near_lookups_beyond_edges() {
    let tree: BPlusTree = build_tree(100..200);

    assert!(tree.get_near_min(99).is_none());
    assert_eq!(key_of(tree.get_near_max(0)), Some(100));
    assert_eq!(key_of(tree.get_near_min(u32::MAX)), Some(199));
    assert!(tree.get_near_max(200).is_none());
    // Leaf-local lookup falls back to the first record of the first leaf.
    assert_eq!(key_of(tree.get_closest(0)), Some(100));
}
