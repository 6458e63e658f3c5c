//! Test that a tree emptied by deletes behaves like a fresh one.

use crate::bplus::BPlusTree;
use crate::e2e_tests::helpers::*;

#[test]
fn test_round_trip_matches_fresh_tree() {
    let mut tree = build_tree::<5>(shuffled(0..500, 3));
    for key in shuffled(0..500, 4) {
        assert!(tree.del(key).is_some());
    }
    assert_eq!(tree, BPlusTree::new());

    let disjoint: Vec<u32> = shuffled(10_000..10_300, 5);
    for &key in &disjoint {
        tree.put(key, make_val(key));
    }
    let fresh = build_tree::<5>(disjoint.iter().copied());

    assert_eq!(tree, fresh);
    assert_eq!(tree.render_levels(), fresh.render_levels());
    assert_eq!(keys_of(&tree), keys_of(&fresh));
    assert_valid(&tree);
}

#[test]
fn test_interleaved_puts_and_deletes() {
    let mut tree = BPlusTree::new();

    for round in 0..10u32 {
        for key in shuffled(0..300, u64::from(round)) {
            tree.put(key, make_val(key));
        }
        for key in shuffled((0..300).filter(|k| k % 2 == round % 2), u64::from(round) + 100) {
            assert!(tree.del(key).is_some());
        }
        assert_eq!(tree.len(), 150);
        assert_valid(&tree);
    }
}
