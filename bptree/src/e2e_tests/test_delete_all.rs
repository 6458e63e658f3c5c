//! Test that deleting every key, in any order, leaves a fresh empty tree.

use crate::bplus::{BPlusTree, Key};
use crate::e2e_tests::helpers::*;

fn delete_all(order: &[Key]) {
    let mut tree = build_tree::<5>(0..1000);

    for (deleted, &key) in order.iter().enumerate() {
        assert_eq!(tree.del(key), Some(make_val(key)), "deleting {key}");
        assert_eq!(tree.len(), 999 - deleted);
        if deleted % 50 == 0 {
            assert_valid(&tree);
        }
    }

    assert_eq!(tree.len(), 0);
    assert!(!tree.has(500));
    assert!(tree.min().is_none());
    assert_eq!(tree, BPlusTree::new());
}

#[test]
fn test_delete_all_ascending() {
    delete_all(&(0..1000).collect::<Vec<_>>());
}

#[test]
fn test_delete_all_descending() {
    delete_all(&(0..1000).rev().collect::<Vec<_>>());
}

#[test]
fn test_delete_all_shuffled() {
    delete_all(&shuffled(0..1000, 7));
}

#[test]
fn test_min_max_track_deletes() {
    let mut tree = build_tree::<5>(0..100);

    for low in 0..50 {
        tree.del(low);
        tree.del(99 - low);
        if low < 49 {
            assert_eq!(tree.min().map(|(k, _)| k), Some(low + 1));
            assert_eq!(tree.max().map(|(k, _)| k), Some(98 - low));
        }
    }
    assert!(tree.is_empty());
}
