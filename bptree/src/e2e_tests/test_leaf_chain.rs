//! Test the leaf chain after sequential inserts.

use crate::e2e_tests::helpers::*;

#[test]
fn test_leaf_chain_is_sequential() {
    let tree = build_tree::<5>(0..32);

    assert_eq!(keys_of(&tree), (0..32).collect::<Vec<_>>());
    let shape = assert_valid(&tree);
    assert_eq!(shape.records, 32);
}

#[test]
fn test_leaf_chain_rendering() {
    let tree = build_tree::<5>(0..32);
    let leaves = tree.render_leaves();

    let flattened: Vec<u32> = leaves
        .split(" || ")
        .flat_map(str::split_whitespace)
        .map(|k| k.parse().expect("numeric key"))
        .collect();
    assert_eq!(flattened, (0..32).collect::<Vec<_>>());

    // Sequential inserts leave every leaf but the last at minimum occupancy.
    let sizes: Vec<usize> = leaves.split(" || ").map(|leaf| leaf.split_whitespace().count()).collect();
    assert!(sizes[..sizes.len() - 1].iter().all(|&n| n == 2));
}

#[test]
fn test_leaf_chain_after_deletes() {
    let mut tree = build_tree::<5>(0..32);
    for key in (0..32).filter(|k| k % 3 == 0) {
        tree.del(key);
    }

    let expected: Vec<u32> = (0..32).filter(|k| k % 3 != 0).collect();
    assert_eq!(keys_of(&tree), expected);
    assert_valid(&tree);
}
