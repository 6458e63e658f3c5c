//! Test that writes to an existing key replace or keep its value.

use crate::bplus::BPlusTree;
use crate::e2e_tests::helpers::*;

#[test]
fn test_put_same_key_twice() {
    let mut tree = BPlusTree::new();

    assert!(!tree.put(7, b"first".to_vec()));
    assert!(tree.put(7, b"second".to_vec()));

    assert_eq!(tree.len(), 1);
    assert_eq!(tree.get(7), Some(&b"second".to_vec()));
}

#[test]
fn test_add_ignores_existing_key() {
    let mut tree = build_tree::<5>(0..100);

    tree.add(50, b"replacement".to_vec());
    tree.add(100, b"new".to_vec());

    assert_eq!(tree.len(), 101);
    assert_eq!(tree.get(50), Some(&make_val(50)));
    assert_eq!(tree.get(100), Some(&b"new".to_vec()));
}

#[test]
fn test_overwrite_keeps_structure() {
    let mut tree = build_tree::<5>(0..200);
    let before = assert_valid(&tree);

    for key in 0..200 {
        assert!(tree.put(key, vec![0; 8]));
    }

    assert_eq!(assert_valid(&tree), before);
    assert_eq!(tree.size(), 200 * 12);
}
