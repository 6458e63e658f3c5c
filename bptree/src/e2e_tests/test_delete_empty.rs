//! Test operations on an empty tree.

use crate::bplus::BPlusTree;

#[test]
fn test_del_from_new_tree() {
    let mut tree = BPlusTree::new();

    assert!(tree.del(4).is_none());
    assert!(tree.del(u32::MAX).is_none());
    assert!(tree.is_empty());
}

#[test]
fn test_reads_on_new_tree() {
    let tree = BPlusTree::new();

    assert_eq!(tree.len(), 0);
    assert_eq!(tree.size(), 0);
    assert!(tree.min().is_none());
    assert!(tree.max().is_none());
    assert!(tree.get_closest(10).is_none());

    let mut visited = 0;
    tree.range(|_, _| {
        visited += 1;
        true
    });
    assert_eq!(visited, 0);
}

#[test]
fn test_close_then_reuse() {
    let mut tree = BPlusTree::new();
    for key in 0..50 {
        tree.put(key, vec![1]);
    }

    tree.close();
    assert!(tree.del(10).is_none());

    tree.put(3, vec![2]);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.get(3), Some(&vec![2]));
}
