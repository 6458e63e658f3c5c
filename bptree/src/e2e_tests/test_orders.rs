//! Test the tree at several orders.

use crate::bplus::BPlusTree;
use crate::e2e_tests::helpers::*;

fn exercise<const ORDER: usize>() {
    let keys = shuffled(0..600, ORDER as u64);
    let mut tree: BPlusTree<ORDER> = build_tree(keys.iter().copied());
    assert_eq!(tree.order(), ORDER);

    let shape = assert_valid(&tree);
    assert_eq!(shape.records, 600);
    assert_eq!(keys_of(&tree), (0..600).collect::<Vec<_>>());

    for (i, &key) in keys.iter().enumerate() {
        assert_eq!(tree.del(key), Some(make_val(key)));
        if i % 25 == 0 {
            assert_valid(&tree);
        }
    }
    assert!(tree.is_empty());
    assert_eq!(tree, BPlusTree::<ORDER>::default());
}

#[test]
fn test_order_3() {
    exercise::<3>();
}

#[test]
fn test_order_4() {
    exercise::<4>();
}

#[test]
fn test_order_5() {
    exercise::<5>();
}

#[test]
fn test_order_8() {
    exercise::<8>();
}

#[test]
fn test_order_16() {
    exercise::<16>();
}

#[test]
fn test_height_shrinks_with_order() {
    let narrow: BPlusTree<3> = build_tree(0..500);
    let wide: BPlusTree<16> = build_tree(0..500);

    assert!(narrow.height() > wide.height());
    assert_eq!(assert_valid(&narrow).levels, narrow.height() + 1);
    assert_eq!(assert_valid(&wide).levels, wide.height() + 1);
}
