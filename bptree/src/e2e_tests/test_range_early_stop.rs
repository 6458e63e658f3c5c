//! Test that `range` stops as soon as the visitor returns false.

use crate::e2e_tests::helpers::*;

#[test]
fn test_range_stops_across_leaves() {
    let tree = build_tree::<5>(0..100);

    let mut visited = Vec::new();
    tree.range(|key, _| {
        visited.push(key);
        key != 41
    });

    assert_eq!(visited, (0..=41).collect::<Vec<_>>());
}

#[test]
fn test_range_stops_on_first() {
    let tree = build_tree::<5>(0..100);

    let mut calls = 0;
    tree.range(|_, _| {
        calls += 1;
        false
    });

    assert_eq!(calls, 1);
}

#[test]
fn test_iter_from_then_take() {
    let tree = build_tree::<5>((0..100).map(|k| k * 2));

    let window: Vec<u32> = tree.iter_from(51).take(5).map(|(k, _)| k).collect();
    assert_eq!(window, vec![52, 54, 56, 58, 60]);
}
