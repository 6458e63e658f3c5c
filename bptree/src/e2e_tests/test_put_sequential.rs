//! Test sequential inserts and point lookups.

use crate::e2e_tests::helpers::*;

#[test]
fn test_put_thousand_keys() {
    let tree = build_tree::<5>(0..1000);

    assert_eq!(tree.len(), 1000);
    assert_eq!(tree.min(), Some((0, &make_val(0))));
    assert_eq!(tree.max(), Some((999, &make_val(999))));

    let shape = assert_valid(&tree);
    assert_eq!(shape.records, 1000);
}

#[test]
fn test_get_returns_inserted_value() {
    let tree = build_tree::<5>(0..1000);

    assert_eq!(tree.get(500), Some(&make_val(500)));
    assert_eq!(
        tree.get(500).map(Vec::as_slice),
        Some(br#"{"id":000500,"key":"key-000500","value":"val-000500"}"#.as_slice())
    );
    assert!(tree.get(1000).is_none());
}

#[test]
fn test_has_every_key() {
    let tree = build_tree::<5>(0..1000);

    assert!((0..1000).all(|key| tree.has(key)));
    assert!(!tree.has(1000));
    assert!(!tree.has(u32::MAX));
}

#[test]
fn test_range_visits_all_in_order() {
    let tree = build_tree::<5>(shuffled(0..1000, 11));

    let mut visited = Vec::new();
    tree.range(|key, value| {
        assert_eq!(value, &make_val(key));
        visited.push(key);
        true
    });

    assert_eq!(visited.len(), tree.len());
    assert_eq!(visited, (0..1000).collect::<Vec<_>>());
}

#[test]
fn test_size_sums_records() {
    let tree = build_tree::<5>(0..1000);
    let expected: u64 = (0..1000).map(|key| 4 + make_val(key).len() as u64).sum();

    assert_eq!(tree.size(), expected);
}
