//! Common helpers for end-to-end tests.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::bplus::{BPlusTree, Key, TreeShape, Value};

/// A recognisable JSON-ish value for `key`.
#[must_use]
pub fn make_val(key: Key) -> Value {
    format!(r#"{{"id":{key:06},"key":"key-{key:06}","value":"val-{key:06}"}}"#).into_bytes()
}

/// Build a tree by putting every key in order, each with [`make_val`].
#[must_use]
pub fn build_tree<const ORDER: usize>(keys: impl IntoIterator<Item = Key>) -> BPlusTree<ORDER> {
    let mut tree = BPlusTree::<ORDER>::default();
    for key in keys {
        assert!(!tree.put(key, make_val(key)), "key {key} inserted twice");
    }
    tree
}

/// Verify the tree and return its shape, failing the test on any violation.
#[allow(clippy::expect_used)]
pub fn assert_valid<const ORDER: usize>(tree: &BPlusTree<ORDER>) -> TreeShape {
    tree.verify().expect("tree invariants should hold")
}

/// All keys of the tree, read along the leaf chain.
#[must_use]
pub fn keys_of<const ORDER: usize>(tree: &BPlusTree<ORDER>) -> Vec<Key> {
    tree.keys().collect()
}

/// `keys` in a deterministic pseudo-random order.
#[must_use]
pub fn shuffled(keys: impl IntoIterator<Item = Key>, seed: u64) -> Vec<Key> {
    let mut keys: Vec<Key> = keys.into_iter().collect();
    keys.shuffle(&mut StdRng::seed_from_u64(seed));
    keys
}
