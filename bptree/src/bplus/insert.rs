//! Insertion.
//!
//! A record goes into the leaf its key maps to. A leaf that overflows splits
//! at `cut(ORDER - 1)` and copies the right half's first key into the parent.
//! An internal node that overflows splits at `cut(ORDER)` and pushes its middle
//! key up. A root split grows the tree by one level.

use tracing::trace;

use crate::bplus::arena::NodeId;
use crate::bplus::node::{InternalNode, Key, LeafNode, Node, Record, Value, cut};
use crate::bplus::search::Path;
use crate::bplus::tree::BPlusTree;
use crate::bplus::verify::{InvariantViolation, corrupted};

impl<const ORDER: usize> BPlusTree<ORDER> {
    /// Insert `value` under `key` unless the key is already present.
    ///
    /// An existing value is left untouched.
    pub fn add(&mut self, key: Key, value: Value) {
        match self.find_with_path(key) {
            None => self.start_new_tree(Record::new(key, value)),
            Some(location) => match location.slot {
                Ok(_) => {}
                Err(slot) => {
                    self.insert_into_leaf(location.path, location.leaf, slot, Record::new(key, value));
                }
            },
        }
    }

    /// Insert `value` under `key`, replacing any existing value.
    ///
    /// Returns `true` if the key was already present.
    pub fn put(&mut self, key: Key, value: Value) -> bool {
        let Some(location) = self.find_with_path(key) else {
            self.start_new_tree(Record::new(key, value));
            return false;
        };
        match location.slot {
            Ok(slot) => {
                self.arena.leaf_mut(location.leaf).records[slot].value = value;
                true
            }
            Err(slot) => {
                self.insert_into_leaf(location.path, location.leaf, slot, Record::new(key, value));
                false
            }
        }
    }

    fn start_new_tree(&mut self, record: Record) {
        let root = self.arena.alloc(Node::Leaf(LeafNode::with_record(record)));
        self.root = Some(root);
    }

    fn insert_into_leaf(&mut self, path: Path, leaf_id: NodeId, slot: usize, record: Record) {
        let leaf = self.arena.leaf_mut(leaf_id);
        leaf.records.insert(slot, record);
        if leaf.len() < ORDER {
            return;
        }

        let right = leaf.split(cut(ORDER - 1));
        let Some(separator) = right.first_key() else {
            corrupted(&InvariantViolation::SplitPoint {
                split: cut(ORDER - 1),
            });
        };
        let right_id = self.arena.alloc(Node::Leaf(right));
        self.arena.leaf_mut(leaf_id).next_leaf = Some(right_id);

        trace!(left = %leaf_id, right = %right_id, separator, "split leaf");
        self.insert_into_parent(path, leaf_id, separator, right_id);
    }

    /// Link a freshly split `right` into the parent of `left`.
    fn insert_into_parent(&mut self, mut path: Path, left: NodeId, key: Key, right: NodeId) {
        let Some((parent_id, left_index)) = path.pop() else {
            self.insert_into_new_root(left, key, right);
            return;
        };

        let parent = self.arena.internal_mut(parent_id);
        if parent.children.get(left_index) != Some(&left) {
            corrupted(&InvariantViolation::MissingChild {
                parent: parent_id,
                child: left,
            });
        }
        parent.insert_after(left_index, key, right);
        if parent.keys.len() < ORDER {
            return;
        }

        let (k_prime, new_node) = parent.split(cut(ORDER));
        let new_id = self.arena.alloc(Node::Internal(new_node));

        trace!(left = %parent_id, right = %new_id, k_prime, "split internal node");
        self.insert_into_parent(path, parent_id, k_prime, new_id);
    }

    fn insert_into_new_root(&mut self, left: NodeId, key: Key, right: NodeId) {
        let root = self
            .arena
            .alloc(Node::Internal(InternalNode::with_children(left, key, right)));
        trace!(root = %root, key, "tree grew a level");
        self.root = Some(root);
    }
}
