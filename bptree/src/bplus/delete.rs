//! Deletion.
//!
//! Removing a record can leave its leaf below minimum occupancy. The leaf then
//! either merges with a sibling, when both fit in one node, or borrows a single
//! entry from it. Merging removes a separator from the parent, which may in
//! turn fall below minimum, so rebalancing walks up the recorded path. The
//! tree shrinks by one level when the root is left with a single child.

use tracing::trace;

use crate::bplus::arena::NodeId;
use crate::bplus::node::{Key, Node, Record, Value};
use crate::bplus::search::Path;
use crate::bplus::tree::BPlusTree;
use crate::bplus::verify::{InvariantViolation, corrupted};

/// Which sibling an under-full node is paired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Neighbor {
    /// The sibling to the left. Preferred whenever one exists.
    Left,
    /// The sibling to the right, used only by a parent's first child.
    Right,
}

impl<const ORDER: usize> BPlusTree<ORDER> {
    /// Remove `key`, returning its value if it was present.
    pub fn del(&mut self, key: Key) -> Option<Value> {
        let location = self.find_with_path(key)?;
        let slot = location.slot.ok()?;

        let record = self.arena.leaf_mut(location.leaf).records.remove(slot);
        self.rebalance(location.path, location.leaf);
        Some(record.value)
    }

    /// Restore occupancy of `node` after it lost an entry.
    fn rebalance(&mut self, mut path: Path, node_id: NodeId) {
        let Some((parent_id, index)) = path.pop() else {
            self.adjust_root(node_id);
            return;
        };

        let node = self.arena.get(node_id);
        let count = node.key_count();
        let (minimum, capacity) = if node.is_leaf() {
            (Self::MIN_LEAF_KEYS, ORDER)
        } else {
            (Self::MIN_INTERNAL_KEYS, ORDER - 1)
        };
        if count >= minimum {
            return;
        }

        let parent = self.arena.internal(parent_id);
        if parent.children.get(index) != Some(&node_id) {
            corrupted(&InvariantViolation::MissingChild {
                parent: parent_id,
                child: node_id,
            });
        }
        let (side, separator) = if index == 0 {
            (Neighbor::Right, 0)
        } else {
            (Neighbor::Left, index - 1)
        };
        let neighbor_id = match side {
            Neighbor::Left => parent.children[index - 1],
            Neighbor::Right => parent.children[1],
        };
        let k_prime = parent.keys[separator];

        let neighbor_count = self.arena.get(neighbor_id).key_count();
        if neighbor_count + count < capacity {
            let (left, right) = match side {
                Neighbor::Left => (neighbor_id, node_id),
                Neighbor::Right => (node_id, neighbor_id),
            };
            self.coalesce(parent_id, separator, k_prime, left, right);
            self.rebalance(path, parent_id);
        } else {
            self.redistribute(parent_id, separator, k_prime, node_id, neighbor_id, side);
        }
    }

    /// Merge `right` into `left` and drop their separator from the parent.
    fn coalesce(&mut self, parent_id: NodeId, separator: usize, k_prime: Key, left: NodeId, right: NodeId) {
        trace!(%left, %right, k_prime, "coalesce");

        match self.arena.release(right) {
            Node::Leaf(right_leaf) => {
                let left_leaf = self.arena.leaf_mut(left);
                left_leaf.records.extend(right_leaf.records);
                left_leaf.next_leaf = right_leaf.next_leaf;
            }
            Node::Internal(right_node) => {
                let left_node = self.arena.internal_mut(left);
                left_node.keys.push(k_prime);
                left_node.keys.extend(right_node.keys);
                left_node.children.extend(right_node.children);
            }
        }

        let parent = self.arena.internal_mut(parent_id);
        parent.keys.remove(separator);
        parent.children.remove(separator + 1);
    }

    /// Move one entry from `neighbor` into `node` and fix the separator.
    fn redistribute(
        &mut self,
        parent_id: NodeId,
        separator: usize,
        k_prime: Key,
        node_id: NodeId,
        neighbor_id: NodeId,
        side: Neighbor,
    ) {
        trace!(node = %node_id, neighbor = %neighbor_id, ?side, "redistribute");

        let new_separator = match (self.arena.get(node_id).is_leaf(), side) {
            (true, Neighbor::Left) => {
                let moved = self.pop_last_record(neighbor_id);
                let key = moved.key;
                self.arena.leaf_mut(node_id).records.insert(0, moved);
                key
            }
            (true, Neighbor::Right) => {
                let neighbor = self.arena.leaf_mut(neighbor_id);
                let moved = neighbor.records.remove(0);
                let Some(key) = neighbor.first_key() else {
                    corrupted(&InvariantViolation::Underfull {
                        node: neighbor_id,
                        keys: 0,
                        minimum: Self::MIN_LEAF_KEYS,
                    });
                };
                self.arena.leaf_mut(node_id).records.push(moved);
                key
            }
            (false, Neighbor::Left) => {
                let neighbor = self.arena.internal_mut(neighbor_id);
                let (Some(key), Some(child)) = (neighbor.keys.pop(), neighbor.children.pop()) else {
                    corrupted(&InvariantViolation::Underfull {
                        node: neighbor_id,
                        keys: 0,
                        minimum: Self::MIN_INTERNAL_KEYS,
                    });
                };
                let node = self.arena.internal_mut(node_id);
                node.keys.insert(0, k_prime);
                node.children.insert(0, child);
                key
            }
            (false, Neighbor::Right) => {
                let neighbor = self.arena.internal_mut(neighbor_id);
                let key = neighbor.keys.remove(0);
                let child = neighbor.children.remove(0);
                let node = self.arena.internal_mut(node_id);
                node.keys.push(k_prime);
                node.children.push(child);
                key
            }
        };

        self.arena.internal_mut(parent_id).keys[separator] = new_separator;
    }

    fn pop_last_record(&mut self, leaf_id: NodeId) -> Record {
        let Some(record) = self.arena.leaf_mut(leaf_id).records.pop() else {
            corrupted(&InvariantViolation::Underfull {
                node: leaf_id,
                keys: 0,
                minimum: Self::MIN_LEAF_KEYS,
            });
        };
        record
    }

    /// Shrink the tree when the root has run out of keys.
    fn adjust_root(&mut self, root_id: NodeId) {
        match self.arena.get(root_id) {
            Node::Internal(root) if root.keys.is_empty() => {
                let child = root.children[0];
                self.arena.release(root_id);
                self.root = Some(child);
                trace!(root = %child, "tree lost a level");
            }
            Node::Leaf(root) if root.is_empty() => {
                self.close();
            }
            _ => {}
        }
    }
}
