//! Descent and lookups.

use crate::bplus::arena::NodeId;
use crate::bplus::node::{Key, Node, Value};
use crate::bplus::tree::BPlusTree;

/// Ancestors passed through on a descent, root first, each with the index of
/// the child that was followed.
pub type Path = Vec<(NodeId, usize)>;

/// Where a key lives, or would live, in the tree.
#[derive(Debug)]
pub struct Location {
    pub leaf: NodeId,
    pub path: Path,
    /// `Ok(i)` if `records[i]` holds the key, `Err(i)` for its insertion slot.
    pub slot: Result<usize, usize>,
}

impl<const ORDER: usize> BPlusTree<ORDER> {
    /// Descend to the leaf that holds, or would hold, `key`.
    pub(crate) fn find_leaf(&self, key: Key) -> Option<NodeId> {
        let mut current = self.root?;
        loop {
            match self.arena.get(current) {
                Node::Internal(node) => current = node.children[node.find_child_index(key)],
                Node::Leaf(_) => return Some(current),
            }
        }
    }

    /// Descend to the leaf for `key`, recording the path taken.
    pub(crate) fn find_with_path(&self, key: Key) -> Option<Location> {
        let mut current = self.root?;
        let mut path = Path::new();
        loop {
            match self.arena.get(current) {
                Node::Internal(node) => {
                    let index = node.find_child_index(key);
                    path.push((current, index));
                    current = node.children[index];
                }
                Node::Leaf(leaf) => {
                    return Some(Location {
                        leaf: current,
                        slot: leaf.find_index(key),
                        path,
                    });
                }
            }
        }
    }

    /// The leftmost leaf.
    pub(crate) fn first_leaf(&self) -> Option<NodeId> {
        self.root.map(|root| self.descend_edge(root, false))
    }

    /// The rightmost leaf.
    pub(crate) fn last_leaf(&self) -> Option<NodeId> {
        self.root.map(|root| self.descend_edge(root, true))
    }

    fn descend_edge(&self, from: NodeId, rightmost: bool) -> NodeId {
        let mut current = from;
        while let Node::Internal(node) = self.arena.get(current) {
            current = if rightmost {
                node.children[node.children.len() - 1]
            } else {
                node.children[0]
            };
        }
        current
    }

    /// The leaf immediately left of the one `path` leads to.
    ///
    /// Climbs to the nearest ancestor that was entered through a child other
    /// than its first, then takes the rightmost leaf of the sibling subtree.
    fn previous_leaf(&self, path: &Path) -> Option<NodeId> {
        let &(ancestor, index) = path.iter().rev().find(|&&(_, index)| index > 0)?;
        let sibling = self.arena.internal(ancestor).children[index - 1];
        Some(self.descend_edge(sibling, true))
    }

    /// Check whether `key` is present.
    #[must_use]
    pub fn has(&self, key: Key) -> bool {
        self.find_leaf(key)
            .is_some_and(|leaf| self.arena.leaf(leaf).has_key(key))
    }

    /// Look up the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: Key) -> Option<&Value> {
        let leaf = self.find_leaf(key)?;
        self.arena.leaf(leaf).record(key).map(|r| &r.value)
    }

    /// The record with the largest key <= `key` within the leaf `key` maps to.
    ///
    /// Only that leaf is consulted: if every key in it is greater than `key`,
    /// its first record is returned. Use [`Self::get_near_min`] for a floor
    /// over the whole tree.
    #[must_use]
    pub fn get_closest(&self, key: Key) -> Option<(Key, &Value)> {
        let leaf = self.find_leaf(key)?;
        self.arena
            .leaf(leaf)
            .closest(key)
            .map(|r| (r.key, &r.value))
    }

    /// The record with the largest key <= `key` anywhere in the tree.
    #[must_use]
    pub fn get_near_min(&self, key: Key) -> Option<(Key, &Value)> {
        let location = self.find_with_path(key)?;
        let leaf = self.arena.leaf(location.leaf);
        let upper = match location.slot {
            Ok(i) => i + 1,
            Err(i) => i,
        };
        if upper > 0 {
            let record = &leaf.records[upper - 1];
            return Some((record.key, &record.value));
        }

        let previous = self.previous_leaf(&location.path)?;
        self.arena
            .leaf(previous)
            .records
            .last()
            .map(|r| (r.key, &r.value))
    }

    /// The record with the smallest key >= `key` anywhere in the tree.
    #[must_use]
    pub fn get_near_max(&self, key: Key) -> Option<(Key, &Value)> {
        let location = self.find_with_path(key)?;
        let leaf = self.arena.leaf(location.leaf);
        let lower = location.slot.unwrap_or_else(|i| i);
        if let Some(record) = leaf.records.get(lower) {
            return Some((record.key, &record.value));
        }

        let next = leaf.next_leaf?;
        self.arena
            .leaf(next)
            .records
            .first()
            .map(|r| (r.key, &r.value))
    }
}
