//! Ordered traversal along the leaf chain.

use std::iter::FusedIterator;

use crate::bplus::arena::{NodeArena, NodeId};
use crate::bplus::node::{Key, LeafNode, Record, Value};
use crate::bplus::tree::BPlusTree;

/// Iterator over records in ascending key order.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    arena: &'a NodeArena,
    leaf: Option<&'a LeafNode>,
    index: usize,
}

impl<'a> Iter<'a> {
    fn new(arena: &'a NodeArena, leaf: Option<NodeId>, index: usize) -> Self {
        Self {
            arena,
            leaf: leaf.map(|id| arena.leaf(id)),
            index,
        }
    }

    fn next_record(&mut self) -> Option<&'a Record> {
        loop {
            let leaf = self.leaf?;
            if let Some(record) = leaf.records.get(self.index) {
                self.index += 1;
                return Some(record);
            }

            // Move to next leaf
            self.leaf = leaf.next_leaf.map(|id| self.arena.leaf(id));
            self.index = 0;
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Key, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().map(|r| (r.key, &r.value))
    }
}

impl FusedIterator for Iter<'_> {}

/// Iterator over the leaves in chain order.
pub struct Leaves<'a> {
    arena: &'a NodeArena,
    next: Option<NodeId>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = (NodeId, &'a LeafNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let leaf = self.arena.leaf(id);
        self.next = leaf.next_leaf;
        Some((id, leaf))
    }
}

impl<const ORDER: usize> BPlusTree<ORDER> {
    /// Iterate over all records in ascending key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.arena, self.first_leaf(), 0)
    }

    /// Iterate over records with keys >= `start`, in ascending order.
    #[must_use]
    pub fn iter_from(&self, start: Key) -> Iter<'_> {
        let Some(leaf) = self.find_leaf(start) else {
            return Iter::new(&self.arena, None, 0);
        };
        let index = self.arena.leaf(leaf).find_index(start).unwrap_or_else(|i| i);
        Iter::new(&self.arena, Some(leaf), index)
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub(crate) fn leaves(&self) -> Leaves<'_> {
        Leaves {
            arena: &self.arena,
            next: self.first_leaf(),
        }
    }

    /// Visit records in ascending key order until `visit` returns `false`.
    pub fn range<F>(&self, mut visit: F)
    where
        F: FnMut(Key, &Value) -> bool,
    {
        for (key, value) in self {
            if !visit(key, value) {
                break;
            }
        }
    }

    /// The record with the smallest key.
    #[must_use]
    pub fn min(&self) -> Option<(Key, &Value)> {
        let leaf = self.arena.leaf(self.first_leaf()?);
        leaf.records.first().map(|r| (r.key, &r.value))
    }

    /// The record with the largest key.
    #[must_use]
    pub fn max(&self) -> Option<(Key, &Value)> {
        let leaf = self.arena.leaf(self.last_leaf()?);
        leaf.records.last().map(|r| (r.key, &r.value))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.leaves().map(|(_, leaf)| leaf.len()).sum()
    }

    /// Total bytes of all records: key width plus value length, summed.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.leaves()
            .flat_map(|(_, leaf)| leaf.records.iter())
            .map(Record::size)
            .sum()
    }
}

impl<'a, const ORDER: usize> IntoIterator for &'a BPlusTree<ORDER> {
    type Item = (Key, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<const ORDER: usize> FromIterator<(Key, Value)> for BPlusTree<ORDER> {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        let mut tree = Self::empty();
        tree.extend(iter);
        tree
    }
}

impl<const ORDER: usize> Extend<(Key, Value)> for BPlusTree<ORDER> {
    fn extend<I: IntoIterator<Item = (Key, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}
