//! B+Tree node types.
//!
//! The tree stores two node variants in its arena:
//! - Internal nodes: separator keys and child node ids
//! - Leaf nodes: records in key order, singly linked for range scans

use std::mem::size_of;

use crate::bplus::arena::NodeId;
use crate::bplus::verify::{InvariantViolation, corrupted};

/// A fixed-width key.
pub type Key = u32;

/// An opaque value stored against a key.
pub type Value = Vec<u8>;

/// Maximum number of children of an internal node when no order is given.
pub const DEFAULT_ORDER: usize = 5;

/// Split point for a node holding `length` entries: half, rounded up.
///
/// Used both to split over-full nodes and to derive minimum occupancy.
#[must_use]
pub const fn cut(length: usize) -> usize {
    length.div_ceil(2)
}

/// Node kind discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Internal,
    Leaf,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal => write!(f, "internal"),
            Self::Leaf => write!(f, "leaf"),
        }
    }
}

/// A key and the value it owns. Leaves hold exactly one record per key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Key,
    pub value: Value,
}

impl Record {
    #[must_use]
    pub const fn new(key: Key, value: Value) -> Self {
        Self { key, value }
    }

    /// Bytes accounted to this record: the key width plus the value length.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len() is not const-stable
    pub fn size(&self) -> u64 {
        (size_of::<Key>() + self.value.len()) as u64
    }
}

/// An internal (non-leaf) node.
///
/// Stores N keys and N+1 children.
/// `children[i]` holds keys < `keys[i]`
/// `children[i+1]` holds keys >= `keys[i]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalNode {
    /// Separator keys in sorted order.
    pub keys: Vec<Key>,
    /// Child node ids. `children.len()` == `keys.len()` + 1
    pub children: Vec<NodeId>,
}

impl InternalNode {
    /// Create an internal node with a single separator between two children.
    #[must_use]
    pub fn with_children(left: NodeId, key: Key, right: NodeId) -> Self {
        Self {
            keys: vec![key],
            children: vec![left, right],
        }
    }

    /// Find the child index to follow for a key.
    ///
    /// Descends right past every separator the key is >= to, so ties go right.
    #[must_use]
    pub fn find_child_index(&self, key: Key) -> usize {
        match self.keys.binary_search(&key) {
            Ok(i) => i + 1, // Exact match, go right
            Err(i) => i,
        }
    }

    /// Insert a separator and the child to its right, next to the child at
    /// `left_index`.
    pub fn insert_after(&mut self, left_index: usize, key: Key, right: NodeId) {
        self.keys.insert(left_index, key);
        self.children.insert(left_index + 1, right);
    }

    /// Split an over-full node at `split`, returning the pushed-up key and the
    /// new right node.
    ///
    /// The left node keeps `split - 1` keys and `split` children. The key at
    /// `split - 1` leaves both halves and becomes the separator one level up.
    #[must_use]
    pub fn split(&mut self, split: usize) -> (Key, Self) {
        let right_keys = self.keys.split_off(split);
        let right_children = self.children.split_off(split);

        let Some(k_prime) = self.keys.pop() else {
            corrupted(&InvariantViolation::SplitPoint { split });
        };

        let right = Self {
            keys: right_keys,
            children: right_children,
        };
        (k_prime, right)
    }
}

/// A leaf node.
///
/// Stores records and the id of the next leaf in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafNode {
    /// Records in sorted order by key.
    pub records: Vec<Record>,
    /// The next leaf to the right, `None` for the last leaf.
    pub next_leaf: Option<NodeId>,
}

impl LeafNode {
    /// Create a leaf holding one record.
    #[must_use]
    pub fn with_record(record: Record) -> Self {
        Self {
            records: vec![record],
            next_leaf: None,
        }
    }

    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len() is not const-stable
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty() is not const-stable
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keys of this leaf in order.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.records.iter().map(|r| r.key)
    }

    /// First key of the leaf, if any.
    #[must_use]
    pub fn first_key(&self) -> Option<Key> {
        self.records.first().map(|r| r.key)
    }

    /// Find the index where a key is stored (`Ok`) or would be inserted (`Err`).
    pub fn find_index(&self, key: Key) -> Result<usize, usize> {
        self.records.binary_search_by(|r| r.key.cmp(&key))
    }

    /// Check whether this leaf holds `key`.
    #[must_use]
    pub fn has_key(&self, key: Key) -> bool {
        self.find_index(key).is_ok()
    }

    /// Exact lookup within this leaf.
    #[must_use]
    pub fn record(&self, key: Key) -> Option<&Record> {
        self.find_index(key).ok().map(|i| &self.records[i])
    }

    /// The rightmost record whose key is <= `key`.
    ///
    /// Only this leaf is consulted. When every key here is greater than `key`
    /// the first record is returned instead; `None` only for an empty leaf.
    #[must_use]
    pub fn closest(&self, key: Key) -> Option<&Record> {
        let upper = self.records.partition_point(|r| r.key <= key);
        self.records.get(upper.saturating_sub(1))
    }

    /// Split an over-full leaf at `split`, returning the new right leaf.
    ///
    /// The right leaf takes over this leaf's forward link; the caller must
    /// point `next_leaf` at the right leaf once it has an id.
    #[must_use]
    pub fn split(&mut self, split: usize) -> Self {
        Self {
            records: self.records.split_off(split),
            next_leaf: self.next_leaf,
        }
    }
}

/// A node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Internal(InternalNode),
    Leaf(LeafNode),
}

impl Node {
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Internal(_) => NodeKind::Internal,
            Self::Leaf(_) => NodeKind::Leaf,
        }
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Number of populated key slots.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len() is not const-stable
    pub fn key_count(&self) -> usize {
        match self {
            Self::Internal(node) => node.keys.len(),
            Self::Leaf(leaf) => leaf.records.len(),
        }
    }

    /// Copy of the node's keys in order.
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        match self {
            Self::Internal(node) => node.keys.clone(),
            Self::Leaf(leaf) => leaf.keys().collect(),
        }
    }
}
