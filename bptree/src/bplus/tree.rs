//! The B+Tree handle.
//!
//! The tree owns an arena of nodes and the id of the root (`None` when the
//! tree is empty). Nodes do not point at their parents; every descent records
//! the ancestors it passed through, and insertion and deletion walk that path
//! back up.
//!
//! Operations are implemented across sibling modules:
//! - `search`: point lookups and closest matches
//! - `insert`: `add` and `put`, with leaf and internal splits
//! - `delete`: `del`, with coalescing and redistribution
//! - `traverse`: ordered iteration and aggregates

use crate::bplus::arena::{NodeArena, NodeId};
use crate::bplus::node::{DEFAULT_ORDER, cut};

/// An in-memory B+Tree mapping `u32` keys to byte values.
///
/// `ORDER` is the maximum number of children of an internal node; a node
/// holds at most `ORDER - 1` keys. It must be at least 3.
///
/// The tree is single-threaded: every mutation takes `&mut self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BPlusTree<const ORDER: usize = DEFAULT_ORDER> {
    pub(crate) arena: NodeArena,
    pub(crate) root: Option<NodeId>,
}

impl BPlusTree {
    /// Create an empty tree with the default order.
    #[must_use]
    pub const fn new() -> Self {
        Self::empty()
    }
}

impl<const ORDER: usize> Default for BPlusTree<ORDER> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const ORDER: usize> BPlusTree<ORDER> {
    const VALID_ORDER: () = assert!(ORDER >= 3, "B+Tree order must be at least 3");

    /// Maximum keys per node.
    pub const MAX_KEYS: usize = ORDER - 1;

    /// Minimum records in a leaf other than the root.
    pub const MIN_LEAF_KEYS: usize = cut(ORDER - 1);

    /// Minimum keys in an internal node other than the root.
    pub const MIN_INTERNAL_KEYS: usize = cut(ORDER) - 1;

    /// Create an empty tree of this order.
    #[must_use]
    pub const fn empty() -> Self {
        let () = Self::VALID_ORDER;
        Self {
            arena: NodeArena::new(),
            root: None,
        }
    }

    /// The maximum number of children per internal node.
    #[must_use]
    pub const fn order(&self) -> usize {
        ORDER
    }

    /// Check whether the tree holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Release every node. The tree is empty afterwards and can be reused.
    pub fn close(&mut self) {
        self.arena.clear();
        self.root = None;
    }
}
