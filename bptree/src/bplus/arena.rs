//! Node storage for the tree.
//!
//! Nodes live in a flat vector of slots addressed by [`NodeId`]. A slot is
//! never moved once allocated, so ids stay valid until the node is released;
//! released slots are recycled through a free list.

use crate::bplus::node::{InternalNode, LeafNode, Node, NodeKind};
use crate::bplus::verify::{InvariantViolation, corrupted};

/// Index of a node slot in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The slot index this id refers to.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Owner of every node in a tree.
///
/// The slot vector only grows: released slots go on the free list and are
/// reused by later allocations, and memory is returned only by [`clear`].
///
/// [`clear`]: NodeArena::clear
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeArena {
    slots: Vec<Option<Node>>,
    free: Vec<NodeId>,
}

impl NodeArena {
    /// Create an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store a node, reusing a released slot when one is available.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.0] = Some(node);
            return id;
        }
        self.slots.push(Some(node));
        NodeId::new(self.slots.len() - 1)
    }

    /// Remove a node from the arena and hand it back.
    pub fn release(&mut self, id: NodeId) -> Node {
        let Some(node) = self.slots.get_mut(id.0).and_then(Option::take) else {
            corrupted(&InvariantViolation::DanglingNode { node: id });
        };
        self.free.push(id);
        node
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Number of nodes currently stored.
    #[must_use]
    pub const fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Look up a node without treating a missing one as corruption.
    #[must_use]
    pub fn try_get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        let Some(node) = self.try_get(id) else {
            corrupted(&InvariantViolation::DanglingNode { node: id });
        };
        node
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => corrupted(&InvariantViolation::DanglingNode { node: id }),
        }
    }

    #[must_use]
    pub fn leaf(&self, id: NodeId) -> &LeafNode {
        match self.get(id) {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => corrupted(&InvariantViolation::WrongNodeKind {
                node: id,
                expected: NodeKind::Leaf,
            }),
        }
    }

    pub fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode {
        match self.get_mut(id) {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => corrupted(&InvariantViolation::WrongNodeKind {
                node: id,
                expected: NodeKind::Leaf,
            }),
        }
    }

    #[must_use]
    pub fn internal(&self, id: NodeId) -> &InternalNode {
        match self.get(id) {
            Node::Internal(node) => node,
            Node::Leaf(_) => corrupted(&InvariantViolation::WrongNodeKind {
                node: id,
                expected: NodeKind::Internal,
            }),
        }
    }

    pub fn internal_mut(&mut self, id: NodeId) -> &mut InternalNode {
        match self.get_mut(id) {
            Node::Internal(node) => node,
            Node::Leaf(_) => corrupted(&InvariantViolation::WrongNodeKind {
                node: id,
                expected: NodeKind::Internal,
            }),
        }
    }
}
