//! Structural invariants of the tree.
//!
//! [`BPlusTree::verify`] walks the whole tree and reports the first broken
//! invariant. The mutating operations never return these errors: a violation
//! found mid-operation means the tree is corrupted, which is fatal and goes
//! through [`corrupted`].

use std::collections::HashSet;

use tracing::error;

use crate::bplus::arena::{NodeArena, NodeId};
use crate::bplus::node::{Key, Node, NodeKind};
use crate::bplus::tree::BPlusTree;

/// A broken structural invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A node id that does not refer to a live node.
    DanglingNode { node: NodeId },
    /// A node of the other kind was found where one kind was required.
    WrongNodeKind { node: NodeId, expected: NodeKind },
    /// A parent does not hold the child a descent passed through.
    MissingChild { parent: NodeId, child: NodeId },
    /// Two children of one parent are of different kinds.
    MixedSiblings { left: NodeId, right: NodeId },
    /// A node reachable from more than one place.
    SharedNode { node: NodeId },
    /// A split point that leaves the left half without a separator.
    SplitPoint { split: usize },
    /// Keys within a node are not strictly ascending.
    UnsortedKeys { node: NodeId },
    /// A key outside the range its ancestors' separators allow.
    KeyOutOfBounds { node: NodeId, key: Key },
    /// An internal node whose child count is not its key count plus one.
    ChildCountMismatch {
        node: NodeId,
        keys: usize,
        children: usize,
    },
    /// A non-root node below minimum occupancy.
    Underfull {
        node: NodeId,
        keys: usize,
        minimum: usize,
    },
    /// A node above maximum occupancy.
    Overfull {
        node: NodeId,
        keys: usize,
        maximum: usize,
    },
    /// A root with no keys.
    EmptyRoot { node: NodeId },
    /// Leaves at different depths.
    UnevenLeafDepth {
        node: NodeId,
        depth: usize,
        expected: usize,
    },
    /// The leaf chain does not visit the leaves in tree order.
    BrokenLeafChain { node: NodeId },
    /// Adjacent leaves in the chain are out of key order.
    UnorderedLeafChain { previous: NodeId, next: NodeId },
    /// Nodes stored in the arena but unreachable from the root.
    LeakedNodes { live: usize, reachable: usize },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingNode { node } => write!(f, "dangling node reference {node}"),
            Self::WrongNodeKind { node, expected } => {
                write!(f, "expected {expected} node at {node}")
            }
            Self::MissingChild { parent, child } => {
                write!(f, "node {parent} does not hold child {child}")
            }
            Self::MixedSiblings { left, right } => {
                write!(f, "siblings {left} and {right} are of different kinds")
            }
            Self::SharedNode { node } => write!(f, "node {node} has more than one parent"),
            Self::SplitPoint { split } => write!(f, "invalid split point {split}"),
            Self::UnsortedKeys { node } => write!(f, "keys of {node} are not ascending"),
            Self::KeyOutOfBounds { node, key } => {
                write!(f, "key {key} in {node} is outside its separator range")
            }
            Self::ChildCountMismatch {
                node,
                keys,
                children,
            } => write!(f, "node {node} has {keys} keys but {children} children"),
            Self::Underfull {
                node,
                keys,
                minimum,
            } => write!(f, "node {node} has {keys} keys, minimum is {minimum}"),
            Self::Overfull {
                node,
                keys,
                maximum,
            } => write!(f, "node {node} has {keys} keys, maximum is {maximum}"),
            Self::EmptyRoot { node } => write!(f, "root {node} has no keys"),
            Self::UnevenLeafDepth {
                node,
                depth,
                expected,
            } => write!(f, "leaf {node} at depth {depth}, expected {expected}"),
            Self::BrokenLeafChain { node } => {
                write!(f, "leaf chain diverges from tree order at {node}")
            }
            Self::UnorderedLeafChain { previous, next } => {
                write!(f, "leaf {next} does not follow {previous} in key order")
            }
            Self::LeakedNodes { live, reachable } => {
                write!(f, "{live} live nodes but only {reachable} reachable")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Abort on a corrupted tree.
#[track_caller]
pub fn corrupted(violation: &InvariantViolation) -> ! {
    error!(%violation, "B+Tree corrupted");
    panic!("B+Tree invariant violated: {violation}");
}

/// Summary of a tree that passed verification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeShape {
    /// Levels from root to leaves; 0 for an empty tree.
    pub levels: usize,
    pub internal_nodes: usize,
    pub leaf_nodes: usize,
    pub records: usize,
}

impl<const ORDER: usize> BPlusTree<ORDER> {
    /// Check every structural invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn verify(&self) -> Result<TreeShape, InvariantViolation> {
        let Some(root) = self.root else {
            let live = self.arena.live_count();
            if live != 0 {
                return Err(InvariantViolation::LeakedNodes { live, reachable: 0 });
            }
            return Ok(TreeShape::default());
        };

        let mut verifier = Verifier {
            arena: &self.arena,
            max_keys: Self::MAX_KEYS,
            min_leaf_keys: Self::MIN_LEAF_KEYS,
            min_internal_keys: Self::MIN_INTERNAL_KEYS,
            visited: HashSet::new(),
            leaves: Vec::new(),
            shape: TreeShape::default(),
        };
        verifier.visit(root, 1, None, None)?;
        verifier.check_leaf_chain()?;

        let live = self.arena.live_count();
        let reachable = verifier.visited.len();
        if live != reachable {
            return Err(InvariantViolation::LeakedNodes { live, reachable });
        }

        Ok(verifier.shape)
    }
}

struct Verifier<'a> {
    arena: &'a NodeArena,
    max_keys: usize,
    min_leaf_keys: usize,
    min_internal_keys: usize,
    visited: HashSet<NodeId>,
    leaves: Vec<NodeId>,
    shape: TreeShape,
}

impl Verifier<'_> {
    /// Check `id` and its subtree. Every key must lie in `[lower, upper)`.
    fn visit(
        &mut self,
        id: NodeId,
        depth: usize,
        lower: Option<Key>,
        upper: Option<Key>,
    ) -> Result<(), InvariantViolation> {
        if !self.visited.insert(id) {
            return Err(InvariantViolation::SharedNode { node: id });
        }
        let arena = self.arena;
        let node = arena
            .try_get(id)
            .ok_or(InvariantViolation::DanglingNode { node: id })?;
        let is_root = depth == 1;

        let keys = node.keys();
        if is_root && keys.is_empty() {
            return Err(InvariantViolation::EmptyRoot { node: id });
        }
        if keys.len() > self.max_keys {
            return Err(InvariantViolation::Overfull {
                node: id,
                keys: keys.len(),
                maximum: self.max_keys,
            });
        }
        let minimum = if node.is_leaf() {
            self.min_leaf_keys
        } else {
            self.min_internal_keys
        };
        if !is_root && keys.len() < minimum {
            return Err(InvariantViolation::Underfull {
                node: id,
                keys: keys.len(),
                minimum,
            });
        }
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(InvariantViolation::UnsortedKeys { node: id });
        }
        let in_bounds = |key: Key| lower.is_none_or(|lo| key >= lo) && upper.is_none_or(|hi| key < hi);
        if let Some(&key) = keys.iter().find(|&&key| !in_bounds(key)) {
            return Err(InvariantViolation::KeyOutOfBounds { node: id, key });
        }

        match node {
            Node::Leaf(_) => {
                if self.shape.levels == 0 {
                    self.shape.levels = depth;
                } else if depth != self.shape.levels {
                    return Err(InvariantViolation::UnevenLeafDepth {
                        node: id,
                        depth,
                        expected: self.shape.levels,
                    });
                }
                self.shape.leaf_nodes += 1;
                self.shape.records += keys.len();
                self.leaves.push(id);
            }
            Node::Internal(internal) => {
                if internal.children.len() != keys.len() + 1 {
                    return Err(InvariantViolation::ChildCountMismatch {
                        node: id,
                        keys: keys.len(),
                        children: internal.children.len(),
                    });
                }
                self.shape.internal_nodes += 1;

                let first = internal.children[0];
                let first_kind = arena.try_get(first).map(Node::kind);
                for (i, &child) in internal.children.iter().enumerate() {
                    let kind = arena.try_get(child).map(Node::kind);
                    if kind.is_some() && first_kind.is_some() && kind != first_kind {
                        return Err(InvariantViolation::MixedSiblings {
                            left: first,
                            right: child,
                        });
                    }
                    let lo = if i == 0 { lower } else { Some(keys[i - 1]) };
                    let hi = keys.get(i).copied().or(upper);
                    self.visit(child, depth + 1, lo, hi)?;
                }
            }
        }
        Ok(())
    }

    /// Walk the leaf chain and compare it with the in-order leaves.
    fn check_leaf_chain(&self) -> Result<(), InvariantViolation> {
        let mut current = self.leaves.first().copied();
        let mut previous: Option<NodeId> = None;

        for &expected in &self.leaves {
            let Some(id) = current.filter(|&id| id == expected) else {
                return Err(InvariantViolation::BrokenLeafChain {
                    node: previous.unwrap_or(expected),
                });
            };
            let leaf = self.arena.leaf(id);

            if let Some(prev) = previous {
                let prev_last = self.arena.leaf(prev).records.last().map(|r| r.key);
                if prev_last.zip(leaf.first_key()).is_some_and(|(a, b)| a >= b) {
                    return Err(InvariantViolation::UnorderedLeafChain {
                        previous: prev,
                        next: id,
                    });
                }
            }

            previous = Some(id);
            current = leaf.next_leaf;
        }

        match (previous, current) {
            (Some(last), Some(_)) => Err(InvariantViolation::BrokenLeafChain { node: last }),
            _ => Ok(()),
        }
    }
}
