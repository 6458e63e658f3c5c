//! Text renderings of the tree for debugging.

use std::collections::VecDeque;
use std::fmt::Write;

use crate::bplus::arena::NodeId;
use crate::bplus::node::{Key, Node};
use crate::bplus::tree::BPlusTree;

const EMPTY: &str = "empty tree";

fn join_keys(keys: &[Key], separator: &str, width: usize) -> String {
    keys.iter()
        .map(|k| format!("{k:0width$}"))
        .collect::<Vec<_>>()
        .join(separator)
}

impl<const ORDER: usize> BPlusTree<ORDER> {
    /// Edges from the root to any leaf. 0 for an empty tree or a lone leaf.
    #[must_use]
    pub fn height(&self) -> usize {
        self.root.map_or(0, |root| self.node_height(root))
    }

    fn node_height(&self, id: NodeId) -> usize {
        let mut height = 0;
        let mut current = id;
        while let Node::Internal(node) = self.arena.get(current) {
            current = node.children[0];
            height += 1;
        }
        height
    }

    /// Breadth-first walk yielding each node with its depth.
    fn level_order(&self) -> Vec<(NodeId, usize)> {
        let mut order = Vec::new();
        let mut queue: VecDeque<(NodeId, usize)> = self.root.map(|root| (root, 0)).into_iter().collect();
        while let Some((id, depth)) = queue.pop_front() {
            if let Node::Internal(node) = self.arena.get(id) {
                queue.extend(node.children.iter().map(|&child| (child, depth + 1)));
            }
            order.push((id, depth));
        }
        order
    }

    /// One line per level, root first, each node as `[k1|k2|...]`.
    #[must_use]
    pub fn render_levels(&self) -> String {
        if self.is_empty() {
            return EMPTY.to_string();
        }

        let mut lines: Vec<Vec<String>> = Vec::new();
        for (id, depth) in self.level_order() {
            if lines.len() <= depth {
                lines.push(Vec::new());
            }
            let keys = join_keys(&self.arena.get(id).keys(), "|", 0);
            lines[depth].push(format!("[{keys}]"));
        }
        lines
            .iter()
            .map(|nodes| nodes.join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The leaf chain from left to right, leaves separated by ` || `.
    #[must_use]
    pub fn render_leaves(&self) -> String {
        if self.is_empty() {
            return EMPTY.to_string();
        }
        self.leaves()
            .map(|(_, leaf)| join_keys(&leaf.keys().collect::<Vec<_>>(), " ", 0))
            .collect::<Vec<_>>()
            .join(" || ")
    }

    fn mermaid_id(&self, id: NodeId) -> String {
        self.arena
            .get(id)
            .keys()
            .iter()
            .fold(format!("h{:04x}k", self.node_height(id)), |mut out, k| {
                let _ = write!(out, "{k:04x}");
                out
            })
    }

    /// A Mermaid flowchart of the tree.
    ///
    /// Internal nodes appear as one edge line per child; leaves as a single
    /// labelled node line.
    #[must_use]
    pub fn render_mermaid(&self) -> String {
        if self.is_empty() {
            return EMPTY.to_string();
        }

        let order = ORDER;
        let mut lines = vec![
            "graph TD".to_string(),
            format!("\ttitle{{B+Tree of order {order}}}"),
        ];
        for (id, _) in self.level_order() {
            let node = self.arena.get(id);
            let label = format!("\t{}[{}]", self.mermaid_id(id), join_keys(&node.keys(), ",", 2));
            match node {
                Node::Internal(internal) => {
                    lines.extend(
                        internal
                            .children
                            .iter()
                            .map(|&child| format!("{label} --- {}", self.mermaid_id(child))),
                    );
                }
                Node::Leaf(_) => lines.push(label),
            }
        }
        lines.join("\n")
    }
}

impl<const ORDER: usize> std::fmt::Display for BPlusTree<ORDER> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render_levels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: impl IntoIterator<Item = Key>) -> BPlusTree {
        keys.into_iter().map(|k| (k, Vec::new())).collect()
    }

    #[test]
    fn test_empty_renderings() {
        let tree = BPlusTree::new();
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.render_levels(), "empty tree");
        assert_eq!(tree.render_leaves(), "empty tree");
        assert_eq!(tree.render_mermaid(), "empty tree");
        assert_eq!(tree.to_string(), "empty tree");
    }

    #[test]
    fn test_height() {
        assert_eq!(tree_of(0..4).height(), 0);
        assert_eq!(tree_of(0..=4).height(), 1);
        assert_eq!(tree_of(0..=12).height(), 2);
    }

    #[test]
    fn test_render_levels_and_display() {
        let tree = tree_of(0..=12);
        let expected = "[6]\n[2|4] [8|10]\n[0|1] [2|3] [4|5] [6|7] [8|9] [10|11|12]";
        assert_eq!(tree.render_levels(), expected);
        assert_eq!(format!("{tree}"), expected);
    }

    #[test]
    fn test_render_leaves() {
        let tree = tree_of(0..=4);
        assert_eq!(tree.render_leaves(), "0 1 || 2 3 4");
    }

    #[test]
    fn test_render_mermaid() {
        let tree = tree_of(0..=4);
        let expected = [
            "graph TD",
            "\ttitle{B+Tree of order 5}",
            "\th0001k0002[02] --- h0000k00000001",
            "\th0001k0002[02] --- h0000k000200030004",
            "\th0000k00000001[00,01]",
            "\th0000k000200030004[02,03,04]",
        ]
        .join("\n");
        assert_eq!(tree.render_mermaid(), expected);
    }
}
