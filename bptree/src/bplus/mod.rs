//! In-memory B+Tree.
//!
//! Keys are `u32`, values are owned byte vectors. Records live only in the
//! leaves, which form a forward chain for ordered scans; internal nodes hold
//! separator keys.

mod arena;
mod delete;
mod insert;
mod node;
mod render;
mod search;
mod traverse;
mod tree;
mod verify;

pub use arena::NodeId;
pub use node::{DEFAULT_ORDER, Key, NodeKind, Record, Value, cut};
pub use traverse::Iter;
pub use tree::BPlusTree;
pub use verify::{InvariantViolation, TreeShape};
