//! Invariant checking for deterministic simulation testing.
//!
//! Every operation is replayed against a `BTreeMap` model. The checker
//! compares the tree's answer with the model's and verifies the tree's
//! structure after mutations.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::bplus::{BPlusTree, Key, Record, Value};

use super::op_gen::Operation;

/// The observable result of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `add`: nothing to report.
    Unit,
    /// `put`: whether the key already existed.
    Replaced(bool),
    /// `has`.
    Present(bool),
    /// `get` and `del`.
    Value(Option<Value>),
    /// Lookups that return a whole record.
    Entry(Option<(Key, Value)>),
    /// `range`: the keys visited, in order.
    Keys(Vec<Key>),
    /// `len`.
    Count(usize),
    /// `size`.
    Bytes(u64),
}

fn entry((key, value): (Key, &Value)) -> (Key, Value) {
    (key, value.clone())
}

/// Apply `operation` to the tree and capture its result.
pub fn apply<const ORDER: usize>(tree: &mut BPlusTree<ORDER>, operation: &Operation) -> Outcome {
    match operation {
        Operation::Put { key, value } => Outcome::Replaced(tree.put(*key, value.clone())),
        Operation::Add { key, value } => {
            tree.add(*key, value.clone());
            Outcome::Unit
        }
        Operation::Del { key } => Outcome::Value(tree.del(*key)),
        Operation::Get { key } => Outcome::Value(tree.get(*key).cloned()),
        Operation::Has { key } => Outcome::Present(tree.has(*key)),
        Operation::GetClosest { key } => Outcome::Entry(tree.get_closest(*key).map(entry)),
        Operation::GetNearMin { key } => Outcome::Entry(tree.get_near_min(*key).map(entry)),
        Operation::GetNearMax { key } => Outcome::Entry(tree.get_near_max(*key).map(entry)),
        Operation::Range { limit } => {
            let mut keys = Vec::new();
            tree.range(|key, _| {
                keys.push(key);
                keys.len() < *limit
            });
            Outcome::Keys(keys)
        }
        Operation::Min => Outcome::Entry(tree.min().map(entry)),
        Operation::Max => Outcome::Entry(tree.max().map(entry)),
        Operation::Len => Outcome::Count(tree.len()),
        Operation::Size => Outcome::Bytes(tree.size()),
    }
}

/// Tracks the history of operations and the state the tree should be in.
#[derive(Debug, Default)]
pub struct OperationHistory {
    /// All operations in order.
    operations: Vec<Operation>,
    /// What we expect to be in the tree.
    expected_state: BTreeMap<Key, Value>,
    /// Number of writes that inserted a new key.
    inserts: u64,
    /// Number of writes that replaced an existing value.
    overwrites: u64,
    /// Number of deletes that removed a key.
    deletes: u64,
    /// Number of deletes of an absent key.
    missed_deletes: u64,
    /// Number of read operations.
    reads: u64,
}

impl OperationHistory {
    /// Create a new empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The model's answer for `operation`, computed before it is recorded.
    ///
    /// `None` for `GetClosest`, whose answer depends on leaf boundaries; see
    /// [`InvariantChecker::check_closest`].
    #[must_use]
    pub fn expected(&self, operation: &Operation) -> Option<Outcome> {
        let state = &self.expected_state;
        let outcome = match operation {
            Operation::Put { key, .. } => Outcome::Replaced(state.contains_key(key)),
            Operation::Add { .. } => Outcome::Unit,
            Operation::Del { key } | Operation::Get { key } => {
                Outcome::Value(state.get(key).cloned())
            }
            Operation::Has { key } => Outcome::Present(state.contains_key(key)),
            Operation::GetClosest { .. } => return None,
            Operation::GetNearMin { key } => Outcome::Entry(self.floor(*key)),
            Operation::GetNearMax { key } => Outcome::Entry(self.ceiling(*key)),
            Operation::Range { limit } => {
                Outcome::Keys(state.keys().copied().take(*limit).collect())
            }
            Operation::Min => {
                Outcome::Entry(state.first_key_value().map(|(k, v)| (*k, v.clone())))
            }
            Operation::Max => Outcome::Entry(state.last_key_value().map(|(k, v)| (*k, v.clone()))),
            Operation::Len => Outcome::Count(state.len()),
            Operation::Size => Outcome::Bytes(
                state
                    .iter()
                    .map(|(k, v)| Record::new(*k, v.clone()).size())
                    .sum(),
            ),
        };
        Some(outcome)
    }

    /// Record an operation and apply it to the expected state.
    pub fn record(&mut self, operation: Operation) {
        match &operation {
            Operation::Put { key, value } => {
                if self.expected_state.insert(*key, value.clone()).is_some() {
                    self.overwrites += 1;
                } else {
                    self.inserts += 1;
                }
            }
            Operation::Add { key, value } => {
                if !self.expected_state.contains_key(key) {
                    self.expected_state.insert(*key, value.clone());
                    self.inserts += 1;
                }
            }
            Operation::Del { key } => {
                if self.expected_state.remove(key).is_some() {
                    self.deletes += 1;
                } else {
                    self.missed_deletes += 1;
                }
            }
            _ => self.reads += 1,
        }
        self.operations.push(operation);
    }

    /// Largest expected key <= `key`.
    #[must_use]
    pub fn floor(&self, key: Key) -> Option<(Key, Value)> {
        self.expected_state
            .range(..=key)
            .next_back()
            .map(|(k, v)| (*k, v.clone()))
    }

    /// Smallest expected key >= `key`.
    #[must_use]
    pub fn ceiling(&self, key: Key) -> Option<(Key, Value)> {
        self.expected_state
            .range((Bound::Included(key), Bound::Unbounded))
            .next()
            .map(|(k, v)| (*k, v.clone()))
    }

    /// Get the number of operations.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len() is not const-stable
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if history is empty.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty() is not const-stable
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Get statistics.
    #[must_use]
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            total_operations: self.operations.len(),
            inserts: self.inserts,
            overwrites: self.overwrites,
            deletes: self.deletes,
            missed_deletes: self.missed_deletes,
            reads: self.reads,
            live_keys: self.expected_state.len(),
        }
    }

    /// Get the expected state (for verification).
    #[must_use]
    pub const fn expected_state(&self) -> &BTreeMap<Key, Value> {
        &self.expected_state
    }
}

/// Statistics about the operation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStats {
    /// Total number of operations.
    pub total_operations: usize,
    /// Writes that inserted a new key.
    pub inserts: u64,
    /// Writes that replaced an existing value.
    pub overwrites: u64,
    /// Deletes that removed a key.
    pub deletes: u64,
    /// Deletes of an absent key.
    pub missed_deletes: u64,
    /// Read operations.
    pub reads: u64,
    /// Keys in the expected state.
    pub live_keys: usize,
}

/// A discrepancy detected during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationViolation {
    /// Description of the violation.
    pub description: String,
    /// Operation index where it was detected.
    pub operation_index: usize,
    /// Additional context.
    pub context: String,
}

impl std::fmt::Display for SimulationViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "operation {}: {} ({})",
            self.operation_index, self.description, self.context
        )
    }
}

/// Checker for tree invariants.
#[derive(Debug, Default)]
pub struct InvariantChecker {
    /// Detected violations.
    violations: Vec<SimulationViolation>,
}

impl InvariantChecker {
    /// Create a new invariant checker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Get all violations.
    #[must_use]
    pub fn violations(&self) -> &[SimulationViolation] {
        &self.violations
    }

    /// Check if any violations were detected.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty() is not const-stable
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Add a violation.
    pub fn add_violation(&mut self, violation: SimulationViolation) {
        self.violations.push(violation);
    }

    /// Compare the tree's result for `operation` with the model's.
    pub fn check_outcome(
        &mut self,
        operation: &Operation,
        observed: &Outcome,
        history: &OperationHistory,
        operation_index: usize,
    ) {
        if let Operation::GetClosest { key } = operation {
            self.check_closest(*key, observed, history, operation_index);
            return;
        }
        let Some(expected) = history.expected(operation) else {
            return;
        };
        if *observed != expected {
            self.violations.push(SimulationViolation {
                description: "Result differs from model".to_string(),
                operation_index,
                context: format!("{operation:?}: expected {expected:?}, got {observed:?}"),
            });
        }
    }

    /// Check a leaf-local closest match.
    ///
    /// The answer must be the global floor of `key` when that floor shares a
    /// leaf with `key`, and otherwise the first record of that leaf, which is
    /// the global ceiling. Either way it is one of the two.
    pub fn check_closest(
        &mut self,
        key: Key,
        observed: &Outcome,
        history: &OperationHistory,
        operation_index: usize,
    ) {
        let floor = history.floor(key);
        let ceiling = history.ceiling(key);
        let ok = match observed {
            Outcome::Entry(None) => history.expected_state().is_empty(),
            Outcome::Entry(Some(found)) => {
                floor.as_ref() == Some(found) || ceiling.as_ref() == Some(found)
            }
            _ => false,
        };
        if !ok {
            self.violations.push(SimulationViolation {
                description: "Closest match is neither floor nor ceiling".to_string(),
                operation_index,
                context: format!(
                    "key {key}: floor {floor:?}, ceiling {ceiling:?}, got {observed:?}"
                ),
            });
        }
    }

    /// Verify the tree's structure and that it holds exactly the model's keys.
    pub fn check_structure<const ORDER: usize>(
        &mut self,
        tree: &BPlusTree<ORDER>,
        history: &OperationHistory,
        operation_index: usize,
    ) {
        match tree.verify() {
            Ok(shape) if shape.records == history.expected_state().len() => {}
            Ok(shape) => self.violations.push(SimulationViolation {
                description: "Record count differs from model".to_string(),
                operation_index,
                context: format!(
                    "tree holds {}, model holds {}",
                    shape.records,
                    history.expected_state().len()
                ),
            }),
            Err(violation) => self.violations.push(SimulationViolation {
                description: "Structural invariant broken".to_string(),
                operation_index,
                context: violation.to_string(),
            }),
        }
    }

    /// Compare every record in the tree with the model.
    pub fn check_contents<const ORDER: usize>(
        &mut self,
        tree: &BPlusTree<ORDER>,
        history: &OperationHistory,
        operation_index: usize,
    ) {
        let expected = history.expected_state();
        let mismatch = tree
            .iter()
            .zip(expected.iter())
            .position(|((k, v), (ek, ev))| k != *ek || v != ev);
        if let Some(position) = mismatch {
            self.violations.push(SimulationViolation {
                description: "Tree contents differ from model".to_string(),
                operation_index,
                context: format!("first difference at position {position}"),
            });
        } else if tree.len() != expected.len() {
            self.violations.push(SimulationViolation {
                description: "Tree contents differ from model".to_string(),
                operation_index,
                context: format!("tree holds {}, model holds {}", tree.len(), expected.len()),
            });
        }
    }
}
