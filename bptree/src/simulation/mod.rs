//! Deterministic Simulation Testing (DST) for the tree.
//!
//! This module provides tools for testing the tree with:
//! - Reproducible random operation sequences
//! - A `BTreeMap` model of the expected contents
//! - Structural verification after mutations
//!
//! Given the same seed, execution is identical.
//!
//! # Usage
//!
//! ```
//! use bptree::simulation::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig::new(12345).with_key_space(512);
//!
//! let mut sim: Simulator = Simulator::new(config);
//! let result = sim.run(1000);
//!
//! assert!(result.passed());
//! ```

mod invariants;
mod op_gen;
mod simulator;

pub use invariants::{
    HistoryStats, InvariantChecker, OperationHistory, Outcome, SimulationViolation, apply,
};
pub use op_gen::{Operation, OperationGenConfig, OperationGenerator, ReadKind};
pub use simulator::{SimulationResult, Simulator, SimulatorConfig};
