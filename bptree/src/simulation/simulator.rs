//! Main simulator harness for deterministic simulation testing.
//!
//! This module ties together the operation generator, the model history and
//! the invariant checker, and drives them against a single tree.

use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use crate::bplus::{BPlusTree, DEFAULT_ORDER, Key, TreeShape};

use super::invariants::{InvariantChecker, OperationHistory, SimulationViolation, apply};
use super::op_gen::{OperationGenConfig, OperationGenerator};

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Operation generation configuration.
    pub generator_config: OperationGenConfig,
    /// Verify the tree's structure after every `verify_every` mutations.
    pub verify_every: usize,
}

impl SimulatorConfig {
    /// Create a new simulator config with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            generator_config: OperationGenConfig::default(),
            verify_every: 1,
        }
    }

    /// Set the operation generation configuration.
    #[must_use]
    pub const fn with_generator_config(mut self, config: OperationGenConfig) -> Self {
        self.generator_config = config;
        self
    }

    /// Set the size of the key space.
    #[must_use]
    pub const fn with_key_space(mut self, key_space: Key) -> Self {
        self.generator_config.key_space = key_space;
        self
    }

    /// Verify structure less often (for faster long runs).
    #[must_use]
    pub const fn with_verify_every(mut self, mutations: usize) -> Self {
        self.verify_every = mutations;
        self
    }
}

/// Results from a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The seed used for this simulation.
    pub seed: u64,
    /// Number of operations processed.
    pub operations_processed: u64,
    /// Number of operations that could change the tree.
    pub mutations: u64,
    /// Number of read-only operations.
    pub reads: u64,
    /// Invariant violations detected.
    pub invariant_violations: Vec<SimulationViolation>,
    /// Whether the simulation completed without panics.
    pub completed_successfully: bool,
    /// Error message if simulation failed.
    pub error: Option<String>,
    /// Shape of the final tree, if it verified.
    pub shape: Option<TreeShape>,
}

impl SimulationResult {
    /// Check if the simulation passed (no invariant violations).
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty() is not const-stable
    pub fn passed(&self) -> bool {
        self.completed_successfully && self.invariant_violations.is_empty()
    }
}

/// The main simulator harness.
///
/// Each operation is generated from the seed, applied to the tree, compared
/// with the model and recorded. A panic inside the tree ends the run and is
/// reported as a failure.
pub struct Simulator<const ORDER: usize = DEFAULT_ORDER> {
    config: SimulatorConfig,
    generator: OperationGenerator,
    history: OperationHistory,
    checker: InvariantChecker,
    tree: BPlusTree<ORDER>,
    operations_processed: u64,
    mutations: u64,
    reads: u64,
}

impl<const ORDER: usize> Simulator<ORDER> {
    /// Create a new simulator with the given configuration.
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        let generator = OperationGenerator::with_config(config.seed, config.generator_config.clone());

        Self {
            config,
            generator,
            history: OperationHistory::new(),
            checker: InvariantChecker::new(),
            tree: BPlusTree::empty(),
            operations_processed: 0,
            mutations: 0,
            reads: 0,
        }
    }

    /// Run the simulation for a given number of operations.
    ///
    /// Operations continue from wherever a previous run stopped.
    pub fn run(&mut self, operation_count: usize) -> SimulationResult {
        let verify_every = self.config.verify_every.max(1) as u64;

        for _ in 0..operation_count {
            let operation = self.generator.next_operation();
            let index = self.history.len();
            self.operations_processed += 1;

            let tree = &mut self.tree;
            let observed = match panic::catch_unwind(AssertUnwindSafe(|| apply(tree, &operation))) {
                Ok(observed) => observed,
                Err(payload) => {
                    let message = payload
                        .downcast_ref::<String>()
                        .cloned()
                        .or_else(|| payload.downcast_ref::<&str>().map(ToString::to_string))
                        .unwrap_or_else(|| "unknown panic".to_string());
                    return self.result(false, Some(format!("operation {index} ({operation:?}) panicked: {message}")));
                }
            };

            self.checker
                .check_outcome(&operation, &observed, &self.history, index);
            let is_mutation = operation.is_mutation();
            self.history.record(operation);

            if is_mutation {
                self.mutations += 1;
                if self.mutations % verify_every == 0 {
                    self.checker.check_structure(&self.tree, &self.history, index);
                }
            } else {
                self.reads += 1;
            }

            if self.operations_processed % 1000 == 0 {
                debug!(
                    seed = self.config.seed,
                    operations = self.operations_processed,
                    records = self.history.expected_state().len(),
                    height = self.tree.height(),
                    "simulation progress"
                );
            }
        }

        let last = self.history.len().saturating_sub(1);
        self.checker.check_structure(&self.tree, &self.history, last);
        self.checker.check_contents(&self.tree, &self.history, last);
        self.result(true, None)
    }

    fn result(&self, completed_successfully: bool, error: Option<String>) -> SimulationResult {
        SimulationResult {
            seed: self.config.seed,
            operations_processed: self.operations_processed,
            mutations: self.mutations,
            reads: self.reads,
            invariant_violations: self.checker.violations().to_vec(),
            completed_successfully,
            error,
            shape: if completed_successfully {
                self.tree.verify().ok()
            } else {
                None
            },
        }
    }

    /// Get the tree under test.
    #[must_use]
    pub const fn tree(&self) -> &BPlusTree<ORDER> {
        &self.tree
    }

    /// Get the operation history.
    #[must_use]
    pub const fn history(&self) -> &OperationHistory {
        &self.history
    }

    /// Get the invariant checker.
    #[must_use]
    pub const fn checker(&self) -> &InvariantChecker {
        &self.checker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_basic() {
        let mut simulator: Simulator = Simulator::new(SimulatorConfig::new(12345));

        let result = simulator.run(500);

        assert!(result.completed_successfully);
        assert_eq!(result.operations_processed, 500);
        assert_eq!(result.mutations + result.reads, 500);
        assert!(result.passed(), "{:?}", result.invariant_violations);
    }

    #[test]
    fn test_simulator_deterministic() {
        // Same seed should produce same results
        let mut sim1: Simulator = Simulator::new(SimulatorConfig::new(777));
        let result1 = sim1.run(300);

        let mut sim2: Simulator = Simulator::new(SimulatorConfig::new(777));
        let result2 = sim2.run(300);

        assert_eq!(result1.mutations, result2.mutations);
        assert_eq!(result1.shape, result2.shape);
        assert_eq!(sim1.tree(), sim2.tree());
        assert_eq!(sim1.history().stats(), sim2.history().stats());
    }

    #[test]
    fn test_simulator_small_key_space_churns() {
        // Eight keys force constant overwrites and deletes of present keys.
        let config = SimulatorConfig::new(4242).with_key_space(8);
        let mut simulator: Simulator = Simulator::new(config);

        let result = simulator.run(2000);

        assert!(result.passed(), "{:?}", result.invariant_violations);
        let stats = simulator.history().stats();
        assert!(stats.overwrites > 0);
        assert!(stats.deletes > 0);
    }

    #[test]
    fn test_simulator_other_orders() {
        let mut order3: Simulator<3> = Simulator::new(SimulatorConfig::new(3));
        assert!(order3.run(1500).passed());

        let mut order8: Simulator<8> = Simulator::new(SimulatorConfig::new(8));
        assert!(order8.run(1500).passed());
    }

    #[test]
    fn test_simulator_resumes() {
        let mut simulator: Simulator = Simulator::new(SimulatorConfig::new(99).with_verify_every(10));
        let first = simulator.run(100);
        let second = simulator.run(100);

        assert!(first.passed());
        assert!(second.passed());
        assert_eq!(second.operations_processed, 200);
    }

    #[test]
    #[ignore] // Long running test
    fn test_simulator_stress() {
        let config = SimulatorConfig::new(99999).with_key_space(100_000);
        let mut simulator: Simulator = Simulator::new(config);

        let result = simulator.run(200_000);

        assert!(result.passed(), "{:?}", result.invariant_violations);
    }
}
