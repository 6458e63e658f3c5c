//! Operation generator for deterministic simulation testing.
//!
//! This module generates random but reproducible sequences of tree
//! operations over a bounded key space, so that keys collide often enough to
//! exercise overwrites, deletes of present keys, and rebalancing.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bplus::{Key, Value};

/// Configuration for operation generation.
#[derive(Debug, Clone)]
pub struct OperationGenConfig {
    /// Keys are drawn from `0..key_space`.
    pub key_space: Key,
    /// Probability of a write (`put` or `add`).
    pub write_rate: f64,
    /// Probability of a delete.
    pub delete_rate: f64,
    /// Probability that a write uses `add` instead of `put`.
    pub add_rate: f64,
    /// Maximum value length in bytes.
    pub max_value_len: usize,
    /// Maximum number of records a `range` visits before stopping.
    pub max_range_len: usize,
}

impl Default for OperationGenConfig {
    fn default() -> Self {
        Self {
            key_space: 2048,
            write_rate: 0.45,
            delete_rate: 0.25,
            add_rate: 0.2,
            max_value_len: 32,
            max_range_len: 64,
        }
    }
}

/// A single operation against the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Put { key: Key, value: Value },
    Add { key: Key, value: Value },
    Del { key: Key },
    Get { key: Key },
    Has { key: Key },
    GetClosest { key: Key },
    GetNearMin { key: Key },
    GetNearMax { key: Key },
    /// Visit records in order, stopping after `limit` of them.
    Range { limit: usize },
    Min,
    Max,
    Len,
    Size,
}

impl Operation {
    /// Whether the operation can change the tree.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(self, Self::Put { .. } | Self::Add { .. } | Self::Del { .. })
    }
}

/// Kinds of read operations the generator picks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadKind {
    Get,
    Has,
    GetClosest,
    GetNearMin,
    GetNearMax,
    Range,
    Min,
    Max,
    Len,
    Size,
}

impl ReadKind {
    /// All read kinds.
    pub const ALL: [Self; 10] = [
        Self::Get,
        Self::Has,
        Self::GetClosest,
        Self::GetNearMin,
        Self::GetNearMax,
        Self::Range,
        Self::Min,
        Self::Max,
        Self::Len,
        Self::Size,
    ];
}

/// Generator for random [`Operation`]s.
///
/// The same seed and configuration always produce the same sequence.
pub struct OperationGenerator {
    rng: StdRng,
    config: OperationGenConfig,
}

impl OperationGenerator {
    /// Create a new generator with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, OperationGenConfig::default())
    }

    /// Create a new generator with custom configuration.
    #[must_use]
    pub fn with_config(seed: u64, config: OperationGenConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &OperationGenConfig {
        &self.config
    }

    /// Generate the next operation.
    pub fn next_operation(&mut self) -> Operation {
        let roll = self.rng.random::<f64>();
        if roll < self.config.write_rate {
            let key = self.random_key();
            let value = self.random_value();
            if self.rng.random::<f64>() < self.config.add_rate {
                Operation::Add { key, value }
            } else {
                Operation::Put { key, value }
            }
        } else if roll < self.config.write_rate + self.config.delete_rate {
            Operation::Del {
                key: self.random_key(),
            }
        } else {
            let kind = ReadKind::ALL[self.rng.random_range(0..ReadKind::ALL.len())];
            self.generate_read(kind)
        }
    }

    /// Generate a read of the given kind.
    pub fn generate_read(&mut self, kind: ReadKind) -> Operation {
        match kind {
            ReadKind::Get => Operation::Get {
                key: self.random_key(),
            },
            ReadKind::Has => Operation::Has {
                key: self.random_key(),
            },
            ReadKind::GetClosest => Operation::GetClosest {
                key: self.random_key(),
            },
            ReadKind::GetNearMin => Operation::GetNearMin {
                key: self.random_key(),
            },
            ReadKind::GetNearMax => Operation::GetNearMax {
                key: self.random_key(),
            },
            ReadKind::Range => Operation::Range {
                limit: self.rng.random_range(1..=self.config.max_range_len.max(1)),
            },
            ReadKind::Min => Operation::Min,
            ReadKind::Max => Operation::Max,
            ReadKind::Len => Operation::Len,
            ReadKind::Size => Operation::Size,
        }
    }

    fn random_key(&mut self) -> Key {
        self.rng.random_range(0..self.config.key_space.max(1))
    }

    fn random_value(&mut self) -> Value {
        let len = self.rng.random_range(0..=self.config.max_value_len);
        (0..len).map(|_| self.rng.random_range(b'a'..=b'z')).collect()
    }
}
