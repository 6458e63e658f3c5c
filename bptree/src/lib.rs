// Layout:
//  - bplus: the tree itself, an arena of tagged internal/leaf nodes
//  - simulation: seeded operation sequences checked against a BTreeMap model
//  - config: environment settings for the simulation driver
//
// Mutations never hand back structural errors. A broken invariant found
// mid-operation panics through one logging helper; `verify()` reports the
// same conditions as values for tests and the simulator.

pub mod bplus;
pub mod config;
pub mod simulation;

#[cfg(test)]
mod e2e_tests;

pub use bplus::{BPlusTree, DEFAULT_ORDER, InvariantViolation, Key, TreeShape, Value};
