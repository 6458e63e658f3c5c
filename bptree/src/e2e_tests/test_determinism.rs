//! Test that the same sequence of operations produces identical trees.

use crate::bplus::BPlusTree;
use crate::e2e_tests::helpers::*;
use crate::simulation::{Simulator, SimulatorConfig};

fn run_sequence() -> (BPlusTree, Vec<Option<Vec<u8>>>) {
    let mut tree = BPlusTree::new();
    let mut removed = Vec::new();

    for key in shuffled(0..400, 21) {
        tree.put(key, make_val(key));
    }
    for key in shuffled(0..600, 22).into_iter().take(250) {
        removed.push(tree.del(key));
    }

    (tree, removed)
}

#[test]
fn test_deterministic_sequence() {
    let (tree1, removed1) = run_sequence();
    let (tree2, removed2) = run_sequence();

    assert_eq!(removed1, removed2);
    assert_eq!(tree1, tree2);
    assert_eq!(tree1.render_mermaid(), tree2.render_mermaid());
}

#[test]
fn test_deterministic_simulation() {
    let mut sim1: Simulator = Simulator::new(SimulatorConfig::new(0x5eed).with_key_space(256));
    let mut sim2: Simulator = Simulator::new(SimulatorConfig::new(0x5eed).with_key_space(256));

    let result1 = sim1.run(3000);
    let result2 = sim2.run(3000);

    assert!(result1.passed(), "{:?}", result1.invariant_violations);
    assert_eq!(result1.shape, result2.shape);
    assert_eq!(sim1.tree(), sim2.tree());
}
