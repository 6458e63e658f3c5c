//! End-to-end tests against the public tree API.
//!
//! Each test file covers a specific scenario, using deterministic inputs
//! and checking the full structure after the scenario runs.

#![cfg(test)]

mod helpers;

mod test_closest;
mod test_delete_all;
mod test_delete_empty;
mod test_determinism;
mod test_leaf_chain;
mod test_orders;
mod test_put_overwrite;
mod test_put_sequential;
mod test_range_early_stop;
mod test_round_trip;
