#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use bptree::config::SimulationSettings;
use bptree::simulation::{Simulator, SimulatorConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bptree=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let settings = match SimulationSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: seed={:#x}, operations={}, key_space={}",
        settings.seed,
        settings.operations,
        settings.key_space
    );

    let config = SimulatorConfig::new(settings.seed).with_key_space(settings.key_space);
    let mut simulator: Simulator = Simulator::new(config);
    let result = simulator.run(settings.operations);

    let stats = simulator.history().stats();
    tracing::info!(
        operations = result.operations_processed,
        mutations = result.mutations,
        reads = result.reads,
        inserts = stats.inserts,
        overwrites = stats.overwrites,
        deletes = stats.deletes,
        live_keys = stats.live_keys,
        "simulation finished"
    );
    if let Some(shape) = result.shape {
        tracing::info!(
            levels = shape.levels,
            internal_nodes = shape.internal_nodes,
            leaf_nodes = shape.leaf_nodes,
            records = shape.records,
            "final tree shape"
        );
    }

    if settings.print_tree {
        println!("{}", simulator.tree());
    }

    if let Some(error) = &result.error {
        tracing::error!("Simulation aborted: {error}");
    }
    for violation in &result.invariant_violations {
        tracing::error!("{violation}");
    }
    if !result.passed() {
        tracing::error!(seed = result.seed, "simulation failed");
        std::process::exit(1);
    }
}
