//! Malarix — drug property prediction for Plasmodium falciparum compounds.
//! Entry point for the CLI binary.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use malarix_models::ModelStore;
use malarix_pipeline::{PadelRunner, Pipeline, StructureSearchClient, Task};

const USAGE: &str = "usage: malarix <descriptors|activity|pic50|proteins> <SMILES>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("malarix=debug,info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (task_arg, smiles) = match (args.next(), args.next()) {
        (Some(t), Some(s)) => (t, s),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };
    let task: Task = match task_arg.parse() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    let config = match config::Config::load() {
        Ok(c) => {
            info!(models_dir = %c.models.dir, script = %c.generator.script, "configuration loaded");
            c
        }
        Err(e) => {
            tracing::warn!("Could not load malarix.toml: {e}");
            tracing::warn!("Continuing with built-in defaults.");
            config::Config {
                models: Default::default(),
                generator: Default::default(),
            }
        }
    };

    info!("Malarix {} starting", env!("CARGO_PKG_VERSION"));
    info!("Task: {task}");

    let runner = PadelRunner::new(
        &config.generator.script,
        Duration::from_secs(config.generator.timeout_secs),
    );
    let pipeline = Pipeline::new(
        Arc::new(runner),
        ModelStore::new(&config.models.dir),
        StructureSearchClient::new()?,
    );

    match pipeline.run(task, &smiles).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            tracing::error!("pipeline failed: {e}");
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}
