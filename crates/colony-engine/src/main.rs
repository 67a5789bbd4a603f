//! Colony engine binary.
//!
//! Runs one authoritative colony session and one client mirror in the same
//! process, connected by channels that carry JSON-encoded messages. A
//! scripted player drives the client through the usual first session: pick
//! a game mode, place the center, hire a colonist.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `colony-config.yaml` (or `$COLONY_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Load the save file, if any
//! 4. Build the session, client and world
//! 5. Run the tick loop until `engine.max_ticks`
//! 6. Write the save file and log the result

mod channel;
mod error;
mod player;
mod runner;
mod save;

use std::path::{Path, PathBuf};

use colony_core::ColonyConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::runner::ColonyEngine;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "colony-config.yaml";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`].
const CONFIG_ENV: &str = "COLONY_CONFIG";

/// Application entry point for the colony engine.
///
/// # Errors
///
/// Returns an error if configuration, the save file, or session setup fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path();
    let (config, config_found) = load_config(&config_path)?;

    init_logging(&config);
    info!("colony-engine starting");
    info!(
        path = %config_path.display(),
        found = config_found,
        tick_interval_ms = config.engine.tick_interval_ms,
        max_ticks = config.engine.max_ticks,
        seed = config.engine.seed,
        "Configuration loaded"
    );

    let save_path = PathBuf::from(&config.engine.save_path);
    let save = save::load(&save_path)?;

    let mut engine = ColonyEngine::new(&config, save.as_ref())?;
    info!(player = %engine.session().player(), "colony session ready");

    let summary = runner::run(&mut engine, config.engine.max_ticks, config.engine.tick_interval_ms).await;

    save::store(&save_path, &engine.session().serialize())?;
    info!(
        total_ticks = summary.total_ticks,
        center = ?summary.client_center,
        population = summary.client_population,
        "colony-engine finished"
    );
    Ok(())
}

fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist. Returns whether the file was found.
fn load_config(path: &Path) -> Result<(ColonyConfig, bool), EngineError> {
    if path.exists() {
        Ok((ColonyConfig::from_file(path)?, true))
    } else {
        Ok((ColonyConfig::default(), false))
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_logging(config: &ColonyConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
