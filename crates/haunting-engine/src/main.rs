//! Engine binary for the Haunting simulation.
//!
//! Runs one haunting from start to finish and prints the final report.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `haunting-config.yaml` (or the path given as
//!    the first argument), falling back to defaults when the file is absent
//! 2. Initialize structured logging (tracing)
//! 3. Build the default house
//! 4. Set up the simulation: ghost class, ghost room, seed
//! 5. Run every agent to completion
//! 6. Print the report to stdout, as text or as JSON with `--json`

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use haunting_core::{LogFormat, Simulation, SimulationConfig, TracingSink};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const CONFIG_FILE: &str = "haunting-config.yaml";

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "haunting-engine")]
#[command(about = "Run one haunting and print the final report", long_about = None)]
#[command(version)]
struct Cli {
    /// YAML configuration file; defaults are used when it does not exist
    #[arg(default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the config is invalid, the house cannot be built, or
/// an agent thread fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config;

    // 1. Load configuration.
    let (config, from_file) = load_config(&config_path)?;

    // 2. Initialize structured logging. RUST_LOG overrides the config level.
    init_logging(&config);
    info!("haunting-engine starting");
    if from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }

    // 3. Build the house.
    let house = haunting_world::create_default_house().map_err(EngineError::from)?;
    info!(rooms = house.len(), entry = house.name_of(house.entry()), "House built");

    // 4. Set up the simulation.
    let simulation = Simulation::new(config, house).map_err(EngineError::from)?;
    info!(
        seed = simulation.seed(),
        ghost_room = simulation.house().name_of(simulation.ghost_room()),
        "Simulation ready"
    );

    // 5. Run.
    let summary = simulation.run(Arc::new(TracingSink)).map_err(EngineError::from)?;

    // 6. Report.
    if cli.json {
        let json = serde_json::to_string_pretty(&summary).map_err(EngineError::from)?;
        println!("{json}");
    } else {
        println!("{summary}");
    }
    Ok(())
}

/// Load configuration from `path`, or defaults if it does not exist.
///
/// The flag is `true` when the file was read.
fn load_config(path: &std::path::Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}

/// Install the global tracing subscriber.
fn init_logging(config: &SimulationConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .with_writer(std::io::stderr);
    match config.logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_shipped_config() {
        let cli = Cli::try_parse_from(["haunting-engine"]);
        assert!(cli.is_ok_and(|c| c.config == PathBuf::from(CONFIG_FILE) && !c.json));
    }

    #[test]
    fn cli_takes_path_and_json_flag() {
        let cli = Cli::try_parse_from(["haunting-engine", "--json", "custom.yaml"]);
        assert!(cli.is_ok_and(|c| c.config == PathBuf::from("custom.yaml") && c.json));
    }

    #[test]
    fn cli_rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["haunting-engine", "--jsn"]).is_err());
        let help = Cli::try_parse_from(["haunting-engine", "--help"]);
        assert!(help.is_err_and(|e| e.kind() == clap::error::ErrorKind::DisplayHelp));
    }

    #[test]
    fn missing_config_file_means_defaults() {
        let loaded = load_config(std::path::Path::new("does-not-exist/haunting-config.yaml"));
        assert!(loaded.is_ok_and(|(config, from_file)| !from_file && config == SimulationConfig::default()));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../haunting-config.yaml");
        let loaded = load_config(&path);
        assert!(loaded.is_ok_and(|(config, from_file)| from_file && config == SimulationConfig::default()));
    }
}
