//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode between reading the config and
//! printing the report, so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: haunting_core::ConfigError,
    },

    /// House construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: haunting_world::WorldError,
    },

    /// The run itself failed.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: haunting_core::SimulationError,
    },

    /// The summary could not be rendered as JSON.
    #[error("report error: {source}")]
    Report {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
