//! Orchestration for the Haunting simulation.
//!
//! This crate turns a [`SimulationConfig`] and a built house into a finished
//! run: it places the agents, gives each its own OS thread, waits for every
//! one of them, and folds their reports into a [`SimulationSummary`].
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration and validation ([`SimulationConfig`]).
//! - [`simulation`] -- The driver ([`Simulation`]) and its errors.
//! - [`summary`] -- Post-mortem report ([`SimulationSummary`]).

pub mod config;
pub mod simulation;
pub mod summary;

pub use config::{
    AgentsConfig, ConfigError, HunterSpec, LogFormat, LoggingConfig, RunConfig, SimulationConfig,
};
pub use simulation::{Simulation, SimulationError};
pub use summary::{Identification, SimulationSummary};

// Sinks are chosen by the caller of `Simulation::run`.
pub use haunting_agents::{EventSink, MemorySink, NullSink, TracingSink};
