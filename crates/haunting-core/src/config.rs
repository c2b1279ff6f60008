//! Configuration loading and typed config structures for the Haunting
//! simulation.
//!
//! The configuration lives in `haunting-config.yaml` next to the binary's
//! working directory. Every field has a default, so an absent file, an empty
//! file, and a partial file are all valid; [`SimulationConfig::validate`]
//! catches values that parse but cannot run.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use haunting_agents::AgentConfig;
use haunting_agents::config::{DEFAULT_BOREDOM_MAX, DEFAULT_FEAR_MAX};
use haunting_types::{EvidenceType, GhostClass};
use haunting_world::ENTRY_ROOM_NAME;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes a run that cannot happen.
    #[error("invalid config: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `haunting-config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Seed, ghost class, and entry room.
    #[serde(default)]
    pub simulation: RunConfig,

    /// The hunting party, entered in order at the entry room.
    #[serde(default = "default_hunters")]
    pub hunters: Vec<HunterSpec>,

    /// Agent limits and pacing.
    #[serde(default)]
    pub agents: AgentsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulation: RunConfig::default(),
            hunters: default_hunters(),
            agents: AgentsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that parse but cannot run: no hunters,
    /// duplicate hunter names, zero thresholds, or a blank entry room.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hunters.is_empty() {
            return Err(invalid("at least one hunter is required"));
        }
        let mut names = BTreeSet::new();
        for hunter in &self.hunters {
            if hunter.name.trim().is_empty() {
                return Err(invalid("hunter names must not be blank"));
            }
            if !names.insert(hunter.name.as_str()) {
                return Err(invalid(format!("duplicate hunter name '{}'", hunter.name)));
            }
        }
        if self.agents.fear_max == 0 {
            return Err(invalid("agents.fear_max must be at least 1"));
        }
        if self.agents.boredom_max == 0 {
            return Err(invalid("agents.boredom_max must be at least 1"));
        }
        if self.simulation.entry_room.trim().is_empty() {
            return Err(invalid("simulation.entry_room must not be blank"));
        }
        Ok(())
    }

    /// Limits and pacing in the form agent threads consume.
    pub const fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            fear_max: self.agents.fear_max,
            boredom_max: self.agents.boredom_max,
            hunter_tick: Duration::from_millis(self.agents.hunter_tick_ms),
            ghost_tick: Duration::from_millis(self.agents.ghost_tick_ms),
        }
    }
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.into(),
    }
}

/// Run-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Fixed seed for a reproducible placement and agent RNGs. Thread
    /// interleaving still varies between runs.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Force the ghost's class; chosen uniformly when absent.
    #[serde(default)]
    pub ghost_class: Option<GhostClass>,

    /// Name of the room every hunter starts in.
    #[serde(default = "default_entry_room")]
    pub entry_room: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            ghost_class: None,
            entry_room: default_entry_room(),
        }
    }
}

/// One member of the hunting party.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HunterSpec {
    /// Display name, unique within the party.
    pub name: String,

    /// The only evidence type this hunter can collect.
    pub specialty: EvidenceType,
}

/// Agent limits and tick pauses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentsConfig {
    /// Fear at which a hunter flees.
    #[serde(default = "default_fear_max")]
    pub fear_max: u32,

    /// Boredom at which any agent gives up.
    #[serde(default = "default_boredom_max")]
    pub boredom_max: u32,

    /// Pause after each hunter tick, in milliseconds.
    #[serde(default = "default_hunter_tick_ms")]
    pub hunter_tick_ms: u64,

    /// Pause after each ghost tick, in milliseconds.
    #[serde(default = "default_ghost_tick_ms")]
    pub ghost_tick_ms: u64,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            fear_max: default_fear_max(),
            boredom_max: default_boredom_max(),
            hunter_tick_ms: default_hunter_tick_ms(),
            ghost_tick_ms: default_ghost_tick_ms(),
        }
    }
}

/// Log output shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_hunters() -> Vec<HunterSpec> {
    ["Egon", "Ray", "Peter", "Winston"]
        .into_iter()
        .zip(EvidenceType::ALL)
        .map(|(name, specialty)| HunterSpec {
            name: name.to_owned(),
            specialty,
        })
        .collect()
}

fn default_entry_room() -> String {
    ENTRY_ROOM_NAME.to_owned()
}

const fn default_fear_max() -> u32 {
    DEFAULT_FEAR_MAX
}

const fn default_boredom_max() -> u32 {
    DEFAULT_BOREDOM_MAX
}

const fn default_hunter_tick_ms() -> u64 {
    50
}

const fn default_ghost_tick_ms() -> u64 {
    6
}

fn default_log_level() -> String {
    "info".to_owned()
}
