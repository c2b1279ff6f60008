//! Agent state machines and the shared evidence they compete over.
//!
//! This crate holds everything that runs on an agent thread. Hunters and the
//! ghost never talk to each other directly: they only read and write the
//! house's per-room state and, for hunters, the process-wide
//! [`EvidenceRegistry`].
//!
//! # Modules
//!
//! - [`config`] -- Thresholds and tick pacing ([`AgentConfig`]).
//! - [`context`] -- [`AgentContext`], the bundle of shared handles every
//!   agent thread receives.
//! - [`error`] -- Error types for agent operations ([`AgentError`]).
//! - [`ghost`] -- The ghost state machine.
//! - [`hunter`] -- The hunter state machine.
//! - [`profile`] -- Which evidence each ghost class produces, and the
//!   identification function.
//! - [`registry`] -- The bounded, lock-guarded evidence set.
//! - [`sink`] -- [`EventSink`] trait and the stock sinks.

pub mod config;
pub mod context;
pub mod error;
pub mod ghost;
pub mod hunter;
pub mod profile;
pub mod registry;
pub mod sink;

// Re-export primary types at crate root for convenience.
pub use config::AgentConfig;
pub use context::AgentContext;
pub use error::AgentError;
pub use ghost::{Ghost, GhostAction, GhostReport, GhostStatus};
pub use hunter::{Hunter, HunterAction, HunterReport, HunterStatus};
pub use profile::{ghost_profile, identify_ghost, random_evidence};
pub use registry::{EvidenceRegistry, EvidenceSet, REGISTRY_CAPACITY, SUFFICIENT_EVIDENCE};
pub use sink::{EventSink, MemorySink, NullSink, TracingSink};
