//! Error types for the haunting-agents crate.
//!
//! Ordinary misses (a clue that does not match, a full registry, a haunted
//! slot) are not errors; they are no-ops that report `false`. An
//! [`AgentError`] means an agent's view of the house disagrees with the
//! house itself, which is a bug rather than a game event.

use haunting_world::WorldError;

/// Errors that can occur while an agent acts.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// An occupancy or room lookup failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}
