//! Agent events emitted for logging and presentation collaborators.
//!
//! Every agent produces a sequence of discrete [`AgentEvent`]s over its life:
//! one initialization event, any number of moves, evidence drops, evidence
//! pickups and reviews, and exactly one termination event. Text formatting of
//! these events is left to whoever consumes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{EvidenceType, ExitReason, GhostClass};
use crate::ids::{GhostId, HunterId};

/// The agent an event belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Actor {
    /// A hunter, identified by id and display name.
    Hunter {
        /// The hunter's identity.
        id: HunterId,
        /// The hunter's display name.
        name: String,
    },
    /// The ghost.
    Ghost {
        /// The ghost's identity.
        id: GhostId,
    },
}

impl Actor {
    /// Short label for log lines: the hunter's name or `"ghost"`.
    pub fn label(&self) -> &str {
        match self {
            Self::Hunter { name, .. } => name,
            Self::Ghost { .. } => "ghost",
        }
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentEventKind {
    /// A hunter started, carrying equipment for `specialty`.
    HunterInitialized {
        /// The hunter's evidence specialty.
        specialty: EvidenceType,
        /// Name of the starting room.
        room: String,
    },
    /// The ghost started.
    GhostInitialized {
        /// The ghost's hidden class.
        class: GhostClass,
        /// Name of the starting room.
        room: String,
    },
    /// The agent moved into `room`.
    Moved {
        /// Name of the destination room.
        room: String,
    },
    /// The ghost left a clue in `room`.
    LeftEvidence {
        /// The clue that was left.
        evidence: EvidenceType,
        /// Name of the room holding the clue.
        room: String,
    },
    /// A hunter picked up a clue from `room`.
    CollectedEvidence {
        /// The clue that was collected.
        evidence: EvidenceType,
        /// Name of the room the clue came from.
        room: String,
    },
    /// A hunter reviewed the shared evidence.
    Reviewed {
        /// Whether the evidence was sufficient to identify the ghost.
        sufficient: bool,
    },
    /// The agent stopped for good.
    Terminated {
        /// Why the agent stopped.
        reason: ExitReason,
    },
}

/// A single timestamped event from one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEvent {
    /// Wall-clock time the event was produced.
    pub at: DateTime<Utc>,
    /// The agent that produced it.
    pub actor: Actor,
    /// What happened.
    pub kind: AgentEventKind,
}

impl AgentEvent {
    /// Build an event stamped with the current time.
    pub fn now(actor: Actor, kind: AgentEventKind) -> Self {
        Self {
            at: Utc::now(),
            actor,
            kind,
        }
    }

    /// Whether this is a termination event.
    pub const fn is_terminal(&self) -> bool {
        matches!(self.kind, AgentEventKind::Terminated { .. })
    }
}
