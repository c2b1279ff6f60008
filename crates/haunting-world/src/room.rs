//! Room nodes and their lock-guarded mutable state.
//!
//! A [`Room`] splits into two halves. The identity and neighbor list are
//! fixed once the house is built and are read without synchronization. The
//! [`RoomState`] (pending clue, hunters present, ghost present) is only ever
//! touched through [`Room::lock`].

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use haunting_types::{EvidenceType, GhostId, HunterId, RoomId};

/// Maximum number of rooms any single room may connect to.
pub const MAX_CONNECTED_ROOMS: usize = 5;

/// Something that can stand in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Occupant {
    /// A hunter, keyed by identity.
    Hunter(HunterId),
    /// The ghost.
    Ghost(GhostId),
}

impl core::fmt::Display for Occupant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Hunter(id) => write!(f, "hunter {id}"),
            Self::Ghost(id) => write!(f, "ghost {id}"),
        }
    }
}

/// Mutable per-room state. Always accessed under the owning room's lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomState {
    /// The pending clue, if any.
    evidence: Option<EvidenceType>,
    /// Hunters currently in the room.
    hunters: BTreeSet<HunterId>,
    /// The ghost, if it is here.
    ghost: Option<GhostId>,
}

impl RoomState {
    /// The pending clue, if any.
    pub const fn evidence(&self) -> Option<EvidenceType> {
        self.evidence
    }

    /// Hunters currently in the room.
    pub const fn hunters(&self) -> &BTreeSet<HunterId> {
        &self.hunters
    }

    /// The ghost, if present.
    pub const fn ghost(&self) -> Option<GhostId> {
        self.ghost
    }

    /// Whether the ghost is here.
    pub const fn has_ghost(&self) -> bool {
        self.ghost.is_some()
    }

    /// Whether at least one hunter is here.
    pub fn has_hunters(&self) -> bool {
        !self.hunters.is_empty()
    }

    /// Whether the given occupant is here.
    pub fn contains(&self, occupant: Occupant) -> bool {
        match occupant {
            Occupant::Hunter(id) => self.hunters.contains(&id),
            Occupant::Ghost(id) => self.ghost == Some(id),
        }
    }

    /// Write a clue into an empty slot. An existing clue is never
    /// overwritten; returns whether the write happened.
    pub fn leave_evidence(&mut self, evidence: EvidenceType) -> bool {
        if self.evidence.is_some() {
            return false;
        }
        self.evidence = Some(evidence);
        true
    }

    /// Clear the slot if it holds `specialty` and the ghost is present.
    /// Returns whether the clue was taken.
    pub fn take_evidence(&mut self, specialty: EvidenceType) -> bool {
        if self.has_ghost() && self.evidence == Some(specialty) {
            self.evidence = None;
            return true;
        }
        false
    }

    /// Record `occupant` as present.
    ///
    /// Returns `false` without changing anything if the occupant is already
    /// here, or if it is a ghost and the ghost slot is taken.
    pub fn admit(&mut self, occupant: Occupant) -> bool {
        match occupant {
            Occupant::Hunter(id) => self.hunters.insert(id),
            Occupant::Ghost(id) => {
                if self.ghost.is_some() {
                    return false;
                }
                self.ghost = Some(id);
                true
            }
        }
    }

    /// Clear `occupant`'s slot. Returns whether it was present.
    pub fn release(&mut self, occupant: Occupant) -> bool {
        match occupant {
            Occupant::Hunter(id) => self.hunters.remove(&id),
            Occupant::Ghost(id) => {
                if self.ghost == Some(id) {
                    self.ghost = None;
                    return true;
                }
                false
            }
        }
    }
}

/// A node in the house graph.
#[derive(Debug)]
pub struct Room {
    /// Stable identity, also the lock-ordering key.
    id: RoomId,
    /// Display name.
    name: String,
    /// Connected rooms in connection order. Immutable once built.
    neighbors: Vec<RoomId>,
    /// Pending clue and occupancy.
    state: Mutex<RoomState>,
}

impl Room {
    /// Allocate an unconnected room with an empty clue slot.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RoomId::new(),
            name: name.into(),
            neighbors: Vec::new(),
            state: Mutex::new(RoomState::default()),
        }
    }

    /// The room's identity.
    pub const fn id(&self) -> RoomId {
        self.id
    }

    /// The room's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rooms directly connected to this one.
    pub fn neighbors(&self) -> &[RoomId] {
        &self.neighbors
    }

    /// Number of connected rooms.
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether this room connects directly to `other`.
    pub fn is_connected_to(&self, other: RoomId) -> bool {
        self.neighbors.contains(&other)
    }

    /// Whether another connection fits under [`MAX_CONNECTED_ROOMS`].
    pub fn has_free_connection(&self) -> bool {
        self.neighbors.len() < MAX_CONNECTED_ROOMS
    }

    /// Append a neighbor. Only the house builder calls this, before the
    /// room is shared.
    pub(crate) fn push_neighbor(&mut self, other: RoomId) {
        self.neighbors.push(other);
    }

    /// Lock the room's mutable state.
    ///
    /// Every critical section on room state is a constant-size field update
    /// that cannot leave the state half-written, so a poisoned lock is
    /// recovered rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, RoomState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
