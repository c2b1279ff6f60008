//! Error types for the `haunting-world` crate.
//!
//! Construction errors ([`WorldError::TooManyConnections`] and friends) are
//! invariant violations of the static house layout; callers are expected to
//! abort the run when they see one. Occupancy errors indicate an agent
//! referring to a room it is not in.

use haunting_types::RoomId;

use crate::room::Occupant;

/// Errors that can occur while building or mutating the house.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A room was not found in the house.
    #[error("room not found: {0}")]
    RoomNotFound(RoomId),

    /// No room with this name exists.
    #[error("unknown room name: {0}")]
    UnknownRoomName(String),

    /// A room name was used twice.
    #[error("duplicate room name: {0}")]
    DuplicateRoomName(String),

    /// Connecting the rooms would exceed the per-room connection bound.
    #[error("cannot connect {room}: already has {max} connected rooms")]
    TooManyConnections {
        /// Name of the room that is full.
        room: String,
        /// The connection bound.
        max: usize,
    },

    /// A room cannot be connected to itself.
    #[error("cannot connect room {0} to itself")]
    SelfConnection(String),

    /// The two rooms are already connected.
    #[error("rooms {a} and {b} are already connected")]
    DuplicateConnection {
        /// First room name.
        a: String,
        /// Second room name.
        b: String,
    },

    /// Some rooms cannot be reached from the entry room.
    #[error("house is not connected: {unreachable} room(s) unreachable from the entry")]
    Disconnected {
        /// How many rooms could not be reached.
        unreachable: usize,
    },

    /// The house has no rooms.
    #[error("house has no rooms")]
    Empty,

    /// The occupant is already present somewhere in the room.
    #[error("{occupant} is already in room {room}")]
    AlreadyPresent {
        /// The occupant.
        occupant: Occupant,
        /// The room.
        room: RoomId,
    },

    /// The room already holds a ghost.
    #[error("room {0} is already haunted")]
    GhostSlotTaken(RoomId),

    /// The occupant is not present in the specified room.
    #[error("{occupant} is not in room {room}")]
    NotPresent {
        /// The occupant.
        occupant: Occupant,
        /// The room.
        room: RoomId,
    },
}
