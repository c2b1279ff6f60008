//! The haunted house: rooms, their connections, and their shared state.
//!
//! The house is a fixed undirected graph of rooms built once on a single
//! thread, then shared read-mostly between agent threads. Connectivity never
//! changes after [`HouseBuilder::build`]. Each room additionally owns a small
//! block of mutable state (a pending clue plus hunter and ghost occupancy)
//! behind its own mutex.
//!
//! # Modules
//!
//! - [`error`] -- Error types for house construction and occupancy.
//! - [`house`] -- [`HouseBuilder`] and the shared [`House`] graph, including
//!   the two-room move protocol.
//! - [`room`] -- [`Room`] nodes and their lock-guarded [`RoomState`].
//! - [`starting_house`] -- The default 13-room house with the Van as entry.
//!
//! [`Room`]: room::Room
//! [`RoomState`]: room::RoomState

pub mod error;
pub mod house;
pub mod room;
pub mod starting_house;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use house::{House, HouseBuilder, OccupancySnapshot};
pub use room::{MAX_CONNECTED_ROOMS, Occupant, Room, RoomState};
pub use starting_house::{ENTRY_ROOM_NAME, create_default_house};
