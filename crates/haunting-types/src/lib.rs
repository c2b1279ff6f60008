//! Shared type definitions for the Haunting simulation.
//!
//! This crate contains no logic beyond small conversions. It defines the
//! vocabulary every other crate speaks: identifiers, the fixed evidence and
//! ghost class enumerations, and the event stream agents emit for logging
//! and presentation collaborators.
//!
//! # Modules
//!
//! - [`enums`] -- [`EvidenceType`], [`GhostClass`], and [`ExitReason`].
//! - [`events`] -- [`AgentEvent`] and its payloads.
//! - [`ids`] -- Type-safe UUID wrappers ([`RoomId`], [`HunterId`], [`GhostId`]).

pub mod enums;
pub mod events;
pub mod ids;

pub use enums::{EvidenceType, ExitReason, GhostClass};
pub use events::{Actor, AgentEvent, AgentEventKind};
pub use ids::{GhostId, HunterId, RoomId};
