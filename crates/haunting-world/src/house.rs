//! The house graph and the protocols that touch more than one room.
//!
//! [`HouseBuilder`] is the single-threaded construction phase: rooms are
//! created, connected symmetrically under the [`MAX_CONNECTED_ROOMS`] bound,
//! and the finished [`House`] is checked for connectivity. After that the
//! topology is frozen and the house is shared behind an `Arc`.
//!
//! # Locking
//!
//! - Topology (names, neighbor lists) is read without any lock.
//! - Single-room operations take that room's lock for one read-modify-write.
//! - Two-room moves take both locks in ascending [`RoomId`] order, whichever
//!   direction the mover travels. [`House::occupancy`] takes every lock in
//!   the same order. No code path acquires room locks in any other order, so
//!   movers in opposite directions cannot deadlock.
//!
//! [`MAX_CONNECTED_ROOMS`]: crate::room::MAX_CONNECTED_ROOMS

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::MutexGuard;

use haunting_types::{EvidenceType, GhostId, HunterId, RoomId};
use rand::Rng;
use tracing::debug;

use crate::error::WorldError;
use crate::room::{MAX_CONNECTED_ROOMS, Occupant, Room, RoomState};

// -----------------------------------------------------------------------
// Builder
// -----------------------------------------------------------------------

/// Single-threaded construction of a [`House`].
#[derive(Debug, Default)]
pub struct HouseBuilder {
    /// Rooms indexed by id.
    rooms: BTreeMap<RoomId, Room>,
    /// Room ids in creation order.
    order: Vec<RoomId>,
    /// Name -> id, for uniqueness and lookup.
    names: BTreeMap<String, RoomId>,
}

impl HouseBuilder {
    /// Start an empty house.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a room with no connections and an empty clue slot.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateRoomName`] if the name is taken.
    pub fn create_room(&mut self, name: &str) -> Result<RoomId, WorldError> {
        if self.names.contains_key(name) {
            return Err(WorldError::DuplicateRoomName(name.to_owned()));
        }
        let room = Room::new(name);
        let id = room.id();
        self.names.insert(name.to_owned(), id);
        self.order.push(id);
        self.rooms.insert(id, room);
        Ok(id)
    }

    /// Connect two rooms in both directions.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TooManyConnections`] if either room is already
    /// at [`MAX_CONNECTED_ROOMS`]; neither room is modified in that case.
    /// Also rejects unknown rooms, self-connections and duplicate edges.
    pub fn connect_rooms(&mut self, a: RoomId, b: RoomId) -> Result<(), WorldError> {
        let room_a = self.rooms.get(&a).ok_or(WorldError::RoomNotFound(a))?;
        let room_b = self.rooms.get(&b).ok_or(WorldError::RoomNotFound(b))?;

        if a == b {
            return Err(WorldError::SelfConnection(room_a.name().to_owned()));
        }
        if room_a.is_connected_to(b) {
            return Err(WorldError::DuplicateConnection {
                a: room_a.name().to_owned(),
                b: room_b.name().to_owned(),
            });
        }
        for room in [room_a, room_b] {
            if !room.has_free_connection() {
                return Err(WorldError::TooManyConnections {
                    room: room.name().to_owned(),
                    max: MAX_CONNECTED_ROOMS,
                });
            }
        }

        if let Some(room) = self.rooms.get_mut(&a) {
            room.push_neighbor(b);
        }
        if let Some(room) = self.rooms.get_mut(&b) {
            room.push_neighbor(a);
        }
        Ok(())
    }

    /// Look up a created room by name.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownRoomName`] if no room has that name.
    pub fn room_id(&self, name: &str) -> Result<RoomId, WorldError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| WorldError::UnknownRoomName(name.to_owned()))
    }

    /// [`connect_rooms`](Self::connect_rooms) addressed by room names.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownRoomName`] for an unknown name, otherwise
    /// whatever [`connect_rooms`](Self::connect_rooms) returns.
    pub fn connect_by_name(&mut self, a: &str, b: &str) -> Result<(), WorldError> {
        let a = self.room_id(a)?;
        let b = self.room_id(b)?;
        self.connect_rooms(a, b)
    }

    /// Freeze the topology.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Empty`] for a house without rooms,
    /// [`WorldError::RoomNotFound`] if `entry` is unknown, and
    /// [`WorldError::Disconnected`] if any room is unreachable from `entry`.
    pub fn build(self, entry: RoomId) -> Result<House, WorldError> {
        if self.rooms.is_empty() {
            return Err(WorldError::Empty);
        }
        if !self.rooms.contains_key(&entry) {
            return Err(WorldError::RoomNotFound(entry));
        }

        let house = House {
            rooms: self.rooms,
            order: self.order,
            names: self.names,
            entry,
        };

        let reached = house.reachable_from(entry);
        let unreachable = house.rooms.len().saturating_sub(reached);
        if unreachable > 0 {
            return Err(WorldError::Disconnected { unreachable });
        }

        debug!(rooms = house.len(), entry = %entry, "House built");
        Ok(house)
    }
}

// -----------------------------------------------------------------------
// House
// -----------------------------------------------------------------------

/// The frozen room graph plus per-room shared state.
#[derive(Debug)]
pub struct House {
    /// Rooms indexed by id.
    rooms: BTreeMap<RoomId, Room>,
    /// Room ids in creation order.
    order: Vec<RoomId>,
    /// Name -> id.
    names: BTreeMap<String, RoomId>,
    /// Where hunters start.
    entry: RoomId,
}

/// A consistent view of every occupancy slot at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancySnapshot {
    /// Every room each hunter appears in.
    pub hunters: BTreeMap<HunterId, Vec<RoomId>>,
    /// Every `(ghost, room)` pair found.
    pub ghosts: Vec<(GhostId, RoomId)>,
}

impl OccupancySnapshot {
    /// Whether every hunter appears in exactly one room and at most one
    /// ghost slot is filled.
    pub fn is_consistent(&self) -> bool {
        self.hunters.values().all(|rooms| rooms.len() == 1) && self.ghosts.len() <= 1
    }

    /// The single room holding `hunter`, if exactly one does.
    pub fn hunter_room(&self, hunter: HunterId) -> Option<RoomId> {
        match self.hunters.get(&hunter).map(Vec::as_slice) {
            Some([room]) => Some(*room),
            _ => None,
        }
    }
}

impl House {
    /// The hunters' entry room.
    pub const fn entry(&self) -> RoomId {
        self.entry
    }

    /// Number of rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether the house has no rooms. Never true for a built house.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Room ids in creation order.
    pub fn room_ids(&self) -> &[RoomId] {
        &self.order
    }

    /// Look up a room.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    /// Look up a room by its display name.
    pub fn room_by_name(&self, name: &str) -> Option<&Room> {
        self.names.get(name).and_then(|id| self.rooms.get(id))
    }

    /// Iterate over rooms in creation order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.order.iter().filter_map(|id| self.rooms.get(id))
    }

    fn get(&self, id: RoomId) -> Result<&Room, WorldError> {
        self.rooms.get(&id).ok_or(WorldError::RoomNotFound(id))
    }

    /// Display name of a room, or `"?"` for an unknown id.
    pub fn name_of(&self, id: RoomId) -> &str {
        self.rooms.get(&id).map_or("?", Room::name)
    }

    /// Rooms directly connected to `id`. Lock-free.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RoomNotFound`] if the room is unknown.
    pub fn neighbors(&self, id: RoomId) -> Result<&[RoomId], WorldError> {
        Ok(self.get(id)?.neighbors())
    }

    /// A uniformly chosen neighbor of `id`, or `id` itself when the room has
    /// no connections.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RoomNotFound`] if the room is unknown.
    pub fn random_neighbor<R: Rng + ?Sized>(
        &self,
        id: RoomId,
        rng: &mut R,
    ) -> Result<RoomId, WorldError> {
        let neighbors = self.get(id)?.neighbors();
        if neighbors.is_empty() {
            return Ok(id);
        }
        let idx = rng.random_range(0..neighbors.len());
        Ok(neighbors.get(idx).copied().unwrap_or(id))
    }

    /// Count of rooms reachable from `start`, including `start`.
    fn reachable_from(&self, start: RoomId) -> usize {
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            let Some(room) = self.rooms.get(&current) else {
                continue;
            };
            for next in room.neighbors() {
                if seen.insert(*next) {
                    queue.push_back(*next);
                }
            }
        }
        seen.len()
    }

    // -------------------------------------------------------------------
    // Occupancy
    // -------------------------------------------------------------------

    /// Put `occupant` into `room`. Used once per agent before it starts.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::GhostSlotTaken`] or
    /// [`WorldError::AlreadyPresent`] if the slot cannot be filled.
    pub fn place(&self, occupant: Occupant, room: RoomId) -> Result<(), WorldError> {
        let target = self.get(room)?;
        let mut state = target.lock();
        if state.admit(occupant) {
            return Ok(());
        }
        Err(refusal(&state, occupant, room))
    }

    /// Clear `occupant`'s slot in `room`. Agents call this on termination.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotPresent`] if the occupant is not there.
    pub fn remove(&self, occupant: Occupant, room: RoomId) -> Result<(), WorldError> {
        let target = self.get(room)?;
        if target.lock().release(occupant) {
            return Ok(());
        }
        Err(WorldError::NotPresent { occupant, room })
    }

    /// Clear `occupant` from whichever rooms hold it, without knowing where
    /// it is. Returns whether any slot was cleared.
    ///
    /// Rooms are locked one at a time, so this never waits on a second lock
    /// while holding the first. Only the occupant's own agent (or whoever
    /// placed it, before the agent started) may call this.
    pub fn evict(&self, occupant: Occupant) -> bool {
        let mut cleared = false;
        for room in self.rooms.values() {
            if room.lock().release(occupant) {
                debug!(%occupant, room = room.name(), "Occupant evicted");
                cleared = true;
            }
        }
        cleared
    }

    /// Move `occupant` from `from` to `to` atomically with respect to both
    /// rooms.
    ///
    /// Both room locks are held for the duration of the swap and acquired in
    /// ascending [`RoomId`] order. Moving into the current room is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotPresent`] if the occupant is not in `from`,
    /// or the admission error if `to` cannot take it. Nothing changes on
    /// error.
    pub fn move_occupant(
        &self,
        occupant: Occupant,
        from: RoomId,
        to: RoomId,
    ) -> Result<(), WorldError> {
        let source = self.get(from)?;
        if from == to {
            if source.lock().contains(occupant) {
                return Ok(());
            }
            return Err(WorldError::NotPresent { occupant, room: from });
        }
        let target = self.get(to)?;

        let (mut src, mut dst) = lock_pair(source, target);
        if !src.contains(occupant) {
            return Err(WorldError::NotPresent { occupant, room: from });
        }
        if !dst.admit(occupant) {
            return Err(refusal(&dst, occupant, to));
        }
        src.release(occupant);
        Ok(())
    }

    /// Write a clue into `room` if its slot is empty. Returns whether the
    /// clue was written.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RoomNotFound`] if the room is unknown.
    pub fn leave_evidence(&self, room: RoomId, evidence: EvidenceType) -> Result<bool, WorldError> {
        Ok(self.get(room)?.lock().leave_evidence(evidence))
    }

    /// Take the clue from `room` if it matches `specialty` and the ghost is
    /// present. Returns whether the clue was taken.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RoomNotFound`] if the room is unknown.
    pub fn take_evidence(&self, room: RoomId, specialty: EvidenceType) -> Result<bool, WorldError> {
        Ok(self.get(room)?.lock().take_evidence(specialty))
    }

    /// Whether the ghost is in `room`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RoomNotFound`] if the room is unknown.
    pub fn ghost_present(&self, room: RoomId) -> Result<bool, WorldError> {
        Ok(self.get(room)?.lock().has_ghost())
    }

    /// Whether any hunter is in `room`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RoomNotFound`] if the room is unknown.
    pub fn hunters_present(&self, room: RoomId) -> Result<bool, WorldError> {
        Ok(self.get(room)?.lock().has_hunters())
    }

    /// The pending clue in `room`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RoomNotFound`] if the room is unknown.
    pub fn evidence_in(&self, room: RoomId) -> Result<Option<EvidenceType>, WorldError> {
        Ok(self.get(room)?.lock().evidence())
    }

    /// Take every room lock in ascending id order and record all occupancy
    /// slots, giving a view of a single instant even while agents run.
    pub fn occupancy(&self) -> OccupancySnapshot {
        // BTreeMap iteration is ascending by RoomId, the global lock order.
        let guards: Vec<(RoomId, MutexGuard<'_, RoomState>)> =
            self.rooms.iter().map(|(id, room)| (*id, room.lock())).collect();

        let mut snapshot = OccupancySnapshot::default();
        for (id, state) in &guards {
            for hunter in state.hunters() {
                snapshot.hunters.entry(*hunter).or_default().push(*id);
            }
            if let Some(ghost) = state.ghost() {
                snapshot.ghosts.push((ghost, *id));
            }
        }
        snapshot
    }
}

/// Lock two distinct rooms in ascending id order and return the guards in
/// argument order.
fn lock_pair<'a>(
    first: &'a Room,
    second: &'a Room,
) -> (MutexGuard<'a, RoomState>, MutexGuard<'a, RoomState>) {
    if first.id() < second.id() {
        let a = first.lock();
        let b = second.lock();
        (a, b)
    } else {
        let b = second.lock();
        let a = first.lock();
        (a, b)
    }
}

/// Explain why `state` refused to admit `occupant`.
fn refusal(state: &RoomState, occupant: Occupant, room: RoomId) -> WorldError {
    match occupant {
        Occupant::Ghost(_) if !state.contains(occupant) => WorldError::GhostSlotTaken(room),
        _ => WorldError::AlreadyPresent { occupant, room },
    }
}
