//! The ghost state machine.
//!
//! The ghost ticks until it gets bored. Each tick it checks for hunters in
//! its room, resets or grows its boredom, then picks an action: with company
//! it may idle or leave evidence; alone it may also move. It never flees and
//! never solves anything.
//!
//! Evidence is written first-writer-wins: a pending clue is never replaced.

use std::thread;

use haunting_types::{Actor, AgentEvent, AgentEventKind, ExitReason, GhostClass, GhostId, RoomId};
use haunting_world::Occupant;
use rand::Rng;
use serde::Serialize;
use tracing::trace;

use crate::context::AgentContext;
use crate::error::AgentError;
use crate::profile;

/// One of the things the ghost can do in a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostAction {
    /// Do nothing.
    Idle,
    /// Drop a clue from the class profile into the current room.
    LeaveEvidence,
    /// Drift to a random neighboring room. Only taken when alone.
    Move,
}

impl GhostAction {
    /// Choose uniformly among the actions allowed given whether hunters
    /// share the room.
    pub fn random<R: Rng + ?Sized>(hunters_here: bool, rng: &mut R) -> Self {
        let choices: u8 = if hunters_here { 2 } else { 3 };
        match rng.random_range(0..choices) {
            0 => Self::Idle,
            1 => Self::LeaveEvidence,
            _ => Self::Move,
        }
    }
}

/// Whether the ghost is still haunting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostStatus {
    /// Still haunting.
    Active,
    /// Gave up; the only way a ghost stops.
    Terminated(ExitReason),
}

/// Final state of the ghost, produced when its thread ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GhostReport {
    /// The ghost's identity.
    pub id: GhostId,
    /// Its hidden class.
    pub class: GhostClass,
    /// Boredom at exit.
    pub boredom: u32,
    /// Ticks taken.
    pub ticks: u64,
    /// Clues successfully written into empty slots.
    pub evidence_left: u32,
    /// Why the ghost left.
    pub exit: ExitReason,
}

/// The ghost.
#[derive(Debug, Clone)]
pub struct Ghost {
    /// Identity, also the occupancy key.
    id: GhostId,
    /// Fixed at creation; hunters never see it.
    class: GhostClass,
    /// Current room, mirrored from the room's ghost slot.
    room: RoomId,
    /// Reset whenever a hunter shares the room.
    boredom: u32,
    /// Ticks taken so far.
    ticks: u64,
    /// Clues written so far.
    evidence_left: u32,
    /// Active or terminal.
    status: GhostStatus,
}

impl Ghost {
    /// Create the ghost and fill `room`'s ghost slot.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::World`] if the room is unknown or already
    /// haunted.
    pub fn enter(class: GhostClass, room: RoomId, ctx: &AgentContext) -> Result<Self, AgentError> {
        let ghost = Self {
            id: GhostId::new(),
            class,
            room,
            boredom: 0,
            ticks: 0,
            evidence_left: 0,
            status: GhostStatus::Active,
        };
        ctx.house.place(ghost.occupant(), room)?;
        Ok(ghost)
    }

    /// The ghost's identity.
    pub const fn id(&self) -> GhostId {
        self.id
    }

    /// The ghost's class.
    pub const fn class(&self) -> GhostClass {
        self.class
    }

    /// Current room.
    pub const fn room(&self) -> RoomId {
        self.room
    }

    /// Current boredom.
    pub const fn boredom(&self) -> u32 {
        self.boredom
    }

    /// Active or terminal.
    pub const fn status(&self) -> GhostStatus {
        self.status
    }

    const fn occupant(&self) -> Occupant {
        Occupant::Ghost(self.id)
    }

    fn emit(&self, ctx: &AgentContext, kind: AgentEventKind) {
        ctx.emit(AgentEvent::now(Actor::Ghost { id: self.id }, kind));
    }

    /// One tick with a randomly chosen action.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        ctx: &AgentContext,
        rng: &mut R,
    ) -> Result<GhostStatus, AgentError> {
        if self.status != GhostStatus::Active {
            return Ok(self.status);
        }
        let hunters_here = ctx.house.hunters_present(self.room)?;
        let action = GhostAction::random(hunters_here, rng);
        self.step_observed(action, hunters_here, ctx, rng)
    }

    /// One tick with the given action. `Move` is ignored while a hunter
    /// shares the room. A terminated ghost does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::World`] if the house disagrees with the
    /// ghost's idea of where it is.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        action: GhostAction,
        ctx: &AgentContext,
        rng: &mut R,
    ) -> Result<GhostStatus, AgentError> {
        if self.status != GhostStatus::Active {
            return Ok(self.status);
        }
        let hunters_here = ctx.house.hunters_present(self.room)?;
        self.step_observed(action, hunters_here, ctx, rng)
    }

    fn step_observed<R: Rng + ?Sized>(
        &mut self,
        action: GhostAction,
        hunters_here: bool,
        ctx: &AgentContext,
        rng: &mut R,
    ) -> Result<GhostStatus, AgentError> {
        self.ticks = self.ticks.saturating_add(1);
        if hunters_here {
            self.boredom = 0;
        } else {
            self.boredom = self.boredom.saturating_add(1);
        }
        trace!(?action, hunters_here, boredom = self.boredom, "Ghost tick");

        match action {
            GhostAction::Idle => {}
            GhostAction::LeaveEvidence => self.leave_evidence(ctx, rng)?,
            GhostAction::Move => {
                if !hunters_here {
                    self.drift(ctx, rng)?;
                }
            }
        }

        if self.boredom >= ctx.config.boredom_max {
            ctx.house.remove(self.occupant(), self.room)?;
            self.status = GhostStatus::Terminated(ExitReason::GaveUp);
            self.emit(ctx, AgentEventKind::Terminated { reason: ExitReason::GaveUp });
        }
        Ok(self.status)
    }

    fn leave_evidence<R: Rng + ?Sized>(&mut self, ctx: &AgentContext, rng: &mut R) -> Result<(), AgentError> {
        let evidence = profile::random_evidence(self.class, rng);
        if ctx.house.leave_evidence(self.room, evidence)? {
            self.evidence_left = self.evidence_left.saturating_add(1);
            self.emit(
                ctx,
                AgentEventKind::LeftEvidence {
                    evidence,
                    room: ctx.house.name_of(self.room).to_owned(),
                },
            );
        }
        Ok(())
    }

    fn drift<R: Rng + ?Sized>(&mut self, ctx: &AgentContext, rng: &mut R) -> Result<(), AgentError> {
        let next = ctx.house.random_neighbor(self.room, rng)?;
        if next == self.room {
            return Ok(());
        }
        ctx.house.move_occupant(self.occupant(), self.room, next)?;
        self.room = next;
        self.emit(
            ctx,
            AgentEventKind::Moved {
                room: ctx.house.name_of(next).to_owned(),
            },
        );
        Ok(())
    }

    /// Snapshot of the final state.
    pub const fn report(&self, exit: ExitReason) -> GhostReport {
        GhostReport {
            id: self.id,
            class: self.class,
            boredom: self.boredom,
            ticks: self.ticks,
            evidence_left: self.evidence_left,
            exit,
        }
    }

    /// Tick until bored, pausing `config.ghost_tick` between ticks. The
    /// ghost's slot is cleared however the loop ends.
    ///
    /// # Errors
    ///
    /// Propagates the first [`AgentError`] from a tick.
    pub fn run<R: Rng + ?Sized>(
        mut self,
        ctx: &AgentContext,
        rng: &mut R,
    ) -> Result<GhostReport, AgentError> {
        let _slot = ctx.occupancy_guard(self.occupant());
        self.emit(
            ctx,
            AgentEventKind::GhostInitialized {
                class: self.class,
                room: ctx.house.name_of(self.room).to_owned(),
            },
        );
        loop {
            if let GhostStatus::Terminated(reason) = self.tick(ctx, rng)? {
                return Ok(self.report(reason));
            }
            thread::sleep(ctx.config.ghost_tick);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use haunting_types::{EvidenceType, HunterId};
    use haunting_world::HouseBuilder;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::AgentConfig;
    use crate::registry::EvidenceRegistry;
    use crate::sink::{EventSink, MemorySink};

    fn context(n: usize, boredom_max: u32) -> (AgentContext, Arc<MemorySink>, Vec<RoomId>) {
        let mut builder = HouseBuilder::new();
        let rooms: Vec<RoomId> = (0..n)
            .map(|i| builder.create_room(&format!("Room {i}")).unwrap())
            .collect();
        for pair in rooms.windows(2) {
            if let [a, b] = pair {
                assert!(builder.connect_rooms(*a, *b).is_ok());
            }
        }
        let entry = rooms.first().copied().unwrap_or_default();
        let house = builder.build(entry).unwrap();
        let sink = Arc::new(MemorySink::new());
        let ctx = AgentContext::new(
            Arc::new(house),
            Arc::new(EvidenceRegistry::new()),
            Arc::clone(&sink) as Arc<dyn EventSink>,
            AgentConfig::unpaced(10, boredom_max),
        );
        (ctx, sink, rooms)
    }

    #[test]
    fn lonely_ghost_gives_up_after_exactly_boredom_max_ticks() {
        let (ctx, sink, rooms) = context(4, 25);
        let start = rooms.get(2).copied().unwrap_or_default();
        let ghost = Ghost::enter(GhostClass::Banshee, start, &ctx).unwrap();
        let mut rng = SmallRng::seed_from_u64(9);
        let report = ghost.run(&ctx, &mut rng).unwrap();
        assert_eq!(report.exit, ExitReason::GaveUp);
        assert_eq!(report.ticks, 25);
        assert_eq!(report.boredom, 25);
        assert!(ctx.house.occupancy().ghosts.is_empty());
        assert!(sink.events().last().is_some_and(AgentEvent::is_terminal));
    }

    #[test]
    fn evidence_comes_from_profile_and_never_overwrites() {
        let (ctx, _, rooms) = context(1, 1000);
        let only = rooms.first().copied().unwrap_or_default();
        let mut ghost = Ghost::enter(GhostClass::Phantom, only, &ctx).unwrap();
        let mut rng = SmallRng::seed_from_u64(10);

        assert!(ghost.step(GhostAction::LeaveEvidence, &ctx, &mut rng).is_ok());
        let first = ctx.house.evidence_in(only).ok().flatten();
        assert!(first.is_some_and(|ev| profile::ghost_profile(GhostClass::Phantom).contains(&ev)));
        assert_ne!(first, Some(EvidenceType::Emf));

        for _ in 0..20 {
            assert!(ghost.step(GhostAction::LeaveEvidence, &ctx, &mut rng).is_ok());
            assert_eq!(ctx.house.evidence_in(only).ok().flatten(), first);
        }
        assert_eq!(ghost.report(ExitReason::GaveUp).evidence_left, 1);
    }

    #[test]
    fn hunter_company_resets_boredom_and_pins_ghost() {
        let (ctx, _, rooms) = context(2, 1000);
        let start = rooms.first().copied().unwrap_or_default();
        let mut ghost = Ghost::enter(GhostClass::Bullies, start, &ctx).unwrap();
        let mut rng = SmallRng::seed_from_u64(12);

        assert!(ghost.step(GhostAction::Idle, &ctx, &mut rng).is_ok());
        assert_eq!(ghost.boredom(), 1);

        assert!(ctx.house.place(Occupant::Hunter(HunterId::new()), start).is_ok());
        assert!(ghost.step(GhostAction::Move, &ctx, &mut rng).is_ok());
        assert_eq!(ghost.boredom(), 0);
        assert_eq!(ghost.room(), start);
    }

    #[test]
    fn lonely_ghost_moves_to_neighbor() {
        let (ctx, sink, rooms) = context(2, 1000);
        let start = rooms.first().copied().unwrap_or_default();
        let other = rooms.get(1).copied().unwrap_or_default();
        let mut ghost = Ghost::enter(GhostClass::Poltergeist, start, &ctx).unwrap();
        let mut rng = SmallRng::seed_from_u64(13);
        assert!(ghost.step(GhostAction::Move, &ctx, &mut rng).is_ok());
        assert_eq!(ghost.room(), other);
        assert_eq!(ctx.house.ghost_present(other).ok(), Some(true));
        assert_eq!(ctx.house.ghost_present(start).ok(), Some(false));
        assert!(matches!(
            sink.events().last().map(|e| &e.kind),
            Some(AgentEventKind::Moved { room }) if room == "Room 1"
        ));
    }

    #[test]
    fn random_action_never_moves_with_company() {
        let mut rng = SmallRng::seed_from_u64(14);
        for _ in 0..500 {
            assert_ne!(GhostAction::random(true, &mut rng), GhostAction::Move);
        }
        let moved = (0..500).any(|_| GhostAction::random(false, &mut rng) == GhostAction::Move);
        assert!(moved);
    }

    struct FailOnHaunt;

    impl EventSink for FailOnHaunt {
        #[allow(clippy::panic)]
        fn emit(&self, event: AgentEvent) {
            if matches!(event.kind, AgentEventKind::GhostInitialized { .. }) {
                panic!("sink rejected event");
            }
        }
    }

    #[test]
    fn panicking_run_frees_ghost_slot() {
        let (ctx, _, rooms) = context(2, 1000);
        let ctx = AgentContext {
            sink: Arc::new(FailOnHaunt),
            ..ctx
        };
        let start = rooms.first().copied().unwrap();
        let ghost = Ghost::enter(GhostClass::Bullies, start, &ctx).unwrap();
        let worker_ctx = ctx.clone();
        let outcome = std::thread::spawn(move || {
            let mut rng = SmallRng::seed_from_u64(15);
            ghost.run(&worker_ctx, &mut rng)
        })
        .join();
        assert!(outcome.is_err());
        assert!(ctx.house.occupancy().ghosts.is_empty());
    }
}
