//! The hunter state machine.
//!
//! A hunter ticks until it flees, gives up, or solves the case. Each tick:
//!
//! 1. Observe whether the ghost shares its room.
//! 2. Update: fear +1 and boredom reset if it does, otherwise boredom +1.
//! 3. Act: collect, move, or review, chosen uniformly.
//! 4. Check fear and boredom against their limits.
//!
//! The thread loop in [`Hunter::run`] adds a fixed pause after every tick.
//! That pause is the only point where a hunter yields; no lock is held
//! across it.
//!
//! Collection takes the room lock to clear the clue, releases it, and only
//! then takes the registry lock. The two are never held together.

use std::thread;

use haunting_types::{Actor, AgentEvent, AgentEventKind, EvidenceType, ExitReason, HunterId, RoomId};
use haunting_world::Occupant;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, trace};

use crate::context::AgentContext;
use crate::error::AgentError;

/// One of the three things a hunter can do in a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunterAction {
    /// Pick up a matching clue while the ghost is present.
    Collect,
    /// Walk to a random neighboring room.
    Move,
    /// Check whether the shared evidence is sufficient.
    Review,
}

impl HunterAction {
    /// Choose an action uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..3_u8) {
            0 => Self::Collect,
            1 => Self::Move,
            _ => Self::Review,
        }
    }
}

/// Whether a hunter is still acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunterStatus {
    /// Still in the house.
    Active,
    /// Stopped for good.
    Terminated(ExitReason),
}

/// Final state of a hunter, produced when its thread ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HunterReport {
    /// The hunter's identity.
    pub id: HunterId,
    /// Display name.
    pub name: String,
    /// Evidence the hunter could collect.
    pub specialty: EvidenceType,
    /// Fear at exit.
    pub fear: u32,
    /// Boredom at exit.
    pub boredom: u32,
    /// Ticks taken.
    pub ticks: u64,
    /// Why the hunter left.
    pub exit: ExitReason,
}

/// A ghost hunter.
#[derive(Debug, Clone)]
pub struct Hunter {
    /// Identity, also the occupancy key.
    id: HunterId,
    /// Display name.
    name: String,
    /// The only evidence type this hunter can collect.
    specialty: EvidenceType,
    /// Current room. The room's occupancy set is the source of truth; this
    /// field mirrors it and is only updated after a successful move.
    room: RoomId,
    /// Never decreases.
    fear: u32,
    /// Reset whenever the ghost is in the room.
    boredom: u32,
    /// Ticks taken so far.
    ticks: u64,
    /// Active or terminal.
    status: HunterStatus,
}

impl Hunter {
    /// Create a hunter and record it as present in `room`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::World`] if the room is unknown.
    pub fn enter(
        name: impl Into<String>,
        specialty: EvidenceType,
        room: RoomId,
        ctx: &AgentContext,
    ) -> Result<Self, AgentError> {
        let hunter = Self {
            id: HunterId::new(),
            name: name.into(),
            specialty,
            room,
            fear: 0,
            boredom: 0,
            ticks: 0,
            status: HunterStatus::Active,
        };
        ctx.house.place(hunter.occupant(), room)?;
        Ok(hunter)
    }

    /// The hunter's identity.
    pub const fn id(&self) -> HunterId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evidence specialty.
    pub const fn specialty(&self) -> EvidenceType {
        self.specialty
    }

    /// Current room.
    pub const fn room(&self) -> RoomId {
        self.room
    }

    /// Current fear.
    pub const fn fear(&self) -> u32 {
        self.fear
    }

    /// Current boredom.
    pub const fn boredom(&self) -> u32 {
        self.boredom
    }

    /// Active or terminal.
    pub const fn status(&self) -> HunterStatus {
        self.status
    }

    const fn occupant(&self) -> Occupant {
        Occupant::Hunter(self.id)
    }

    fn actor(&self) -> Actor {
        Actor::Hunter {
            id: self.id,
            name: self.name.clone(),
        }
    }

    fn emit(&self, ctx: &AgentContext, kind: AgentEventKind) {
        ctx.emit(AgentEvent::now(self.actor(), kind));
    }

    /// One tick with a uniformly chosen action.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        ctx: &AgentContext,
        rng: &mut R,
    ) -> Result<HunterStatus, AgentError> {
        let action = HunterAction::random(rng);
        self.step(action, ctx, rng)
    }

    /// One tick with the given action. A terminated hunter does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::World`] if the house disagrees with the
    /// hunter's idea of where it is.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        action: HunterAction,
        ctx: &AgentContext,
        rng: &mut R,
    ) -> Result<HunterStatus, AgentError> {
        if self.status != HunterStatus::Active {
            return Ok(self.status);
        }
        self.ticks = self.ticks.saturating_add(1);

        let ghost_here = ctx.house.ghost_present(self.room)?;
        if ghost_here {
            self.fear = self.fear.saturating_add(1);
            self.boredom = 0;
        } else {
            self.boredom = self.boredom.saturating_add(1);
        }
        trace!(hunter = %self.name, ?action, ghost_here, fear = self.fear, boredom = self.boredom, "Hunter tick");

        match action {
            HunterAction::Collect => {
                if ghost_here {
                    self.collect(ctx)?;
                }
            }
            HunterAction::Move => self.wander(ctx, rng)?,
            HunterAction::Review => {
                let sufficient = ctx.registry.is_sufficient();
                self.emit(ctx, AgentEventKind::Reviewed { sufficient });
                if sufficient {
                    return self.terminate(ctx, ExitReason::Solved);
                }
            }
        }

        if self.fear >= ctx.config.fear_max {
            return self.terminate(ctx, ExitReason::Fled);
        }
        if self.boredom >= ctx.config.boredom_max {
            return self.terminate(ctx, ExitReason::GaveUp);
        }
        Ok(HunterStatus::Active)
    }

    /// Take the room's clue if it matches, then register it.
    fn collect(&self, ctx: &AgentContext) -> Result<(), AgentError> {
        // Room lock is taken and released inside take_evidence.
        if !ctx.house.take_evidence(self.room, self.specialty)? {
            return Ok(());
        }
        self.emit(
            ctx,
            AgentEventKind::CollectedEvidence {
                evidence: self.specialty,
                room: ctx.house.name_of(self.room).to_owned(),
            },
        );
        let added = ctx.registry.try_add(self.specialty);
        debug!(hunter = %self.name, evidence = %self.specialty, added, "Evidence collected");
        Ok(())
    }

    /// Move to a random neighbor.
    fn wander<R: Rng + ?Sized>(&mut self, ctx: &AgentContext, rng: &mut R) -> Result<(), AgentError> {
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

    /// Leave the house for good.
    fn terminate(&mut self, ctx: &AgentContext, reason: ExitReason) -> Result<HunterStatus, AgentError> {
        ctx.house.remove(self.occupant(), self.room)?;
        self.status = HunterStatus::Terminated(reason);
        self.emit(ctx, AgentEventKind::Terminated { reason });
        Ok(self.status)
    }

    /// Snapshot of the final state.
    pub fn report(&self, exit: ExitReason) -> HunterReport {
        HunterReport {
            id: self.id,
            name: self.name.clone(),
            specialty: self.specialty,
            fear: self.fear,
            boredom: self.boredom,
            ticks: self.ticks,
            exit,
        }
    }

    /// Tick until terminal, pausing `config.hunter_tick` between ticks.
    ///
    /// The hunter's slot is cleared however the loop ends, including on an
    /// error or a panic in the event sink.
    ///
    /// # Errors
    ///
    /// Propagates the first [`AgentError`] from [`step`](Self::step).
    pub fn run<R: Rng + ?Sized>(
        mut self,
        ctx: &AgentContext,
        rng: &mut R,
    ) -> Result<HunterReport, AgentError> {
        let _slot = ctx.occupancy_guard(self.occupant());
        self.emit(
            ctx,
            AgentEventKind::HunterInitialized {
                specialty: self.specialty,
                room: ctx.house.name_of(self.room).to_owned(),
            },
        );
        loop {
            if let HunterStatus::Terminated(reason) = self.tick(ctx, rng)? {
                return Ok(self.report(reason));
            }
            thread::sleep(ctx.config.hunter_tick);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use haunting_types::GhostId;
    use haunting_world::{House, HouseBuilder};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::AgentConfig;
    use crate::registry::EvidenceRegistry;
    use crate::sink::MemorySink;

    struct Fixture {
        ctx: AgentContext,
        sink: Arc<MemorySink>,
        rooms: Vec<RoomId>,
    }

    /// A line of `n` rooms with the given limits.
    fn fixture(n: usize, fear_max: u32, boredom_max: u32) -> Fixture {
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
        let house: House = builder.build(entry).unwrap();
        let sink = Arc::new(MemorySink::new());
        let ctx = AgentContext::new(
            Arc::new(house),
            Arc::new(EvidenceRegistry::new()),
            Arc::clone(&sink) as Arc<dyn crate::sink::EventSink>,
            AgentConfig::unpaced(fear_max, boredom_max),
        );
        Fixture { ctx, sink, rooms }
    }

    fn room(f: &Fixture, i: usize) -> RoomId {
        f.rooms.get(i).copied().unwrap_or_default()
    }

    fn haunt(f: &Fixture, i: usize) {
        assert!(f.ctx.house.place(Occupant::Ghost(GhostId::new()), room(f, i)).is_ok());
    }

    fn hunter(f: &Fixture, specialty: EvidenceType, i: usize) -> Hunter {
        Hunter::enter("Egon", specialty, room(f, i), &f.ctx).unwrap()
    }

    #[test]
    fn collects_matching_clue_with_ghost_present() {
        let f = fixture(1, 10, 100);
        haunt(&f, 0);
        assert_eq!(f.ctx.house.leave_evidence(room(&f, 0), EvidenceType::Emf).ok(), Some(true));
        let mut h = hunter(&f, EvidenceType::Emf, 0);
        let mut rng = SmallRng::seed_from_u64(1);

        let status = h.step(HunterAction::Collect, &f.ctx, &mut rng);
        assert_eq!(status.ok(), Some(HunterStatus::Active));
        assert_eq!(f.ctx.house.evidence_in(room(&f, 0)).ok(), Some(None));
        assert_eq!(f.ctx.registry.collected(), vec![EvidenceType::Emf]);
        assert!(f.sink.events().iter().any(|e| matches!(
            e.kind,
            AgentEventKind::CollectedEvidence { evidence: EvidenceType::Emf, .. }
        )));
    }

    #[test]
    fn does_not_collect_without_ghost() {
        let f = fixture(1, 10, 100);
        assert_eq!(f.ctx.house.leave_evidence(room(&f, 0), EvidenceType::Emf).ok(), Some(true));
        let mut h = hunter(&f, EvidenceType::Emf, 0);
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(h.step(HunterAction::Collect, &f.ctx, &mut rng).is_ok());
        assert_eq!(f.ctx.house.evidence_in(room(&f, 0)).ok(), Some(Some(EvidenceType::Emf)));
        assert_eq!(f.ctx.registry.unique_count(), 0);
    }

    #[test]
    fn does_not_collect_other_specialty() {
        let f = fixture(1, 10, 100);
        haunt(&f, 0);
        assert_eq!(f.ctx.house.leave_evidence(room(&f, 0), EvidenceType::Sound).ok(), Some(true));
        let mut h = hunter(&f, EvidenceType::Emf, 0);
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(h.step(HunterAction::Collect, &f.ctx, &mut rng).is_ok());
        assert_eq!(f.ctx.house.evidence_in(room(&f, 0)).ok(), Some(Some(EvidenceType::Sound)));
        assert_eq!(f.ctx.registry.unique_count(), 0);
    }

    #[test]
    fn fear_rises_by_one_per_haunted_tick_and_flees_at_limit() {
        let f = fixture(1, 3, 100);
        haunt(&f, 0);
        let mut h = hunter(&f, EvidenceType::Emf, 0);
        let mut rng = SmallRng::seed_from_u64(2);

        for expected in 1..3 {
            let status = h.step(HunterAction::Collect, &f.ctx, &mut rng);
            assert_eq!(status.ok(), Some(HunterStatus::Active));
            assert_eq!(h.fear(), expected);
            assert_eq!(h.boredom(), 0);
        }
        let status = h.step(HunterAction::Collect, &f.ctx, &mut rng);
        assert_eq!(status.ok(), Some(HunterStatus::Terminated(ExitReason::Fled)));
        assert_eq!(h.fear(), 3);

        // Terminal: further steps change nothing.
        let again = h.step(HunterAction::Move, &f.ctx, &mut rng);
        assert_eq!(again.ok(), Some(HunterStatus::Terminated(ExitReason::Fled)));
        assert_eq!(h.fear(), 3);
        assert_eq!(h.report(ExitReason::Fled).ticks, 3);

        // Its occupancy slot is gone.
        assert_eq!(f.ctx.house.hunters_present(room(&f, 0)).ok(), Some(false));
    }

    #[test]
    fn boredom_grows_without_ghost_and_gives_up() {
        let f = fixture(1, 10, 4);
        let mut h = hunter(&f, EvidenceType::Sound, 0);
        let mut rng = SmallRng::seed_from_u64(3);
        for expected in 1..4 {
            assert_eq!(h.step(HunterAction::Collect, &f.ctx, &mut rng).ok(), Some(HunterStatus::Active));
            assert_eq!(h.boredom(), expected);
            assert_eq!(h.fear(), 0);
        }
        assert_eq!(
            h.step(HunterAction::Collect, &f.ctx, &mut rng).ok(),
            Some(HunterStatus::Terminated(ExitReason::GaveUp))
        );
        let last = f.sink.events().last().map(|e| e.kind.clone());
        assert_eq!(last, Some(AgentEventKind::Terminated { reason: ExitReason::GaveUp }));
    }

    #[test]
    fn ghost_resets_boredom() {
        let f = fixture(2, 10, 100);
        haunt(&f, 1);
        let mut h = hunter(&f, EvidenceType::Emf, 0);
        let mut rng = SmallRng::seed_from_u64(4);
        assert!(h.step(HunterAction::Collect, &f.ctx, &mut rng).is_ok());
        assert_eq!(h.boredom(), 1);
        // Only one neighbor, so the move lands in the haunted room.
        assert!(h.step(HunterAction::Move, &f.ctx, &mut rng).is_ok());
        assert_eq!(h.room(), room(&f, 1));
        assert_eq!(h.boredom(), 2);
        assert!(h.step(HunterAction::Collect, &f.ctx, &mut rng).is_ok());
        assert_eq!(h.boredom(), 0);
        assert_eq!(h.fear(), 1);
    }

    #[test]
    fn review_solves_when_registry_is_sufficient() {
        let f = fixture(1, 10, 100);
        let mut h = hunter(&f, EvidenceType::Emf, 0);
        let mut rng = SmallRng::seed_from_u64(5);

        assert_eq!(h.step(HunterAction::Review, &f.ctx, &mut rng).ok(), Some(HunterStatus::Active));
        for ev in [EvidenceType::Emf, EvidenceType::Temperature, EvidenceType::Fingerprints] {
            f.ctx.registry.try_add(ev);
        }
        assert_eq!(
            h.step(HunterAction::Review, &f.ctx, &mut rng).ok(),
            Some(HunterStatus::Terminated(ExitReason::Solved))
        );
        let reviews: Vec<bool> = f
            .sink
            .events()
            .iter()
            .filter_map(|e| match e.kind {
                AgentEventKind::Reviewed { sufficient } => Some(sufficient),
                _ => None,
            })
            .collect();
        assert_eq!(reviews, vec![false, true]);
    }

    #[test]
    fn move_keeps_a_single_occupancy_slot() {
        let f = fixture(3, 10, 100);
        let mut h = hunter(&f, EvidenceType::Emf, 1);
        let mut rng = SmallRng::seed_from_u64(6);
        for _ in 0..20 {
            assert!(h.step(HunterAction::Move, &f.ctx, &mut rng).is_ok());
            let snap = f.ctx.house.occupancy();
            assert!(snap.is_consistent());
            assert_eq!(snap.hunter_room(h.id()), Some(h.room()));
        }
    }

    #[test]
    fn run_ends_with_exactly_one_terminal_event() {
        let f = fixture(3, 10, 20);
        let h = hunter(&f, EvidenceType::Emf, 0);
        let mut rng = SmallRng::seed_from_u64(8);
        let report = h.run(&f.ctx, &mut rng);
        assert!(report.is_ok());
        if let Ok(report) = report {
            // No ghost anywhere, so the only way out is boredom.
            assert_eq!(report.exit, ExitReason::GaveUp);
            assert_eq!(report.boredom, 20);
            assert_eq!(report.ticks, 20);
        }
        let events = f.sink.events();
        assert!(matches!(
            events.first().map(|e| &e.kind),
            Some(AgentEventKind::HunterInitialized { .. })
        ));
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
        assert!(events.last().is_some_and(AgentEvent::is_terminal));
    }

    /// Sink that fails the way a broken presentation layer would.
    struct FailOnEntry;

    impl crate::sink::EventSink for FailOnEntry {
        #[allow(clippy::panic)]
        fn emit(&self, event: AgentEvent) {
            if matches!(event.kind, AgentEventKind::HunterInitialized { .. }) {
                panic!("sink rejected event");
            }
        }
    }

    #[test]
    fn panicking_run_still_clears_slot() {
        let f = fixture(2, 10, 100);
        let ctx = AgentContext {
            sink: Arc::new(FailOnEntry),
            ..f.ctx.clone()
        };
        let h = hunter(&f, EvidenceType::Emf, 0);
        let worker_ctx = ctx.clone();
        let outcome = std::thread::spawn(move || {
            let mut rng = SmallRng::seed_from_u64(9);
            h.run(&worker_ctx, &mut rng)
        })
        .join();
        assert!(outcome.is_err());
        assert!(ctx.house.occupancy().hunters.is_empty());
        assert_eq!(ctx.house.hunters_present(room(&f, 0)).ok(), Some(false));
    }

    #[test]
    fn failing_run_still_clears_slot() {
        let f = fixture(2, 10, 5);
        let h = hunter(&f, EvidenceType::Emf, 0);
        // Relocate the hunter behind its back so its next move or exit fails.
        let occupant = Occupant::Hunter(h.id());
        f.ctx.house.move_occupant(occupant, room(&f, 0), room(&f, 1)).unwrap();

        let mut rng = SmallRng::seed_from_u64(10);
        let result = h.run(&f.ctx, &mut rng);
        assert!(matches!(result, Err(AgentError::World { .. })));
        assert!(f.ctx.house.occupancy().hunters.is_empty());
    }
}
