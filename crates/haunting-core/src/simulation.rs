//! The simulation driver.
//!
//! [`Simulation::new`] settles everything random about the setup: the
//! ghost's class, the ghost's starting room, and the seed every agent RNG is
//! derived from. [`Simulation::run`] then enters the agents into the house,
//! starts one OS thread per agent, and joins every thread before building the
//! summary. There is no turn-taking: agents interleave freely and coordinate
//! only through room locks and the evidence registry.
//!
//! A summary is never built from a partial run. If any thread fails to start
//! or panics, the threads that did start are still joined before the error is
//! returned. A panicked agent's slot is cleared as it unwinds, and agents
//! whose threads never started are cleared by the driver, so no surviving
//! agent is left waiting on a room-mate that will never act.

use std::iter::once;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::Utc;
use haunting_agents::{
    AgentContext, AgentError, EventSink, EvidenceRegistry, Ghost, GhostReport, Hunter, HunterReport,
};
use haunting_types::{GhostClass, RoomId};
use haunting_world::{House, Occupant, Room, WorldError};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, SimulationConfig};
use crate::summary::SimulationSummary;

/// Errors that end a run before a summary exists.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The configuration failed validation.
    #[error("invalid configuration: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The house rejected a placement or lookup.
    #[error("house error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// An agent thread returned an error.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// The OS refused to start an agent thread.
    #[error("failed to spawn thread for {agent}: {source}")]
    Spawn {
        /// Thread name of the agent.
        agent: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An agent thread panicked.
    #[error("agent thread {agent} panicked")]
    AgentPanicked {
        /// Thread name of the agent.
        agent: String,
    },
}

/// A configured run, ready to start.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    house: Arc<House>,
    entry: RoomId,
    ghost_room: RoomId,
    ghost_class: GhostClass,
    seed: u64,
}

impl Simulation {
    /// Validate `config` against `house` and decide the random parts of the
    /// setup.
    ///
    /// The ghost starts in a uniformly chosen room other than the entry room,
    /// or in the entry room when it is the only one. Without a configured
    /// seed a fresh one is drawn and recorded in the summary.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Config`] if the config is invalid, or
    /// [`SimulationError::World`] if the entry room is not in the house.
    pub fn new(config: SimulationConfig, house: House) -> Result<Self, SimulationError> {
        config.validate()?;
        let entry = house
            .room_by_name(&config.simulation.entry_room)
            .map(Room::id)
            .ok_or_else(|| WorldError::UnknownRoomName(config.simulation.entry_room.clone()))?;

        let seed = config.simulation.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = SmallRng::seed_from_u64(seed);

        let ghost_class = config.simulation.ghost_class.unwrap_or_else(|| {
            let idx = rng.random_range(0..GhostClass::ALL.len());
            GhostClass::ALL.get(idx).copied().unwrap_or(GhostClass::Poltergeist)
        });

        let candidates: Vec<RoomId> = house.room_ids().iter().copied().filter(|id| *id != entry).collect();
        let ghost_room = if candidates.is_empty() {
            entry
        } else {
            let idx = rng.random_range(0..candidates.len());
            candidates.get(idx).copied().unwrap_or(entry)
        };

        debug!(
            seed,
            %ghost_class,
            entry = house.name_of(entry),
            ghost_room = house.name_of(ghost_room),
            "Simulation set up"
        );
        Ok(Self {
            config,
            house: Arc::new(house),
            entry,
            ghost_room,
            ghost_class,
            seed,
        })
    }

    /// The house agents will run in.
    pub fn house(&self) -> &House {
        &self.house
    }

    /// The seed every RNG in this run derives from.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The ghost's hidden class.
    pub const fn ghost_class(&self) -> GhostClass {
        self.ghost_class
    }

    /// Where hunters start.
    pub const fn entry_room(&self) -> RoomId {
        self.entry
    }

    /// Where the ghost starts.
    pub const fn ghost_room(&self) -> RoomId {
        self.ghost_room
    }

    /// Run to completion: every agent reaches a terminal state and every
    /// thread is joined.
    ///
    /// Agent `i` (the ghost is 0, hunters follow in config order) seeds its
    /// RNG with `seed + i`.
    ///
    /// # Errors
    ///
    /// Returns the first error any agent produced, a spawn failure, or
    /// [`SimulationError::AgentPanicked`].
    pub fn run(self, sink: Arc<dyn EventSink>) -> Result<SimulationSummary, SimulationError> {
        let registry = Arc::new(EvidenceRegistry::new());
        let ctx = AgentContext::new(
            Arc::clone(&self.house),
            Arc::clone(&registry),
            sink,
            self.config.agent_config(),
        );

        let ghost = Ghost::enter(self.ghost_class, self.ghost_room, &ctx)?;
        let mut hunters = Vec::with_capacity(self.config.hunters.len());
        for spec in &self.config.hunters {
            match Hunter::enter(spec.name.clone(), spec.specialty, self.entry, &ctx) {
                Ok(hunter) => hunters.push(hunter),
                Err(err) => {
                    self.vacate(once(Occupant::Ghost(ghost.id())).chain(hunters.iter().map(hunter_slot)));
                    return Err(err.into());
                }
            }
        }

        let started_at = Utc::now();
        info!(
            seed = self.seed,
            hunters = hunters.len(),
            rooms = self.house.len(),
            "Simulation starting"
        );

        let ghost_slot = Occupant::Ghost(ghost.id());
        let ghost_ctx = ctx.clone();
        let mut ghost_rng = SmallRng::seed_from_u64(self.seed);
        let ghost_handle = match spawn(String::from("ghost"), move || ghost.run(&ghost_ctx, &mut ghost_rng)) {
            Ok(handle) => handle,
            Err(err) => {
                self.vacate(once(ghost_slot).chain(hunters.iter().map(hunter_slot)));
                return Err(err);
            }
        };

        // A hunter whose thread never starts would pin the ghost's boredom
        // at zero, so its slot is cleared here along with every hunter
        // after it.
        let mut spawn_error = None;
        let mut hunter_handles = Vec::with_capacity(hunters.len());
        let mut queue = (1_u64..).zip(hunters);
        while let Some((index, hunter)) = queue.next() {
            let label = format!("hunter-{}", hunter.name());
            let slot = hunter_slot(&hunter);
            let hunter_ctx = ctx.clone();
            let mut rng = SmallRng::seed_from_u64(self.seed.wrapping_add(index));
            match spawn(label.clone(), move || hunter.run(&hunter_ctx, &mut rng)) {
                Ok(handle) => hunter_handles.push((label, handle)),
                Err(err) => {
                    self.vacate(once(slot).chain(queue.by_ref().map(|(_, rest)| hunter_slot(&rest))));
                    spawn_error = Some(err);
                    break;
                }
            }
        }

        // Join everything before looking at any result.
        let ghost_result = join(String::from("ghost"), ghost_handle);
        let hunter_results: Vec<Result<HunterReport, SimulationError>> = hunter_handles
            .into_iter()
            .map(|(label, handle)| join(label, handle))
            .collect();
        let finished_at = Utc::now();

        if let Some(err) = spawn_error {
            return Err(err);
        }
        let ghost: GhostReport = ghost_result?;
        let hunters = hunter_results.into_iter().collect::<Result<Vec<_>, _>>()?;

        let leftover = self.house.occupancy();
        if !leftover.hunters.is_empty() || !leftover.ghosts.is_empty() {
            warn!(
                hunters = leftover.hunters.len(),
                ghosts = leftover.ghosts.len(),
                "Occupants left in the house after every agent terminated"
            );
        }

        let summary = SimulationSummary {
            seed: self.seed,
            started_at,
            finished_at,
            hunters,
            ghost,
            evidence: registry.collected(),
        };
        info!(
            ghost_won = summary.ghost_won(),
            evidence = summary.evidence.len(),
            "Simulation finished"
        );
        Ok(summary)
    }
}

impl Simulation {
    /// Clear slots of agents that will never run.
    fn vacate(&self, occupants: impl IntoIterator<Item = Occupant>) {
        for occupant in occupants {
            if self.house.evict(occupant) {
                debug!(%occupant, "Cleared slot of agent that never started");
            }
        }
    }
}

const fn hunter_slot(hunter: &Hunter) -> Occupant {
    Occupant::Hunter(hunter.id())
}

/// Start a named agent thread.
fn spawn<T, F>(label: String, body: F) -> Result<JoinHandle<Result<T, AgentError>>, SimulationError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AgentError> + Send + 'static,
{
    thread::Builder::new()
        .name(label.clone())
        .spawn(body)
        .map_err(|source| SimulationError::Spawn { agent: label, source })
}

/// Wait for an agent thread and flatten its outcome.
fn join<T>(label: String, handle: JoinHandle<Result<T, AgentError>>) -> Result<T, SimulationError> {
    match handle.join() {
        Ok(result) => result.map_err(SimulationError::from),
        Err(_) => {
            warn!(agent = label.as_str(), "Agent thread panicked");
            Err(SimulationError::AgentPanicked { agent: label })
        }
    }
}
