//! Shared handles handed to every agent thread.

use std::sync::Arc;

use haunting_types::AgentEvent;
use haunting_world::{House, Occupant};
use tracing::warn;

use crate::config::AgentConfig;
use crate::registry::EvidenceRegistry;
use crate::sink::EventSink;

/// Everything an agent may touch besides its own state.
///
/// Cloning is cheap: every field is an `Arc` or `Copy`.
#[derive(Clone)]
pub struct AgentContext {
    /// The house graph and per-room state.
    pub house: Arc<House>,
    /// Evidence collected by all hunters.
    pub registry: Arc<EvidenceRegistry>,
    /// Destination for agent events.
    pub sink: Arc<dyn EventSink>,
    /// Thresholds and pacing.
    pub config: AgentConfig,
}

impl AgentContext {
    /// Bundle shared handles.
    pub fn new(
        house: Arc<House>,
        registry: Arc<EvidenceRegistry>,
        sink: Arc<dyn EventSink>,
        config: AgentConfig,
    ) -> Self {
        Self {
            house,
            registry,
            sink,
            config,
        }
    }

    /// Forward an event to the sink.
    pub fn emit(&self, event: AgentEvent) {
        self.sink.emit(event);
    }

    /// Guard that clears `occupant` from the house when dropped, whether
    /// the agent loop returns normally, returns an error, or unwinds.
    pub(crate) fn occupancy_guard(&self, occupant: Occupant) -> OccupancyGuard<'_> {
        OccupancyGuard {
            house: &self.house,
            occupant,
        }
    }
}

/// Clears an agent's slot on drop. A no-op when the agent already left
/// through its normal termination path.
pub(crate) struct OccupancyGuard<'a> {
    house: &'a House,
    occupant: Occupant,
}

impl Drop for OccupancyGuard<'_> {
    fn drop(&mut self) {
        if self.house.evict(self.occupant) {
            warn!(occupant = %self.occupant, "Agent stopped without leaving the house; slot cleared");
        }
    }
}

impl core::fmt::Debug for AgentContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AgentContext")
            .field("rooms", &self.house.len())
            .field("evidence", &self.registry.unique_count())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
