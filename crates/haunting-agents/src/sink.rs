//! Where agent events go.
//!
//! Agents hand every [`AgentEvent`] to an [`EventSink`] and never look at it
//! again. Sinks are shared across agent threads, so they take `&self` and
//! must be `Send + Sync`.

use std::sync::{Mutex, PoisonError};

use haunting_types::{AgentEvent, AgentEventKind};
use tracing::{debug, info};

/// Consumer of agent events.
pub trait EventSink: Send + Sync {
    /// Accept one event. Must not block for long; agents call this between
    /// lock sections on their own threads.
    fn emit(&self, event: AgentEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: AgentEvent) {}
}

/// Records events in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Events received so far.
    events: Mutex<Vec<AgentEvent>>,
}

impl MemorySink {
    /// An empty sink.
    pub const fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Copy of every event received so far.
    pub fn events(&self) -> Vec<AgentEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of events received so far.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no event has arrived.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: AgentEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Writes events as structured `tracing` records.
///
/// Insufficient reviews are frequent and logged at `debug`; everything else
/// is `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: AgentEvent) {
        let agent = event.actor.label();
        match &event.kind {
            AgentEventKind::HunterInitialized { specialty, room } => {
                info!(agent, %specialty, room = room.as_str(), "Hunter entered the house");
            }
            AgentEventKind::GhostInitialized { class, room } => {
                info!(agent, %class, room = room.as_str(), "Ghost began haunting");
            }
            AgentEventKind::Moved { room } => {
                info!(agent, room = room.as_str(), "Moved");
            }
            AgentEventKind::LeftEvidence { evidence, room } => {
                info!(agent, %evidence, room = room.as_str(), "Left evidence");
            }
            AgentEventKind::CollectedEvidence { evidence, room } => {
                info!(agent, %evidence, room = room.as_str(), "Collected evidence");
            }
            AgentEventKind::Reviewed { sufficient: true } => {
                info!(agent, "Reviewed evidence: sufficient");
            }
            AgentEventKind::Reviewed { sufficient: false } => {
                debug!(agent, "Reviewed evidence: insufficient");
            }
            AgentEventKind::Terminated { reason } => {
                info!(agent, %reason, "Left the house");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use haunting_types::{Actor, ExitReason, GhostId};

    use super::*;

    fn ghost_event(kind: AgentEventKind) -> AgentEvent {
        AgentEvent::now(Actor::Ghost { id: GhostId::new() }, kind)
    }

    #[test]
    fn memory_sink_keeps_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.emit(ghost_event(AgentEventKind::Moved { room: String::from("Kitchen") }));
        sink.emit(ghost_event(AgentEventKind::Terminated { reason: ExitReason::GaveUp }));
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(!events.first().is_some_and(AgentEvent::is_terminal));
        assert!(events.last().is_some_and(AgentEvent::is_terminal));
    }

    #[test]
    fn sinks_are_object_safe() {
        let sinks: Vec<Box<dyn EventSink>> =
            vec![Box::new(NullSink), Box::new(TracingSink), Box::new(MemorySink::new())];
        for sink in &sinks {
            sink.emit(ghost_event(AgentEventKind::Reviewed { sufficient: false }));
        }
    }
}
