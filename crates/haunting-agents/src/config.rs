//! Thresholds and pacing for agent state machines.
//!
//! Defaults come from the classic game constants: hunters flee at fear 10,
//! everyone gives up at boredom 100, and the ghost ticks a little over eight
//! times as often as a hunter. Tick pauses are scaled down so a full run
//! finishes in seconds rather than minutes.

use std::time::Duration;

/// Default fear limit.
pub const DEFAULT_FEAR_MAX: u32 = 10;

/// Default boredom limit.
pub const DEFAULT_BOREDOM_MAX: u32 = 100;

/// Default pause between hunter ticks.
pub const DEFAULT_HUNTER_TICK: Duration = Duration::from_millis(50);

/// Default pause between ghost ticks.
pub const DEFAULT_GHOST_TICK: Duration = Duration::from_millis(6);

/// Limits and pacing shared by every agent in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentConfig {
    /// A hunter whose fear reaches this value flees.
    pub fear_max: u32,

    /// An agent whose boredom reaches this value gives up.
    pub boredom_max: u32,

    /// Pause after every hunter tick.
    pub hunter_tick: Duration,

    /// Pause after every ghost tick.
    pub ghost_tick: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            fear_max: DEFAULT_FEAR_MAX,
            boredom_max: DEFAULT_BOREDOM_MAX,
            hunter_tick: DEFAULT_HUNTER_TICK,
            ghost_tick: DEFAULT_GHOST_TICK,
        }
    }
}

impl AgentConfig {
    /// Config with no pauses, for tests that drive agents in tight loops.
    pub const fn unpaced(fear_max: u32, boredom_max: u32) -> Self {
        Self {
            fear_max,
            boredom_max,
            hunter_tick: Duration::ZERO,
            ghost_tick: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_game_constants() {
        let config = AgentConfig::default();
        assert_eq!(config.fear_max, 10);
        assert_eq!(config.boredom_max, 100);
        assert!(config.ghost_tick < config.hunter_tick);
    }

    #[test]
    fn unpaced_has_no_pauses() {
        let config = AgentConfig::unpaced(3, 4);
        assert_eq!(config.hunter_tick, Duration::ZERO);
        assert_eq!(config.ghost_tick, Duration::ZERO);
        assert_eq!((config.fear_max, config.boredom_max), (3, 4));
    }
}
