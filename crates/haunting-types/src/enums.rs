//! Enumeration types for the Haunting simulation.
//!
//! The evidence and ghost class sets are fixed: four of each. Both serialize
//! as their upper-case names (`"EMF"`, `"POLTERGEIST"`), which is also what
//! [`Display`](core::fmt::Display) prints.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

/// A kind of clue a ghost can leave behind and a hunter can collect.
///
/// Each hunter carries equipment for exactly one evidence type, its
/// specialty, and can only collect clues of that type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceType {
    /// Electromagnetic field readings.
    Emf,
    /// Sudden temperature drops.
    Temperature,
    /// Fingerprints on surfaces.
    Fingerprints,
    /// Unexplained sounds.
    Sound,
}

impl EvidenceType {
    /// Every evidence type, in declaration order.
    pub const ALL: [Self; 4] = [Self::Emf, Self::Temperature, Self::Fingerprints, Self::Sound];

    /// Upper-case display name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Emf => "EMF",
            Self::Temperature => "TEMPERATURE",
            Self::Fingerprints => "FINGERPRINTS",
            Self::Sound => "SOUND",
        }
    }
}

impl core::fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Ghost classes
// ---------------------------------------------------------------------------

/// The class of the ghost haunting the house.
///
/// Assigned once at creation and never observable by hunters directly; they
/// can only infer it from the evidence they collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GhostClass {
    /// A noisy, object-throwing spirit.
    Poltergeist,
    /// A wailing spirit fixated on one target.
    Banshee,
    /// A pack of spirits that gang up on the lone hunter.
    Bullies,
    /// A spirit that is rarely seen.
    Phantom,
}

impl GhostClass {
    /// Every ghost class, in declaration order.
    pub const ALL: [Self; 4] = [Self::Poltergeist, Self::Banshee, Self::Bullies, Self::Phantom];

    /// Upper-case display name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poltergeist => "POLTERGEIST",
            Self::Banshee => "BANSHEE",
            Self::Bullies => "BULLIES",
            Self::Phantom => "PHANTOM",
        }
    }
}

impl core::fmt::Display for GhostClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Termination
// ---------------------------------------------------------------------------

/// Why an agent stopped acting.
///
/// Hunters end in any of the three; the ghost only ever gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Fear reached its limit and the hunter ran.
    Fled,
    /// Boredom reached its limit.
    GaveUp,
    /// The shared evidence was sufficient to identify the ghost.
    Solved,
}

impl core::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Fled => "fled",
            Self::GaveUp => "gave up",
            Self::Solved => "solved",
        };
        f.write_str(s)
    }
}
