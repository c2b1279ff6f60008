//! Post-mortem report of a finished run.
//!
//! Built only after every agent thread has been joined, so nothing here
//! takes a lock.

use std::fmt;

use chrono::{DateTime, Utc};
use haunting_agents::{GhostReport, HunterReport, SUFFICIENT_EVIDENCE, identify_ghost};
use haunting_types::{EvidenceType, ExitReason, GhostClass};
use serde::Serialize;

/// The hunters' verdict on the ghost, next to the truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Identification {
    /// Class named by the collected evidence, or `None` for "unknown".
    pub guessed: Option<GhostClass>,
    /// The ghost's hidden class.
    pub actual: GhostClass,
}

impl Identification {
    /// Whether the evidence named the right class.
    pub fn is_correct(self) -> bool {
        self.guessed == Some(self.actual)
    }
}

/// Everything known about a run once it is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationSummary {
    /// Seed all RNGs derived from.
    pub seed: u64,
    /// When the agent threads were started.
    pub started_at: DateTime<Utc>,
    /// When the last agent thread was joined.
    pub finished_at: DateTime<Utc>,
    /// One report per hunter, in party order.
    pub hunters: Vec<HunterReport>,
    /// The ghost's report.
    pub ghost: GhostReport,
    /// Registry contents in collection order.
    pub evidence: Vec<EvidenceType>,
}

impl SimulationSummary {
    /// Hunters who fled at the fear limit.
    pub fn fearful_hunters(&self) -> impl Iterator<Item = &HunterReport> {
        self.hunters_with(ExitReason::Fled)
    }

    /// Hunters who gave up at the boredom limit without fleeing.
    pub fn bored_hunters(&self) -> impl Iterator<Item = &HunterReport> {
        self.hunters_with(ExitReason::GaveUp)
    }

    /// Hunters who ended the run by reviewing sufficient evidence.
    pub fn solving_hunters(&self) -> impl Iterator<Item = &HunterReport> {
        self.hunters_with(ExitReason::Solved)
    }

    fn hunters_with(&self, exit: ExitReason) -> impl Iterator<Item = &HunterReport> {
        self.hunters.iter().filter(move |h| h.exit == exit)
    }

    /// The ghost wins when every hunter fled or gave up.
    pub fn ghost_won(&self) -> bool {
        self.solving_hunters().next().is_none()
    }

    /// Verdict from the collected evidence. Only formed once the registry
    /// holds enough entries.
    pub fn identification(&self) -> Option<Identification> {
        (self.evidence.len() >= SUFFICIENT_EVIDENCE).then(|| Identification {
            guessed: identify_ghost(&self.evidence),
            actual: self.ghost.class,
        })
    }

    /// Wall-clock run time.
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at.signed_duration_since(self.started_at)
    }
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==================== FINAL REPORT ====================")?;
        writeln!(
            f,
            "Seed {} | {} ms",
            self.seed,
            self.duration().num_milliseconds()
        )?;

        writeln!(f, "Hunters who fled in fear:")?;
        write_hunters(f, self.fearful_hunters())?;
        writeln!(f, "Hunters who gave up from boredom:")?;
        write_hunters(f, self.bored_hunters())?;
        writeln!(f, "Hunters who cracked the case:")?;
        write_hunters(f, self.solving_hunters())?;

        if self.evidence.is_empty() {
            writeln!(f, "Evidence collected: none")?;
        } else {
            let names: Vec<&str> = self.evidence.iter().map(|e| e.as_str()).collect();
            writeln!(f, "Evidence collected: {}", names.join(", "))?;
        }

        match self.identification() {
            Some(Identification {
                guessed: Some(guessed),
                actual,
            }) => {
                let verdict = if guessed == actual { "correct" } else { "wrong" };
                writeln!(f, "Identified ghost: {guessed} ({verdict}, it was a {actual})")?;
            }
            Some(Identification { guessed: None, actual }) => {
                writeln!(f, "Identified ghost: unknown (it was a {actual})")?;
            }
            None => {
                writeln!(f, "Not enough evidence to identify the ghost ({})", self.ghost.class)?;
            }
        }

        if self.ghost_won() {
            write!(f, "The ghost has won.")
        } else {
            write!(f, "The hunters have won.")
        }
    }
}

fn write_hunters<'a>(
    f: &mut fmt::Formatter<'_>,
    hunters: impl Iterator<Item = &'a HunterReport>,
) -> fmt::Result {
    let mut any = false;
    for hunter in hunters {
        any = true;
        writeln!(
            f,
            "  - {} ({}) fear {} boredom {}",
            hunter.name, hunter.specialty, hunter.fear, hunter.boredom
        )?;
    }
    if !any {
        writeln!(f, "  (none)")?;
    }
    Ok(())
}
