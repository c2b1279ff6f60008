//! The process-wide set of collected evidence.
//!
//! [`EvidenceSet`] enforces the two invariants at the type boundary: at most
//! [`REGISTRY_CAPACITY`] entries, and no duplicates. [`EvidenceRegistry`]
//! wraps one set behind a single mutex shared by every hunter thread.
//!
//! Entries are never removed during a run, so the unique count only grows.
//! Every read goes through the live set; there is no cached counter that
//! could go stale between calls.

use std::sync::{Mutex, MutexGuard, PoisonError};

use haunting_types::EvidenceType;
use tracing::debug;

/// Maximum number of distinct entries the registry holds.
pub const REGISTRY_CAPACITY: usize = 3;

/// Distinct entries needed before a review declares the case solved.
pub const SUFFICIENT_EVIDENCE: usize = 3;

/// A bounded set of distinct evidence types in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceSet {
    /// Distinct entries, oldest first. Never longer than the capacity.
    entries: Vec<EvidenceType>,
}

impl EvidenceSet {
    /// An empty set.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert `evidence` if it is new and there is room. Returns whether the
    /// set changed.
    pub fn insert(&mut self, evidence: EvidenceType) -> bool {
        if self.is_full() || self.contains(evidence) {
            return false;
        }
        self.entries.push(evidence);
        true
    }

    /// Whether `evidence` is present.
    pub fn contains(&self, evidence: EvidenceType) -> bool {
        self.entries.contains(&evidence)
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether no further entry fits.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= REGISTRY_CAPACITY
    }

    /// Entries in insertion order.
    pub fn as_slice(&self) -> &[EvidenceType] {
        &self.entries
    }
}

/// Shared, lock-guarded [`EvidenceSet`].
#[derive(Debug, Default)]
pub struct EvidenceRegistry {
    /// The set, guarded by the registry lock.
    inner: Mutex<EvidenceSet>,
}

impl EvidenceRegistry {
    /// An empty registry.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(EvidenceSet::new()),
        }
    }

    /// Lock the set. Inserts are single pushes that cannot leave the set
    /// half-written, so a poisoned lock is recovered.
    fn lock(&self) -> MutexGuard<'_, EvidenceSet> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `evidence` unless it is already present or the registry is full.
    /// Returns whether it was added.
    pub fn try_add(&self, evidence: EvidenceType) -> bool {
        let mut set = self.lock();
        let added = set.insert(evidence);
        if added {
            debug!(%evidence, unique = set.len(), "Evidence registered");
        }
        added
    }

    /// Live number of distinct entries.
    pub fn unique_count(&self) -> usize {
        self.lock().len()
    }

    /// Whether enough distinct evidence exists to identify the ghost.
    pub fn is_sufficient(&self) -> bool {
        self.unique_count() >= SUFFICIENT_EVIDENCE
    }

    /// Copy of the entries in insertion order.
    pub fn collected(&self) -> Vec<EvidenceType> {
        self.lock().as_slice().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn set_rejects_duplicates() {
        let mut set = EvidenceSet::new();
        assert!(set.insert(EvidenceType::Emf));
        assert!(!set.insert(EvidenceType::Emf));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn set_is_bounded() {
        let mut set = EvidenceSet::new();
        for ev in EvidenceType::ALL {
            set.insert(ev);
        }
        assert_eq!(set.len(), REGISTRY_CAPACITY);
        assert!(set.is_full());
        assert!(!set.contains(EvidenceType::Sound));
        assert_eq!(
            set.as_slice(),
            &[EvidenceType::Emf, EvidenceType::Temperature, EvidenceType::Fingerprints]
        );
    }

    #[test]
    fn count_persists_across_calls() {
        let registry = EvidenceRegistry::new();
        assert_eq!(registry.unique_count(), 0);
        assert!(registry.try_add(EvidenceType::Sound));
        assert_eq!(registry.unique_count(), 1);
        assert_eq!(registry.unique_count(), 1);
        assert!(registry.try_add(EvidenceType::Emf));
        assert_eq!(registry.unique_count(), 2);
    }

    #[test]
    fn sufficient_iff_three_unique() {
        let registry = EvidenceRegistry::new();
        assert!(!registry.is_sufficient());
        registry.try_add(EvidenceType::Emf);
        registry.try_add(EvidenceType::Emf);
        registry.try_add(EvidenceType::Temperature);
        assert!(!registry.is_sufficient());
        registry.try_add(EvidenceType::Fingerprints);
        assert!(registry.is_sufficient());
        assert_eq!(registry.unique_count(), 3);
    }

    #[test]
    fn arbitrary_add_sequences_keep_invariants() {
        // Every sequence of length 6 over the four types.
        let types = EvidenceType::ALL;
        let mut sequences: Vec<Vec<EvidenceType>> = vec![Vec::new()];
        for _ in 0..6 {
            sequences = sequences
                .into_iter()
                .flat_map(|seq| {
                    types.iter().map(move |ev| {
                        let mut next = seq.clone();
                        next.push(*ev);
                        next
                    })
                })
                .collect();
        }
        for seq in sequences {
            let registry = EvidenceRegistry::new();
            for ev in &seq {
                registry.try_add(*ev);
                let collected = registry.collected();
                assert!(collected.len() <= REGISTRY_CAPACITY);
                let mut dedup = collected.clone();
                dedup.sort();
                dedup.dedup();
                assert_eq!(dedup.len(), collected.len());
                assert_eq!(registry.is_sufficient(), registry.unique_count() >= 3);
            }
        }
    }

    #[test]
    fn concurrent_adds_insert_each_type_once() {
        let registry = Arc::new(EvidenceRegistry::new());
        let handles: Vec<_> = EvidenceType::ALL
            .into_iter()
            .chain(EvidenceType::ALL)
            .map(|ev| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        registry.try_add(ev);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().ok();
        }
        let collected = registry.collected();
        assert_eq!(collected.len(), REGISTRY_CAPACITY);
        let mut dedup = collected.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), REGISTRY_CAPACITY);
    }
}
