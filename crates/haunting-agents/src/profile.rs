//! Ghost class profiles and identification.
//!
//! Every class produces exactly three of the four evidence types and never
//! the fourth:
//!
//! | Class       | EMF | TEMPERATURE | FINGERPRINTS | SOUND |
//! |-------------|-----|-------------|--------------|-------|
//! | Poltergeist |  x  |      x      |      x       |       |
//! | Banshee     |  x  |      x      |              |   x   |
//! | Bullies     |  x  |             |      x       |   x   |
//! | Phantom     |     |      x      |      x       |   x   |
//!
//! Because each class omits a different type, any three distinct types are
//! covered by exactly one profile. That makes [`identify_ghost`] total on
//! three-entry registries.

use haunting_types::{EvidenceType, GhostClass};
use rand::Rng;

/// The evidence types `class` can leave behind.
pub const fn ghost_profile(class: GhostClass) -> [EvidenceType; 3] {
    use EvidenceType::{Emf, Fingerprints, Sound, Temperature};
    match class {
        GhostClass::Poltergeist => [Emf, Temperature, Fingerprints],
        GhostClass::Banshee => [Emf, Temperature, Sound],
        GhostClass::Bullies => [Emf, Fingerprints, Sound],
        GhostClass::Phantom => [Temperature, Fingerprints, Sound],
    }
}

/// Pick one of `class`'s evidence types uniformly.
pub fn random_evidence<R: Rng + ?Sized>(class: GhostClass, rng: &mut R) -> EvidenceType {
    let profile = ghost_profile(class);
    let [first, ..] = profile;
    let idx = rng.random_range(0..profile.len());
    profile.get(idx).copied().unwrap_or(first)
}

/// Name the class whose profile covers `evidence`.
///
/// Returns `None` ("unknown") when fewer than three distinct types are
/// given, or when no single class could have produced all of them.
pub fn identify_ghost(evidence: &[EvidenceType]) -> Option<GhostClass> {
    let mut distinct: Vec<EvidenceType> = evidence.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    if distinct.len() < 3 {
        return None;
    }

    let mut matches = GhostClass::ALL
        .into_iter()
        .filter(|class| {
            let profile = ghost_profile(*class);
            distinct.iter().all(|ev| profile.contains(ev))
        });
    let first = matches.next()?;
    // A second match would make the signature ambiguous.
    match matches.next() {
        Some(_) => None,
        None => Some(first),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn every_profile_identifies_its_class() {
        for class in GhostClass::ALL {
            assert_eq!(identify_ghost(&ghost_profile(class)), Some(class));
        }
    }

    #[test]
    fn every_triple_identifies_exactly_one_class() {
        let all = EvidenceType::ALL;
        for skip in all {
            let triple: Vec<EvidenceType> = all.into_iter().filter(|ev| *ev != skip).collect();
            let class = identify_ghost(&triple);
            assert!(class.is_some(), "no class for {triple:?}");
            if let Some(class) = class {
                assert!(!ghost_profile(class).contains(&skip));
            }
        }
    }

    #[test]
    fn order_does_not_matter() {
        use EvidenceType::{Emf, Fingerprints, Sound};
        assert_eq!(identify_ghost(&[Sound, Emf, Fingerprints]), Some(GhostClass::Bullies));
        assert_eq!(identify_ghost(&[Fingerprints, Sound, Emf]), Some(GhostClass::Bullies));
    }

    #[test]
    fn too_little_evidence_is_unknown() {
        use EvidenceType::{Emf, Temperature};
        assert_eq!(identify_ghost(&[]), None);
        assert_eq!(identify_ghost(&[Emf, Temperature]), None);
        assert_eq!(identify_ghost(&[Emf, Emf, Temperature]), None);
    }

    #[test]
    fn all_four_types_is_unknown() {
        assert_eq!(identify_ghost(&EvidenceType::ALL), None);
    }

    #[test]
    fn random_evidence_stays_in_profile() {
        let mut rng = SmallRng::seed_from_u64(11);
        for class in GhostClass::ALL {
            let profile = ghost_profile(class);
            for _ in 0..50 {
                assert!(profile.contains(&random_evidence(class, &mut rng)));
            }
        }
    }
}
