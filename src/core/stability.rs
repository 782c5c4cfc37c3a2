use crate::core::matching::Matching;
use crate::models::{PreferenceProfile, StabilityReport};

/// Post-hoc stability and individual-rationality checks
///
/// Works on any [`Matching`] over the profile, not only engine output, so it
/// doubles as an independent check of the engine.
#[derive(Debug, Clone, Copy)]
pub struct StabilityVerifier<'a> {
    profile: &'a PreferenceProfile,
}

impl<'a> StabilityVerifier<'a> {
    pub fn new(profile: &'a PreferenceProfile) -> Self {
        Self { profile }
    }

    /// No matched pair includes a partner either side finds unacceptable
    pub fn is_individually_rational(&self, matching: &Matching) -> bool {
        matching.pairs().all(|(p, r)| {
            self.profile.proposer_rank(p, r).is_some()
                && self.profile.responder_rank(r, p).is_some()
        })
    }

    /// Every (proposer, responder) pair that would rather have each other
    ///
    /// Checks all n * m cross pairs; proposer roster order, then responder order.
    pub fn blocking_pairs(&self, matching: &Matching) -> Vec<(usize, usize)> {
        let mut blocking = Vec::new();
        for p in 0..self.profile.proposer_count() {
            let current = matching.responder_for(p);
            for r in 0..self.profile.responder_count() {
                if current == Some(r) {
                    continue;
                }
                if self.proposer_prefers(p, r, current)
                    && self.responder_prefers(r, p, matching.proposer_for(r))
                {
                    blocking.push((p, r));
                }
            }
        }
        blocking
    }

    pub fn is_stable(&self, matching: &Matching) -> bool {
        self.is_individually_rational(matching) && self.blocking_pairs(matching).is_empty()
    }

    /// Full report with names
    pub fn verify(&self, matching: &Matching) -> StabilityReport {
        let is_individually_rational = self.is_individually_rational(matching);
        let blocking_pairs: Vec<(String, String)> = self
            .blocking_pairs(matching)
            .into_iter()
            .map(|(p, r)| {
                (
                    self.profile.proposer_name(p).to_string(),
                    self.profile.responder_name(r).to_string(),
                )
            })
            .collect();

        StabilityReport {
            is_stable: is_individually_rational && blocking_pairs.is_empty(),
            is_individually_rational,
            blocking_pairs,
        }
    }

    /// `p` strictly prefers `r` to their current outcome. Being unmatched, or
    /// matched to someone unacceptable, loses to anyone on the list.
    fn proposer_prefers(&self, p: usize, r: usize, current: Option<usize>) -> bool {
        let Some(rank) = self.profile.proposer_rank(p, r) else {
            return false;
        };
        match current.and_then(|c| self.profile.proposer_rank(p, c)) {
            Some(current_rank) => rank < current_rank,
            None => true,
        }
    }

    fn responder_prefers(&self, r: usize, p: usize, current: Option<usize>) -> bool {
        let Some(rank) = self.profile.responder_rank(r, p) else {
            return false;
        };
        match current.and_then(|c| self.profile.responder_rank(r, c)) {
            Some(current_rank) => rank < current_rank,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Roster;

    fn profile() -> PreferenceProfile {
        let proposers: Roster = [("A", vec!["X", "Y"]), ("B", vec!["X", "Y"])]
            .into_iter()
            .collect();
        let responders: Roster = [("X", vec!["B", "A"]), ("Y", vec!["A", "B"])]
            .into_iter()
            .collect();
        PreferenceProfile::new(&proposers, &responders).unwrap()
    }

    #[test]
    fn test_stable_matching() {
        let profile = profile();
        let matching = Matching::from_named_pairs(&profile, [("A", "Y"), ("B", "X")]).unwrap();
        let report = StabilityVerifier::new(&profile).verify(&matching);

        assert!(report.is_stable);
        assert!(report.is_individually_rational);
        assert!(report.blocking_pairs.is_empty());
    }

    #[test]
    fn test_blocking_pair_found() {
        let profile = profile();
        let matching = Matching::from_named_pairs(&profile, [("A", "X"), ("B", "Y")]).unwrap();
        let report = StabilityVerifier::new(&profile).verify(&matching);

        assert!(!report.is_stable);
        assert!(report.is_individually_rational);
        assert_eq!(report.blocking_pairs, vec![("B".to_string(), "X".to_string())]);
    }

    #[test]
    fn test_unmatched_pair_that_likes_each_other_blocks() {
        let profile = profile();
        let matching = Matching::from_named_pairs(&profile, [("B", "X")]).unwrap();
        let verifier = StabilityVerifier::new(&profile);

        assert_eq!(verifier.blocking_pairs(&matching), vec![(0, 1)]);
        assert!(!verifier.is_stable(&matching));
    }

    #[test]
    fn test_unacceptable_match_is_not_individually_rational() {
        let proposers: Roster = [("A", vec!["X"])].into_iter().collect();
        let responders: Roster = [("X", Vec::<&str>::new())].into_iter().collect();
        let profile = PreferenceProfile::new(&proposers, &responders).unwrap();
        let matching = Matching::from_named_pairs(&profile, [("A", "X")]).unwrap();
        let report = StabilityVerifier::new(&profile).verify(&matching);

        assert!(!report.is_individually_rational);
        assert!(!report.is_stable);
        assert!(report.blocking_pairs.is_empty());
    }

    #[test]
    fn test_empty_matching_with_no_acceptable_partners_is_stable() {
        let proposers: Roster = [("A", Vec::<&str>::new())].into_iter().collect();
        let responders: Roster = [("X", vec!["A"])].into_iter().collect();
        let profile = PreferenceProfile::new(&proposers, &responders).unwrap();

        assert!(StabilityVerifier::new(&profile).is_stable(&Matching::for_profile(&profile)));
    }
}
