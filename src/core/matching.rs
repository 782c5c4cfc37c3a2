use crate::core::error::MatchingError;
use crate::models::PreferenceProfile;

/// Partial bijection between the proposer and responder rosters, by index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    by_proposer: Vec<Option<usize>>,
    by_responder: Vec<Option<usize>>,
}

impl Matching {
    /// Nobody matched
    pub fn empty(proposers: usize, responders: usize) -> Self {
        Self {
            by_proposer: vec![None; proposers],
            by_responder: vec![None; responders],
        }
    }

    pub fn for_profile(profile: &PreferenceProfile) -> Self {
        Self::empty(profile.proposer_count(), profile.responder_count())
    }

    /// Build from (proposer, responder) names, e.g. a hand-constructed matching
    ///
    /// Unknown names and persons matched twice are rejected.
    pub fn from_named_pairs<'n, I>(
        profile: &PreferenceProfile,
        pairs: I,
    ) -> Result<Self, MatchingError>
    where
        I: IntoIterator<Item = (&'n str, &'n str)>,
    {
        let mut matching = Self::for_profile(profile);
        for (proposer, responder) in pairs {
            let p = profile.proposer_index(proposer).ok_or_else(|| {
                MatchingError::InvalidMatching(format!("{} is not a proposer", proposer))
            })?;
            let r = profile.responder_index(responder).ok_or_else(|| {
                MatchingError::InvalidMatching(format!("{} is not a responder", responder))
            })?;
            if !matching.try_pair(p, r) {
                return Err(MatchingError::InvalidMatching(format!(
                    "{} or {} is matched more than once",
                    proposer, responder
                )));
            }
        }
        Ok(matching)
    }

    pub fn responder_for(&self, proposer: usize) -> Option<usize> {
        self.by_proposer[proposer]
    }

    pub fn proposer_for(&self, responder: usize) -> Option<usize> {
        self.by_responder[responder]
    }

    /// Pair two free persons; returns false and changes nothing if either is taken
    pub fn try_pair(&mut self, proposer: usize, responder: usize) -> bool {
        if self.by_proposer[proposer].is_some() || self.by_responder[responder].is_some() {
            return false;
        }
        self.by_proposer[proposer] = Some(responder);
        self.by_responder[responder] = Some(proposer);
        true
    }

    /// Break the pair (proposer, responder); returns false if they were not paired
    pub fn unpair(&mut self, proposer: usize, responder: usize) -> bool {
        if self.by_proposer[proposer] != Some(responder)
            || self.by_responder[responder] != Some(proposer)
        {
            return false;
        }
        self.by_proposer[proposer] = None;
        self.by_responder[responder] = None;
        true
    }

    /// Matched pairs in proposer roster order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.by_proposer
            .iter()
            .enumerate()
            .filter_map(|(p, r)| r.map(|r| (p, r)))
    }

    pub fn unmatched_proposers(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_proposer
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_none())
            .map(|(p, _)| p)
    }

    pub fn unmatched_responders(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_responder
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_none())
            .map(|(r, _)| r)
    }

    /// Both directions of the index agree
    pub fn is_consistent(&self) -> bool {
        self.by_proposer
            .iter()
            .enumerate()
            .all(|(p, r)| r.map_or(true, |r| self.by_responder[r] == Some(p)))
            && self
                .by_responder
                .iter()
                .enumerate()
                .all(|(r, p)| p.map_or(true, |p| self.by_proposer[p] == Some(r)))
    }
}
