//! Batch deferred acceptance (Gale-Shapley), proposer side proposing.
//!
//! # Rounds
//! 1. Every free proposer with an untried candidate proposes to the next one
//!    on their list. A free proposer with nobody left is self-matched.
//! 2. Each responder keeps the best of this round's offers and the proposer
//!    they already hold, ranked by their own list. Everyone else is rejected,
//!    including a displaced holder. Offers from proposers absent from the
//!    responder's list are always rejected.
//! 3. A rejected proposer whose list is now exhausted is self-matched.
//!
//! The run settles when no free, non-self-matched proposer is left. Every
//! round but an all-empty-lists first round carries at least one proposal, so
//! a profile with `n` proposers and `m` responders settles within `n * m`
//! rounds.

use crate::core::error::MatchingError;
use crate::core::matching::Matching;
use crate::models::PreferenceProfile;

/// What happened in one round, by roster index
///
/// Every list is in proposer roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundEvents {
    pub round: usize,
    pub proposals: Vec<(usize, usize)>,
    pub rejections: Vec<(usize, usize)>,
    pub self_matched: Vec<usize>,
}

/// Outcome of a settled run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub rounds: usize,
    pub matching: Matching,
}

/// Round-by-round deferred acceptance over one immutable profile
#[derive(Debug, Clone)]
pub struct MatchingEngine<'a> {
    profile: &'a PreferenceProfile,
    /// Next untried position in each proposer's list
    cursors: Vec<usize>,
    exhausted: Vec<bool>,
    holds: Matching,
    round: usize,
    max_rounds: usize,
}

impl<'a> MatchingEngine<'a> {
    pub fn new(profile: &'a PreferenceProfile) -> Self {
        let proposers = profile.proposer_count();
        let responders = profile.responder_count();

        Self {
            profile,
            cursors: vec![0; proposers],
            // With nobody to propose to, the run is settled before it starts
            exhausted: vec![responders == 0; proposers],
            holds: Matching::for_profile(profile),
            round: 0,
            max_rounds: (proposers * responders).max(1),
        }
    }

    pub fn profile(&self) -> &'a PreferenceProfile {
        self.profile
    }

    /// Rounds executed so far
    pub fn round(&self) -> usize {
        self.round
    }

    /// Tentative matches currently held
    pub fn holds(&self) -> &Matching {
        &self.holds
    }

    #[inline]
    fn is_free(&self, proposer: usize) -> bool {
        self.holds.responder_for(proposer).is_none() && !self.exhausted[proposer]
    }

    /// No further round would change anything
    pub fn is_settled(&self) -> bool {
        (0..self.profile.proposer_count()).all(|p| !self.is_free(p))
    }

    /// Run one round; `Ok(None)` once settled
    pub fn step(&mut self) -> Result<Option<RoundEvents>, MatchingError> {
        if self.is_settled() {
            return Ok(None);
        }
        if self.round >= self.max_rounds {
            return Err(MatchingError::Internal(format!(
                "deferred acceptance still running after {} rounds",
                self.round
            )));
        }

        self.round += 1;
        let mut events = RoundEvents {
            round: self.round,
            ..RoundEvents::default()
        };

        for p in 0..self.profile.proposer_count() {
            if !self.is_free(p) {
                continue;
            }
            match self.profile.proposer_preferences(p).get(self.cursors[p]) {
                Some(&r) => {
                    self.cursors[p] += 1;
                    events.proposals.push((p, r));
                }
                None => {
                    self.exhausted[p] = true;
                    events.self_matched.push(p);
                }
            }
        }

        for i in 0..events.proposals.len() {
            let (p, r) = events.proposals[i];
            if let Some(rejected) = self.respond(p, r)? {
                events.rejections.push((rejected, r));
            }
        }
        events.rejections.sort_unstable();

        for &(p, _) in &events.rejections {
            if self.cursors[p] >= self.profile.proposer_preferences(p).len() {
                self.exhausted[p] = true;
                events.self_matched.push(p);
            }
        }
        events.self_matched.sort_unstable();

        tracing::debug!(
            "Round {}: {} proposals, {} rejections, {} self-matched",
            events.round,
            events.proposals.len(),
            events.rejections.len(),
            events.self_matched.len()
        );

        Ok(Some(events))
    }

    /// Responder `r` weighs an offer from `p`; returns whoever got turned away
    ///
    /// Comparing offers one at a time against the current holder keeps the
    /// single best by rank, so the outcome does not depend on offer order.
    fn respond(&mut self, p: usize, r: usize) -> Result<Option<usize>, MatchingError> {
        let Some(rank) = self.profile.responder_rank(r, p) else {
            return Ok(Some(p));
        };

        let Some(held) = self.holds.proposer_for(r) else {
            return self.hold(p, r).map(|_| None);
        };

        let held_rank = self.profile.responder_rank(r, held).ok_or_else(|| {
            MatchingError::Internal(format!(
                "{} holds {}, who is not on their list",
                self.profile.responder_name(r),
                self.profile.proposer_name(held)
            ))
        })?;

        if rank < held_rank {
            if !self.holds.unpair(held, r) {
                return Err(MatchingError::Internal(format!(
                    "{} and {} disagree about their tentative match",
                    self.profile.responder_name(r),
                    self.profile.proposer_name(held)
                )));
            }
            self.hold(p, r)?;
            Ok(Some(held))
        } else {
            Ok(Some(p))
        }
    }

    fn hold(&mut self, p: usize, r: usize) -> Result<(), MatchingError> {
        if self.holds.try_pair(p, r) {
            Ok(())
        } else {
            Err(MatchingError::Internal(format!(
                "{} proposed to {} while already held",
                self.profile.proposer_name(p),
                self.profile.responder_name(r)
            )))
        }
    }

    /// Consume the engine once settled
    pub fn finish(self) -> Result<Assignment, MatchingError> {
        if !self.is_settled() {
            return Err(MatchingError::Internal(format!(
                "finished after {} rounds with proposers still free",
                self.round
            )));
        }
        if !self.holds.is_consistent() {
            return Err(MatchingError::Internal(
                "tentative match bookkeeping is inconsistent".to_string(),
            ));
        }
        Ok(Assignment {
            rounds: self.round,
            matching: self.holds,
        })
    }

    /// Run to the fixed point
    pub fn run(mut self) -> Result<Assignment, MatchingError> {
        while self.step()?.is_some() {}
        self.finish()
    }
}
