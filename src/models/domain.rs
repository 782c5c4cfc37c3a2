use serde::{Deserialize, Serialize};

/// A (proposer, responder) pair: an offer, a refusal, or a held match
/// depending on which list of a [`RoundStep`] it appears in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    pub proposer: String,
    pub responder: String,
}

impl Pairing {
    pub fn new(proposer: impl Into<String>, responder: impl Into<String>) -> Self {
        Self {
            proposer: proposer.into(),
            responder: responder.into(),
        }
    }
}

pub type Proposal = Pairing;
pub type Rejection = Pairing;
pub type TentativeMatch = Pairing;

/// Snapshot of one synchronized round of deferred acceptance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStep {
    /// 1-based
    pub round: usize,
    pub proposals: Vec<Proposal>,
    pub rejections: Vec<Rejection>,
    /// Every match held once the round's responses are in
    pub tentative_matches: Vec<TentativeMatch>,
    /// Proposers whose list ran out during this round
    pub self_matches: Vec<String>,
}

/// Playback sub-phases of a single round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Proposals,
    Responses,
    Matches,
}

/// What a step-through view shows for one sub-phase of a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseView<'a> {
    Proposals {
        offers: &'a [Proposal],
    },
    Responses {
        accepted: Vec<&'a Proposal>,
        rejected: &'a [Rejection],
    },
    Matches {
        held: &'a [TentativeMatch],
        self_matched: &'a [String],
    },
}

impl RoundStep {
    /// Project the round onto one playback sub-phase
    pub fn phase(&self, phase: RoundPhase) -> PhaseView<'_> {
        match phase {
            RoundPhase::Proposals => PhaseView::Proposals {
                offers: &self.proposals,
            },
            RoundPhase::Responses => PhaseView::Responses {
                accepted: self
                    .proposals
                    .iter()
                    .filter(|offer| self.tentative_matches.contains(*offer))
                    .collect(),
                rejected: &self.rejections,
            },
            RoundPhase::Matches => PhaseView::Matches {
                held: &self.tentative_matches,
                self_matched: &self.self_matches,
            },
        }
    }

    pub fn phases(&self) -> [PhaseView<'_>; 3] {
        [
            self.phase(RoundPhase::Proposals),
            self.phase(RoundPhase::Responses),
            self.phase(RoundPhase::Matches),
        ]
    }
}
