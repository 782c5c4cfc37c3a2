use crate::core::engine::{Assignment, MatchingEngine, RoundEvents};
use crate::core::error::MatchingError;
use crate::core::matching::Matching;
use crate::models::{Pairing, PreferenceProfile, RoundStep};

/// Records one [`RoundStep`] per executed round
///
/// Only reads engine state between rounds, so a traced run settles exactly
/// like an untraced one.
#[derive(Debug)]
pub struct TraceRecorder<'a> {
    engine: MatchingEngine<'a>,
    steps: Vec<RoundStep>,
}

impl<'a> TraceRecorder<'a> {
    pub fn new(profile: &'a PreferenceProfile) -> Self {
        Self {
            engine: MatchingEngine::new(profile),
            steps: Vec::new(),
        }
    }

    /// Run to the fixed point, returning the outcome and the trace
    pub fn record(mut self) -> Result<(Assignment, Vec<RoundStep>), MatchingError> {
        while let Some(events) = self.engine.step()? {
            let step = self.snapshot(&events);
            self.steps.push(step);
        }
        let assignment = self.engine.finish()?;
        Ok((assignment, self.steps))
    }

    fn snapshot(&self, events: &RoundEvents) -> RoundStep {
        let profile = self.engine.profile();
        let pairing = |(p, r): (usize, usize)| {
            Pairing::new(profile.proposer_name(p), profile.responder_name(r))
        };

        RoundStep {
            round: events.round,
            proposals: events.proposals.iter().copied().map(pairing).collect(),
            rejections: events.rejections.iter().copied().map(pairing).collect(),
            tentative_matches: self.engine.holds().pairs().map(pairing).collect(),
            self_matches: events
                .self_matched
                .iter()
                .map(|&p| profile.proposer_name(p).to_string())
                .collect(),
        }
    }

    /// Fold a trace back into the assignment it describes
    ///
    /// Steps are applied in order with last write winning per proposer: a
    /// rejection drops the proposer's hold on that responder, a tentative match
    /// sets it.
    pub fn replay(
        profile: &PreferenceProfile,
        steps: &[RoundStep],
    ) -> Result<Assignment, MatchingError> {
        let mut holds: Vec<Option<usize>> = vec![None; profile.proposer_count()];

        for (position, step) in steps.iter().enumerate() {
            if step.round != position + 1 {
                return Err(MatchingError::InvalidTrace(format!(
                    "step {} is numbered round {}",
                    position + 1,
                    step.round
                )));
            }
            for rejection in &step.rejections {
                let (p, r) = resolve(profile, rejection)?;
                if holds[p] == Some(r) {
                    holds[p] = None;
                }
            }
            for tentative in &step.tentative_matches {
                let (p, r) = resolve(profile, tentative)?;
                holds[p] = Some(r);
            }
        }

        let mut matching = Matching::for_profile(profile);
        for (p, r) in holds.into_iter().enumerate() {
            if let Some(r) = r {
                if !matching.try_pair(p, r) {
                    return Err(MatchingError::InvalidTrace(format!(
                        "{} is held by more than one proposer",
                        profile.responder_name(r)
                    )));
                }
            }
        }

        Ok(Assignment {
            rounds: steps.len(),
            matching,
        })
    }
}

fn resolve(
    profile: &PreferenceProfile,
    pairing: &Pairing,
) -> Result<(usize, usize), MatchingError> {
    let p = profile.proposer_index(&pairing.proposer).ok_or_else(|| {
        MatchingError::InvalidTrace(format!("{} is not a proposer", pairing.proposer))
    })?;
    let r = profile.responder_index(&pairing.responder).ok_or_else(|| {
        MatchingError::InvalidTrace(format!("{} is not a responder", pairing.responder))
    })?;
    Ok((p, r))
}
