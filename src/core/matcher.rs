use crate::core::{
    engine::{Assignment, MatchingEngine},
    error::MatchingError,
    matching::Matching,
    stability::StabilityVerifier,
    trace::TraceRecorder,
};
use crate::models::{
    MatchingResult, PreferenceProfile, ProfileError, RoundStep, Roster, Side, StabilityReport,
    StepsResult,
};

/// Size limits applied before any computation starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherLimits {
    /// Per side
    pub max_participants: usize,
}

impl Default for MatcherLimits {
    fn default() -> Self {
        Self { max_participants: 500 }
    }
}

impl MatcherLimits {
    /// Reject oversized groups from their counts alone, before anything is built
    pub fn check_sizes(&self, proposers: usize, responders: usize) -> Result<(), ProfileError> {
        for (side, count) in [(Side::Proposer, proposers), (Side::Responder, responders)] {
            if count > self.max_participants {
                return Err(ProfileError::TooManyParticipants {
                    side,
                    count,
                    limit: self.max_participants,
                });
            }
        }
        Ok(())
    }
}

/// Main matching orchestrator - ties the engine, trace recorder and stability
/// verifier together into the two message contracts
///
/// # Pipeline
/// 1. Profile validation (roster invariants and size limits)
/// 2. Deferred acceptance, optionally traced round by round
/// 3. Stability and individual-rationality verification
/// 4. Result assembly
#[derive(Debug, Clone)]
pub struct Matcher {
    limits: MatcherLimits,
}

impl Matcher {
    pub fn new(limits: MatcherLimits) -> Self {
        Self { limits }
    }

    pub fn with_default_limits() -> Self {
        Self {
            limits: MatcherLimits::default(),
        }
    }

    pub fn limits(&self) -> MatcherLimits {
        self.limits
    }

    /// Validate both rosters into a profile
    ///
    /// With `swap_sides` the responders take the proposing role.
    pub fn build_profile(
        &self,
        proposers: &Roster,
        responders: &Roster,
        swap_sides: bool,
    ) -> Result<PreferenceProfile, MatchingError> {
        self.limits.check_sizes(proposers.len(), responders.len())?;

        let profile = PreferenceProfile::new(proposers, responders)?;
        Ok(if swap_sides { profile.swapped() } else { profile })
    }

    /// Compute the proposer-optimal stable matching with diagnostics
    pub fn match_profile(
        &self,
        profile: &PreferenceProfile,
    ) -> Result<MatchingResult, MatchingError> {
        let assignment = MatchingEngine::new(profile).run()?;
        let result = summarize(profile, &assignment);

        tracing::debug!(
            "Matched {} of {} proposers in {} rounds (stable: {})",
            result.matches.len(),
            profile.proposer_count(),
            result.rounds,
            result.is_stable
        );

        Ok(result)
    }

    /// Same as [`Matcher::match_profile`], keeping every round
    pub fn trace_profile(&self, profile: &PreferenceProfile) -> Result<StepsResult, MatchingError> {
        let (assignment, steps) = TraceRecorder::new(profile).record()?;
        let final_result = summarize(profile, &assignment);

        tracing::debug!(
            "Traced {} rounds for {} proposers and {} responders",
            steps.len(),
            profile.proposer_count(),
            profile.responder_count()
        );

        Ok(StepsResult { steps, final_result })
    }

    /// Check a matching supplied by the caller
    pub fn verify_matching<'n, I>(
        &self,
        profile: &PreferenceProfile,
        pairs: I,
    ) -> Result<StabilityReport, MatchingError>
    where
        I: IntoIterator<Item = (&'n str, &'n str)>,
    {
        let matching = Matching::from_named_pairs(profile, pairs)?;
        Ok(StabilityVerifier::new(profile).verify(&matching))
    }

    /// Rebuild the final result from a recorded trace
    pub fn replay(
        &self,
        profile: &PreferenceProfile,
        steps: &[RoundStep],
    ) -> Result<MatchingResult, MatchingError> {
        let assignment = TraceRecorder::replay(profile, steps)?;
        Ok(summarize(profile, &assignment))
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_limits()
    }
}

fn summarize(profile: &PreferenceProfile, assignment: &Assignment) -> MatchingResult {
    let matching = &assignment.matching;
    let report = StabilityVerifier::new(profile).verify(matching);

    let matches = matching
        .pairs()
        .map(|(p, r)| {
            (
                profile.proposer_name(p).to_string(),
                profile.responder_name(r).to_string(),
            )
        })
        .collect();
    let unmatched: Vec<String> = matching
        .unmatched_responders()
        .map(|r| profile.responder_name(r).to_string())
        .collect();
    let self_matches: Vec<String> = matching
        .unmatched_proposers()
        .map(|p| profile.proposer_name(p).to_string())
        .collect();

    MatchingResult {
        rounds: assignment.rounds,
        matches,
        all_matched: unmatched.is_empty() && self_matches.is_empty(),
        unmatched,
        self_matches,
        is_stable: report.is_stable,
        is_individually_rational: report.is_individually_rational,
        blocking_pairs: report.blocking_pairs,
    }
}
