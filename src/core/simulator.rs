use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::error::MatchingError;
use crate::core::matcher::Matcher;
use crate::models::{PreferenceProfile, Roster, SimulationSummary};

/// Shape of the random profiles to generate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub proposers: usize,
    pub responders: usize,
    /// Share of the opposite side each person ranks, 0.0 to 1.0
    pub acceptance: f64,
    pub seed: u64,
}

/// Generates random preference profiles and runs the matcher over them
///
/// Uses a seeded RNG for reproducibility. Same seed = same profiles.
#[derive(Debug)]
pub struct Simulator {
    config: SimulationConfig,
    rng: ChaCha8Rng,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Proposers are named `p_1..`, responders `r_1..`
    pub fn generate_rosters(&mut self) -> (Roster, Roster) {
        let proposer_names = names("p", self.config.proposers);
        let responder_names = names("r", self.config.responders);

        let proposers = self.random_roster(&proposer_names, &responder_names);
        let responders = self.random_roster(&responder_names, &proposer_names);
        (proposers, responders)
    }

    /// Rosters over the matcher's participant limit are refused before generation
    pub fn generate_profile(
        &mut self,
        matcher: &Matcher,
    ) -> Result<PreferenceProfile, MatchingError> {
        self.check_limits(matcher)?;
        let (proposers, responders) = self.generate_rosters();
        matcher.build_profile(&proposers, &responders, false)
    }

    /// Run `simulations` independent random profiles through the matcher
    pub fn run(
        &mut self,
        matcher: &Matcher,
        simulations: usize,
    ) -> Result<SimulationSummary, MatchingError> {
        self.check_limits(matcher)?;

        let mut summary = SimulationSummary {
            simulations,
            proposers: self.config.proposers,
            responders: self.config.responders,
            total_rounds: 0,
            max_rounds: 0,
            mean_rounds: 0.0,
            stable_count: 0,
            all_matched_count: 0,
        };

        for i in 0..simulations {
            let profile = self.generate_profile(matcher)?;
            let result = matcher.match_profile(&profile)?;
            tracing::debug!(
                "Simulation {}: {} rounds, stable: {}",
                i + 1,
                result.rounds,
                result.is_stable
            );

            summary.total_rounds += result.rounds;
            summary.max_rounds = summary.max_rounds.max(result.rounds);
            if result.is_stable {
                summary.stable_count += 1;
            }
            if result.all_matched {
                summary.all_matched_count += 1;
            }
        }

        if simulations > 0 {
            summary.mean_rounds = summary.total_rounds as f64 / simulations as f64;
        }

        tracing::info!(
            "Ran {} simulations ({}x{}): mean {:.2} rounds, {} stable",
            simulations,
            self.config.proposers,
            self.config.responders,
            summary.mean_rounds,
            summary.stable_count
        );

        Ok(summary)
    }

    fn check_limits(&self, matcher: &Matcher) -> Result<(), MatchingError> {
        matcher
            .limits()
            .check_sizes(self.config.proposers, self.config.responders)
            .map_err(MatchingError::from)
    }

    fn random_roster(&mut self, people: &[String], candidates: &[String]) -> Roster {
        let keep = list_length(self.config.acceptance, candidates.len());
        let mut roster = Roster::new();
        for person in people {
            let mut list: Vec<&String> = candidates.iter().collect();
            list.shuffle(&mut self.rng);
            list.truncate(keep);
            roster.push(person.as_str(), list.into_iter().map(String::as_str));
        }
        roster
    }
}

fn names(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{}_{}", prefix, i)).collect()
}

#[inline]
fn list_length(acceptance: f64, candidates: usize) -> usize {
    let share = acceptance.clamp(0.0, 1.0);
    ((candidates as f64) * share).round() as usize
}
