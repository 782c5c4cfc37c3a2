use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::{ordered_map, Roster};

/// Request to compute a matching or its trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingRequest {
    pub proposer_preferences: Roster,
    pub responder_preferences: Roster,
    /// Let the responders propose instead
    #[serde(default)]
    pub swap_sides: bool,
}

/// Request to check an externally supplied matching for stability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyMatchingRequest {
    pub proposer_preferences: Roster,
    pub responder_preferences: Roster,
    /// proposer -> responder
    #[serde(with = "ordered_map")]
    pub matches: Vec<(String, String)>,
}

/// Request to run a batch of random simulations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SimulateRequest {
    #[validate(range(min = 1))]
    pub proposers: usize,
    #[validate(range(min = 1))]
    pub responders: usize,
    #[serde(default = "default_simulations")]
    #[validate(range(min = 1))]
    pub simulations: usize,
    /// Share of the opposite side each person finds acceptable
    #[serde(default = "default_acceptance")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub acceptance: f64,
    #[serde(default)]
    pub seed: u64,
}

fn default_simulations() -> usize {
    100
}

fn default_acceptance() -> f64 {
    1.0
}
