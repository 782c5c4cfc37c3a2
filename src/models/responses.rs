use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::models::domain::RoundStep;

/// Final matching plus stability diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingResult {
    pub rounds: usize,
    /// Matched pairs only, proposer -> responder
    pub matches: BTreeMap<String, String>,
    /// Responders nobody ended up holding
    pub unmatched: Vec<String>,
    /// Proposers who exhausted their list
    pub self_matches: Vec<String>,
    pub all_matched: bool,
    pub is_stable: bool,
    pub is_individually_rational: bool,
    pub blocking_pairs: Vec<(String, String)>,
}

/// Round-by-round trace of a run together with its outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepsResult {
    pub steps: Vec<RoundStep>,
    pub final_result: MatchingResult,
}

/// Stability check of a single matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilityReport {
    pub is_stable: bool,
    pub is_individually_rational: bool,
    pub blocking_pairs: Vec<(String, String)>,
}

/// Aggregate over a batch of random simulations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub simulations: usize,
    pub proposers: usize,
    pub responders: usize,
    pub total_rounds: usize,
    pub max_rounds: usize,
    pub mean_rounds: f64,
    pub stable_count: usize,
    pub all_matched_count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
