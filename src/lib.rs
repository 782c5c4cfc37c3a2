//! Stable Match - deferred acceptance matching service
//!
//! This library computes proposer-optimal stable matchings between two groups
//! with ranked preference lists. It can trace every round of the algorithm and
//! verify the stability of any matching against a preference profile.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use core::{Matcher, MatcherLimits, MatchingError, Simulator, StabilityVerifier};
pub use models::{
    MatchingResult, PreferenceProfile, Roster, RoundStep, StabilityReport, StepsResult,
};
