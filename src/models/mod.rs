// Model exports
pub mod domain;
pub mod ordered_map;
pub mod profile;
pub mod requests;
pub mod responses;

pub use domain::{Pairing, PhaseView, Proposal, Rejection, RoundPhase, RoundStep, TentativeMatch};
pub use profile::{PreferenceProfile, ProfileError, Roster, Side};
pub use requests::{MatchingRequest, SimulateRequest, VerifyMatchingRequest};
pub use responses::{
    ErrorResponse, HealthResponse, MatchingResult, SimulationSummary, StabilityReport, StepsResult,
};
