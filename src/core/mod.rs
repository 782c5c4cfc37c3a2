// Core algorithm exports
pub mod engine;
pub mod error;
pub mod matcher;
pub mod matching;
pub mod simulator;
pub mod stability;
pub mod trace;

pub use engine::{Assignment, MatchingEngine, RoundEvents};
pub use error::MatchingError;
pub use matcher::{Matcher, MatcherLimits};
pub use matching::Matching;
pub use simulator::{SimulationConfig, Simulator};
pub use stability::StabilityVerifier;
pub use trace::TraceRecorder;
