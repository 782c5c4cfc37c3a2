use thiserror::Error;
use crate::models::ProfileError;

/// Errors that can occur while computing or checking a matching
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchingError {
    #[error("Invalid preference profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    #[error("Invalid matching: {0}")]
    InvalidMatching(String),

    #[error("Invalid trace: {0}")]
    InvalidTrace(String),

    /// Engine bookkeeping went inconsistent; never a caller mistake
    #[error("Internal engine failure: {0}")]
    Internal(String),
}

impl MatchingError {
    /// True when the caller supplied bad input rather than the engine failing
    pub fn is_validation(&self) -> bool {
        !matches!(self, MatchingError::Internal(_))
    }
}
