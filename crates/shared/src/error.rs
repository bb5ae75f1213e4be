use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error envelope returned by the remote service on failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Outcome classification for any remote service call.
///
/// `NoContent` is the one domain-level failure the generation endpoints can
/// signal; everything else is either a missing identifier or a transport
/// problem the user may retry manually.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("not found")]
    NotFound,
    #[error("chapter has no content to process")]
    NoContent,
    #[error("service request failed: {0}")]
    Transient(String),
    #[error("unexpected response shape: {0}")]
    Schema(String),
}

impl FetchError {
    /// One human-readable line suitable for direct display.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::NotFound => "Not found.".to_string(),
            FetchError::NoContent => "This chapter has no content to process.".to_string(),
            FetchError::Transient(_) | FetchError::Schema(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

/// Local input rejection; never causes a network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("doubt text must not be empty")]
    EmptyDoubt,
    #[error("concept must not be empty")]
    MissingConcept,
    #[error("grade must not be empty")]
    MissingGrade,
    #[error("concept and grade must not be empty")]
    MissingConceptAndGrade,
    #[error("count must be a positive integer")]
    NonPositiveCount,
}
