use thiserror::Error;

pub use shared::error::{FetchError, ValidationError};

/// Synchronous rejection of an `invoke` before any network call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("operation already pending")]
    Busy,
    #[error("no chapter is currently open")]
    NoActiveChapter,
}
