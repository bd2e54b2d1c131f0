use thiserror::Error;

/// Failures surfaced by consist operations. Every error is detected before any
/// state is touched, so a failed call leaves the train exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsistError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    NotFound(String),
}

impl ConsistError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConsistError::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ConsistError::NotFound(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ConsistError>;
