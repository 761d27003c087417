use thiserror::Error;

/// Failures of the question pipeline. A reply that fails to parse as JSON is
/// not one of them: it degrades to an empty [`crate::models::QuizRecord`].
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("model call failed: {0}")]
    ModelCall(String),

    #[error("failed to persist log entry: {0}")]
    Persistence(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;
