use std::time::Duration;

use thiserror::Error;

/// Failure taxonomy for the reply pipeline.
///
/// `Unavailable` and `Timeout` are absorbed by the aggregator and never reach callers of
/// reply generation; `Cancelled` is a normal termination and is never shown to the user.
#[derive(Error, Debug)]
pub enum ReplyError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Service timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Generation cancelled")]
    Cancelled,

    #[error("{0}")]
    Upstream(String),

    #[error("Stream transport error: {0}")]
    Transport(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ReplyError {
    /// True for failures that only mean "enrichment absent".
    pub fn is_absent(&self) -> bool {
        matches!(self, ReplyError::Unavailable(_) | ReplyError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, ReplyError>;
