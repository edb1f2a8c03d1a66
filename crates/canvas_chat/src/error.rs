//! Error types for the chat pipeline.

use thiserror::Error;

/// Result type alias for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;

/// Errors that can occur in the composition and delivery pipeline.
///
/// Gateway failures are not surfaced here: the send coordinator folds every
/// [`TransportError`](crate::gateway::TransportError) into an
/// in-conversation failure message.
#[derive(Error, Debug)]
pub enum ChatError {
    /// A recording is already staged and has not been sent yet.
    #[error("An audio clip is already staged; send or discard it before recording again")]
    AudioAlreadyStaged,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
