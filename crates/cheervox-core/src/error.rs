//! Error types for the cheer-to-speech pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type CheerResult<T> = Result<T, CheerError>;

/// Errors that can occur while processing a cheer task
#[derive(Error, Debug)]
pub enum CheerError {
    #[error("TTS error: {0}")]
    Tts(String),

    #[error("Audio decode error: {0}")]
    Decode(String),

    #[error("Audio playback error: {0}")]
    Playback(String),

    #[error("Audit log error: {0}")]
    Audit(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel send error: {0}")]
    ChannelSend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<hound::Error> for CheerError {
    fn from(err: hound::Error) -> Self {
        CheerError::Decode(err.to_string())
    }
}
