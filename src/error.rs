//! Error types for Newscaster.

use thiserror::Error;

/// Library-level error type for Newscaster operations.
#[derive(Error, Debug)]
pub enum NewscasterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid briefing configuration: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("No audio data received: {0}")]
    EmptyResult(String),

    #[error("Audio payload could not be decoded: {0}")]
    Decode(String),

    #[error("A briefing is already in production")]
    Busy,

    #[error("Run {0} was superseded by a reset")]
    Superseded(u64),

    #[error("Unknown host pair: {0}")]
    UnknownHostPair(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl NewscasterError {
    /// Whether this error belongs to the run that produced it rather than to
    /// the caller (stale or rejected runs leave the pipeline state alone).
    pub fn is_terminal_for_run(&self) -> bool {
        !matches!(self, NewscasterError::Busy | NewscasterError::Superseded(_))
    }
}

impl From<reqwest::Error> for NewscasterError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            NewscasterError::Model(format!("Unreadable response: {}", e))
        } else {
            NewscasterError::Network(e.to_string())
        }
    }
}

/// Result type alias for Newscaster operations.
pub type Result<T> = std::result::Result<T, NewscasterError>;
