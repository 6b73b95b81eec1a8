//! Error handling and custom error types
//!
//! Provides unified error handling across the service using thiserror. Each
//! variant maps to exactly one HTTP outcome in [`crate::server`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Gemini client is not configured")]
    NotConfigured,

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Gemini returned an empty response.")]
    EmptyResponse,

    #[error("{0}")]
    AiProvider(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

impl Error {
    /// True for failures that came from (or on the way to) the Gemini API.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::EmptyResponse | Error::AiProvider(_) | Error::Http(_) | Error::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
