//! Error types for external services.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },
}

impl Error {
    /// Whether retrying the same request may succeed.
    ///
    /// Client errors (4xx) and malformed bodies are not retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => !e.is_decode(),
            Error::Api { status, .. } => *status >= 500 || *status == 429,
            Error::Json(_) | Error::InvalidResponse(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
