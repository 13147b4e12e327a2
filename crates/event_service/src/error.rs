//! Error types for the event service.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Event feed unavailable: {0}")]
    Feed(#[source] external_services::Error),

    #[error("Weather data unavailable: {0}")]
    Weather(#[source] external_services::Error),

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// Whether the caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Feed(e) | Error::Weather(e) => e.is_retryable(),
            Error::NotFound(_) | Error::UnknownCity(_) | Error::InvalidRequest(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
