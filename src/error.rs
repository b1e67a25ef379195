//! Error handling and custom error types
//!
//! Provides unified error handling across the gateway using thiserror.

use crate::ai::ProviderFamily;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or blank credential. Correctable by the caller.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Visual Schema does not carry the required markers.
    #[error("Invalid Schema Format: {0}")]
    Format(String),

    #[error("Malformed media: {0}")]
    MalformedMedia(String),

    #[error("{family} provider error: {message}")]
    UpstreamProvider {
        family: ProviderFamily,
        message: String,
    },

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

impl Error {
    pub fn upstream(family: ProviderFamily, message: impl Into<String>) -> Self {
        Self::UpstreamProvider {
            family,
            message: message.into(),
        }
    }

    /// True for failures the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Format(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
