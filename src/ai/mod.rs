//! AI provider integration
//!
//! Builds multimodal payloads for Google Generative Language and
//! OpenAI-compatible chat completion endpoints, invokes them, and interprets
//! what comes back.

pub mod assembler;
pub mod gemini;
pub mod interpret;
pub mod invoker;
pub mod mock;
pub mod openai;

pub use assembler::{ContentAssembler, ProviderPayload};
pub use interpret::{interpret, Interpretation};
pub use invoker::HttpProviderInvoker;
pub use mock::MockProviderInvoker;

use crate::models::EndpointConfig;
use crate::Result;
use async_trait::async_trait;
use std::fmt;

/// Wire-protocol family spoken by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderFamily {
    GoogleGenerative,
    OpenAiCompatible,
}

impl ProviderFamily {
    const GOOGLE_MARKERS: [&'static str; 3] = ["googleapis", "generativelanguage", "google"];

    /// Classify an endpoint by plain substring match on its URL.
    pub fn classify(endpoint_url: &str) -> Self {
        if Self::GOOGLE_MARKERS
            .iter()
            .any(|marker| endpoint_url.contains(marker))
        {
            Self::GoogleGenerative
        } else {
            Self::OpenAiCompatible
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoogleGenerative => write!(f, "Google Generative"),
            Self::OpenAiCompatible => write!(f, "OpenAI-compatible"),
        }
    }
}

/// Sends one assembled payload to a provider and returns its raw text answer.
#[async_trait]
pub trait ProviderInvoker: Send + Sync {
    async fn invoke(&self, config: &EndpointConfig, payload: ProviderPayload) -> Result<String>;
}
