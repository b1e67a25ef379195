use super::gemini::GeminiHttpClient;
use super::openai::OpenAiHttpClient;
use super::{ProviderInvoker, ProviderPayload};
use crate::models::EndpointConfig;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

/// Dispatches a payload to the HTTP client for its provider family.
///
/// One connection pool is shared across requests; each call builds a
/// short-lived provider client carrying that request's credential.
pub struct HttpProviderInvoker {
    client: Client,
    gemini_base_url: Option<String>,
}

impl HttpProviderInvoker {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            gemini_base_url: None,
        }
    }

    /// Point Google Generative calls at a different host.
    pub fn with_gemini_base_url(mut self, base_url: String) -> Self {
        self.gemini_base_url = Some(base_url);
        self
    }
}

#[async_trait]
impl ProviderInvoker for HttpProviderInvoker {
    async fn invoke(&self, config: &EndpointConfig, payload: ProviderPayload) -> Result<String> {
        info!(
            "Calling {} endpoint {} (model: {})",
            payload.family(),
            config.base_url,
            config.model_name
        );

        match payload {
            ProviderPayload::Google(parts) => {
                let mut gemini = GeminiHttpClient::new_with_client(
                    config.api_key.clone(),
                    config.model_name.clone(),
                    self.client.clone(),
                );
                if let Some(base_url) = &self.gemini_base_url {
                    gemini = gemini.with_base_url(base_url.clone());
                }
                gemini.generate_content(parts).await
            }
            ProviderPayload::OpenAi(content) => {
                OpenAiHttpClient::new_with_client(
                    config.api_key.clone(),
                    &config.base_url,
                    self.client.clone(),
                )
                .chat_completion(&config.model_name, content)
                .await
            }
        }
    }
}
