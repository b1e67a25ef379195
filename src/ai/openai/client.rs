use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatMessageContent, MessagePart,
};
use crate::ai::ProviderFamily;
use crate::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const FAMILY: ProviderFamily = ProviderFamily::OpenAiCompatible;

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 4096;

/// Client for any endpoint exposing an OpenAI-style `/chat/completions`.
pub struct OpenAiHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiHttpClient {
    /// `base_url` is the API root including its version segment
    /// (`https://api.openai.com/v1`). Blank falls back to OpenAI itself.
    pub fn new_with_client(api_key: String, base_url: &str, client: Client) -> Self {
        let base_url = base_url.trim().trim_end_matches('/');
        let base_url = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        Self {
            client,
            api_key,
            base_url: base_url.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to {}: {}", url, e);
                Error::upstream(FAMILY, format!("request failed: {}", e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::upstream(FAMILY, format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::error!("Chat completion API error (status {}): {}", status, body);
            return Err(Error::upstream(
                FAMILY,
                format!("API error (status {}): {}", status, body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse chat completion response: {}\nBody: {}", e, body);
            Error::upstream(FAMILY, format!("Failed to parse response: {}", e))
        })
    }

    /// Send a single user message and return the first choice's text.
    pub async fn chat_completion(&self, model: &str, content: ChatMessageContent) -> Result<String> {
        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(content),
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response: ChatCompletionResponse = self.post("/chat/completions", &request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::upstream(FAMILY, "No choices in chat completion response"))?;

        tracing::debug!("Chat completion finish_reason: {:?}", choice.finish_reason);

        match choice.message.content {
            Some(ChatMessageContent::Text(text)) => Ok(text),
            Some(ChatMessageContent::Parts(parts)) => {
                let text: String = parts
                    .into_iter()
                    .filter_map(|part| match part {
                        MessagePart::Text { text } => Some(text),
                        MessagePart::ImageUrl { image_url } => Some(image_url.url),
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(text)
            }
            None => Err(Error::upstream(
                FAMILY,
                "Chat completion response has no message content",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> OpenAiHttpClient {
        OpenAiHttpClient::new_with_client(
            "test-key".to_string(),
            &format!("{}/v1/", server.uri()),
            Client::new(),
        )
    }

    fn completion(content: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        }))
    }

    #[test]
    fn test_blank_base_url_falls_back_to_openai() {
        let client = OpenAiHttpClient::new_with_client("k".to_string(), "  ", Client::new());
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
    }

    #[tokio::test]
    async fn test_chat_completion_parses_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(completion(serde_json::json!("A layered diagram")))
            .mount(&server)
            .await;

        let text = make_client(&server)
            .chat_completion("gpt-4o", ChatMessageContent::Text("hi".to_string()))
            .await
            .unwrap();
        assert_eq!(text, "A layered diagram");
    }

    #[tokio::test]
    async fn test_chat_completion_sends_fixed_sampling_parameters() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "custom-model",
                "temperature": 0.7,
                "max_tokens": 4096,
                "messages": [{ "role": "user", "content": "hi" }]
            })))
            .respond_with(completion(serde_json::json!("ok")))
            .expect(1)
            .mount(&server)
            .await;

        make_client(&server)
            .chat_completion("custom-model", ChatMessageContent::Text("hi".to_string()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_api_error_returns_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .chat_completion("gpt-4o", ChatMessageContent::Text("hi".to_string()))
            .await
            .unwrap_err();

        match err {
            Error::UpstreamProvider { family, message } => {
                assert_eq!(family, ProviderFamily::OpenAiCompatible);
                assert!(message.contains("401"));
                assert!(message.contains("invalid api key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_null_content_is_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(completion(serde_json::Value::Null))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .chat_completion("gpt-4o", ChatMessageContent::Text("hi".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamProvider { .. }));
    }

    #[tokio::test]
    async fn test_unparseable_body_is_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .chat_completion("gpt-4o", ChatMessageContent::Text("hi".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamProvider { .. }));
    }
}
