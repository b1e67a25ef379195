//! Data models and structures
//!
//! Request and response bodies for the HTTP boundary, per-request endpoint
//! configuration, and process configuration.

use crate::media::DEFAULT_DPI;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Caller-supplied provider endpoint. Lives only as long as its request.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub model_name: String,
}

impl EndpointConfig {
    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateSchemaRequest {
    pub paper_content: String,
    #[serde(default)]
    pub input_images: Option<Vec<String>>,
    pub config: EndpointConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateSchemaResponse {
    pub schema: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderImageRequest {
    pub visual_schema: String,
    #[serde(default)]
    pub reference_images: Option<Vec<String>>,
    pub config: EndpointConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "Academic Illustrator Agent".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
}

// Configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub pdfium_lib_path: Option<PathBuf>,
    pub raster_dpi: u32,
}

impl ServerConfig {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| crate::Error::Configuration(format!("Invalid PORT '{}'", value)))?,
            Err(_) => 8000,
        };

        let raster_dpi = match std::env::var("RASTER_DPI") {
            Ok(value) => value.parse().map_err(|_| {
                crate::Error::Configuration(format!("Invalid RASTER_DPI '{}'", value))
            })?,
            Err(_) => DEFAULT_DPI,
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            pdfium_lib_path: std::env::var("PDFIUM_LIB_PATH").ok().map(PathBuf::from),
            raster_dpi,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_request_deserialization() {
        let request: GenerateSchemaRequest = serde_json::from_value(serde_json::json!({
            "paper_content": "We propose...",
            "input_images": ["data:image/png;base64,AAAA"],
            "config": {
                "baseUrl": "https://api.openai.com/v1",
                "apiKey": "sk-test",
                "modelName": "gpt-4o"
            }
        }))
        .unwrap();

        assert_eq!(request.paper_content, "We propose...");
        assert_eq!(request.input_images.unwrap().len(), 1);
        assert_eq!(request.config.model_name, "gpt-4o");
        assert!(request.config.has_credential());
    }

    #[test]
    fn test_render_request_without_references() {
        let request: RenderImageRequest = serde_json::from_value(serde_json::json!({
            "visual_schema": "---BEGIN PROMPT------END PROMPT---",
            "reference_images": null,
            "config": { "baseUrl": "", "apiKey": "", "modelName": "m" }
        }))
        .unwrap();

        assert!(request.reference_images.is_none());
        assert!(!request.config.has_credential());
    }

    #[test]
    fn test_whitespace_key_is_not_a_credential() {
        let config = EndpointConfig {
            base_url: String::new(),
            api_key: " \t\n".to_string(),
            model_name: "m".to_string(),
        };
        assert!(!config.has_credential());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = EndpointConfig {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: "sk-very-secret".to_string(),
            model_name: "gpt-4o".to_string(),
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_health_response_shape() {
        let json = serde_json::to_value(HealthResponse::healthy()).unwrap();
        assert_eq!(json["status"], "healthy");
    }
}
