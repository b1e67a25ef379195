//! Base64 data-URL encoding and decoding.
//!
//! Callers send media either as `data:<mime>;base64,<payload>` or as a bare
//! base64 payload. Bare payloads are assumed to be PNG.

use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};

pub const DEFAULT_MIME: &str = "image/png";
pub const PDF_MIME: &str = "application/pdf";

const DATA_PREFIX: &str = "data:";

/// A decoded media payload together with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Parse a data URL or bare base64 string.
    pub fn parse(input: &str) -> Result<Self> {
        let (mime_type, payload) = split_header(input.trim())?;
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

        let bytes = STANDARD.decode(cleaned.as_bytes()).map_err(|e| {
            Error::MalformedMedia(format!("invalid base64 payload for {}: {}", mime_type, e))
        })?;

        Ok(Self { mime_type, bytes })
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type.to_ascii_lowercase().contains("pdf")
    }

    /// Payload as base64 text, without the `data:` header.
    pub fn base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn to_url(&self) -> String {
        format!("{}{};base64,{}", DATA_PREFIX, self.mime_type, self.base64())
    }
}

fn split_header(input: &str) -> Result<(String, &str)> {
    let Some(rest) = input.strip_prefix(DATA_PREFIX) else {
        return Ok((DEFAULT_MIME.to_string(), input));
    };

    let (header, payload) = rest.split_once(',').ok_or_else(|| {
        Error::MalformedMedia("data URL is missing the ',' payload separator".to_string())
    })?;

    let mime = header.split(';').next().unwrap_or_default().trim();
    let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };

    Ok((mime.to_string(), payload))
}

/// Decode a data URL (or bare base64) into its MIME type and raw bytes.
pub fn decode(input: &str) -> Result<(String, Vec<u8>)> {
    let url = DataUrl::parse(input)?;
    Ok((url.mime_type, url.bytes))
}

/// Encode raw bytes as a `data:<mime>;base64,` URL.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!("{}{};base64,{}", DATA_PREFIX, mime_type, STANDARD.encode(bytes))
}
