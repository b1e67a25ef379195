//! Recovers a generated image from a provider's free-form answer.
//!
//! Chat-completion style endpoints are not obliged to return images, so the
//! answer is run through an ordered list of extractors and the first hit wins.
//! When nothing looks like an image, the text is handed back unchanged.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const BARE_BASE64_MIN_LEN: usize = 1000;

static RE_DATA_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"data:image/[^;]+;base64,[A-Za-z0-9+/=]+").unwrap());

/// Outcome of interpreting a provider answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretation {
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

type Extractor = fn(&str) -> Option<String>;

/// Extractors in priority order.
const EXTRACTORS: &[(&str, Extractor)] = &[
    ("embedded data URL", embedded_data_url),
    ("bare base64 body", bare_base64),
];

fn embedded_data_url(raw: &str) -> Option<String> {
    RE_DATA_URL.find(raw).map(|m| m.as_str().to_string())
}

// Long alphanumeric text with no prefix is assumed to be a PNG body.
fn bare_base64(raw: &str) -> Option<String> {
    if raw.chars().count() <= BARE_BASE64_MIN_LEN {
        return None;
    }

    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() || !compact.chars().all(char::is_alphanumeric) {
        return None;
    }

    Some(format!("data:image/png;base64,{}", raw.trim()))
}

pub fn interpret(raw: &str) -> Interpretation {
    for (name, extract) in EXTRACTORS {
        if let Some(image_url) = extract(raw) {
            tracing::debug!("Provider response interpreted as image via {}", name);
            return Interpretation {
                image_url: Some(image_url),
                text: None,
            };
        }
    }

    tracing::debug!(
        "Provider response has no recognizable image ({} chars); returning text",
        raw.len()
    );
    Interpretation {
        image_url: None,
        text: Some(raw.to_string()),
    }
}
