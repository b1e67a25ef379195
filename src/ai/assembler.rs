//! Multimodal content assembly.
//!
//! Turns a prompt plus caller media into the exact content shape a provider
//! family expects. Image evidence always comes first and the prompt text last;
//! PDFs are replaced by their rasterized pages in place.

use super::gemini::Part;
use super::openai::{ChatMessageContent, MessagePart};
use super::ProviderFamily;
use crate::media::{DataUrl, MediaReference, Rasterizer};
use crate::Result;
use tracing::{debug, info};

/// Provider-tagged content ready to send without further MIME or ordering work.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderPayload {
    Google(Vec<Part>),
    OpenAi(ChatMessageContent),
}

impl ProviderPayload {
    pub fn family(&self) -> ProviderFamily {
        match self {
            Self::Google(_) => ProviderFamily::GoogleGenerative,
            Self::OpenAi(_) => ProviderFamily::OpenAiCompatible,
        }
    }

    fn text_only(family: ProviderFamily, prompt: &str) -> Self {
        match family {
            ProviderFamily::GoogleGenerative => Self::Google(vec![Part::text(prompt)]),
            ProviderFamily::OpenAiCompatible => {
                Self::OpenAi(ChatMessageContent::Text(prompt.to_string()))
            }
        }
    }

    fn multimodal(family: ProviderFamily, images: &[DataUrl], prompt: &str) -> Self {
        match family {
            ProviderFamily::GoogleGenerative => {
                let mut parts: Vec<Part> = images
                    .iter()
                    .map(|img| Part::inline(img.mime_type.clone(), img.base64()))
                    .collect();
                parts.push(Part::text(prompt));
                Self::Google(parts)
            }
            ProviderFamily::OpenAiCompatible => {
                let mut parts: Vec<MessagePart> =
                    images.iter().map(|img| MessagePart::image(img.to_url())).collect();
                parts.push(MessagePart::text(prompt));
                Self::OpenAi(ChatMessageContent::Parts(parts))
            }
        }
    }
}

pub struct ContentAssembler<'a> {
    rasterizer: &'a dyn Rasterizer,
    dpi: u32,
}

impl<'a> ContentAssembler<'a> {
    pub fn new(rasterizer: &'a dyn Rasterizer, dpi: u32) -> Self {
        Self { rasterizer, dpi }
    }

    /// Build the payload for `family` from `prompt` and raw boundary media.
    pub async fn assemble(
        &self,
        prompt: &str,
        media: &[String],
        family: ProviderFamily,
    ) -> Result<ProviderPayload> {
        let references = media
            .iter()
            .map(|m| MediaReference::parse(m))
            .collect::<Result<Vec<_>>>()?;

        self.assemble_references(prompt, references, family).await
    }

    pub async fn assemble_references(
        &self,
        prompt: &str,
        references: Vec<MediaReference>,
        family: ProviderFamily,
    ) -> Result<ProviderPayload> {
        if references.is_empty() {
            return Ok(ProviderPayload::text_only(family, prompt));
        }

        let supplied = references.len();
        let mut images = Vec::with_capacity(supplied);

        for (idx, reference) in references.into_iter().enumerate() {
            match reference {
                MediaReference::Image(url) => {
                    debug!("Media {}: {} ({} bytes)", idx + 1, url.mime_type, url.bytes.len());
                    images.push(url);
                }
                MediaReference::Pdf(bytes) => {
                    let pages = self.rasterizer.rasterize(&bytes, self.dpi).await;
                    info!("Media {}: PDF rasterized to {} page(s)", idx + 1, pages.len());
                    images.extend(pages);
                }
            }
        }

        if images.is_empty() {
            info!(
                "No usable images among {} media reference(s); sending text only",
                supplied
            );
            return Ok(ProviderPayload::text_only(family, prompt));
        }

        Ok(ProviderPayload::multimodal(family, &images, prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{codec, MockRasterizer};
    use pretty_assertions::assert_eq;

    const PNG: &str = "data:image/png;base64,iVBORw==";
    const JPEG: &str = "data:image/jpeg;base64,/9j/4A==";
    const PDF: &str = "data:application/pdf;base64,JVBERg==";

    fn page(byte: u8) -> DataUrl {
        DataUrl::new("image/png", vec![byte])
    }

    async fn assemble(
        rasterizer: &MockRasterizer,
        media: &[&str],
        family: ProviderFamily,
    ) -> Result<ProviderPayload> {
        let media: Vec<String> = media.iter().map(|m| m.to_string()).collect();
        ContentAssembler::new(rasterizer, 150)
            .assemble("PROMPT", &media, family)
            .await
    }

    #[tokio::test]
    async fn test_no_media_is_text_only_for_both_families() {
        let rasterizer = MockRasterizer::new();

        let openai = assemble(&rasterizer, &[], ProviderFamily::OpenAiCompatible)
            .await
            .unwrap();
        assert_eq!(
            openai,
            ProviderPayload::OpenAi(ChatMessageContent::Text("PROMPT".to_string()))
        );

        let google = assemble(&rasterizer, &[], ProviderFamily::GoogleGenerative)
            .await
            .unwrap();
        assert_eq!(google, ProviderPayload::Google(vec![Part::text("PROMPT")]));
    }

    #[tokio::test]
    async fn test_openai_images_precede_single_text_part() {
        let rasterizer = MockRasterizer::new();
        let payload = assemble(&rasterizer, &[JPEG, "iVBORw=="], ProviderFamily::OpenAiCompatible)
            .await
            .unwrap();

        assert_eq!(
            payload,
            ProviderPayload::OpenAi(ChatMessageContent::Parts(vec![
                MessagePart::image(JPEG),
                MessagePart::image(PNG),
                MessagePart::text("PROMPT"),
            ]))
        );
    }

    #[tokio::test]
    async fn test_google_uses_inline_parts_then_prompt() {
        let rasterizer = MockRasterizer::new();
        let payload = assemble(&rasterizer, &[JPEG, PNG], ProviderFamily::GoogleGenerative)
            .await
            .unwrap();

        assert_eq!(
            payload,
            ProviderPayload::Google(vec![
                Part::inline("image/jpeg", "/9j/4A=="),
                Part::inline("image/png", "iVBORw=="),
                Part::text("PROMPT"),
            ])
        );
    }

    #[tokio::test]
    async fn test_pdf_pages_are_spliced_at_reference_position() {
        let rasterizer = MockRasterizer::new().with_page(page(1)).with_page(page(2));
        let payload = assemble(&rasterizer, &[JPEG, PDF, PNG], ProviderFamily::OpenAiCompatible)
            .await
            .unwrap();

        assert_eq!(
            payload,
            ProviderPayload::OpenAi(ChatMessageContent::Parts(vec![
                MessagePart::image(JPEG),
                MessagePart::image(codec::encode("image/png", &[1])),
                MessagePart::image(codec::encode("image/png", &[2])),
                MessagePart::image(PNG),
                MessagePart::text("PROMPT"),
            ]))
        );
        assert_eq!(rasterizer.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_pdf_without_pages_contributes_nothing() {
        let rasterizer = MockRasterizer::new();
        let payload = assemble(&rasterizer, &[PDF, PNG], ProviderFamily::GoogleGenerative)
            .await
            .unwrap();

        assert_eq!(
            payload,
            ProviderPayload::Google(vec![
                Part::inline("image/png", "iVBORw=="),
                Part::text("PROMPT"),
            ])
        );
    }

    #[tokio::test]
    async fn test_pdf_only_without_pages_falls_back_to_text() {
        let rasterizer = MockRasterizer::new();
        let payload = assemble(&rasterizer, &[PDF, PDF], ProviderFamily::OpenAiCompatible)
            .await
            .unwrap();

        assert_eq!(
            payload,
            ProviderPayload::OpenAi(ChatMessageContent::Text("PROMPT".to_string()))
        );
        assert_eq!(rasterizer.get_call_count(), 2);
    }

    #[tokio::test]
    async fn test_text_part_is_always_last() {
        let rasterizer = MockRasterizer::new().with_page(page(9));
        for media in [vec![PNG], vec![PDF, JPEG], vec![JPEG, PDF], vec![PNG, PNG, PNG]] {
            let payload = assemble(&rasterizer, &media, ProviderFamily::OpenAiCompatible)
                .await
                .unwrap();
            let ProviderPayload::OpenAi(ChatMessageContent::Parts(parts)) = payload else {
                panic!("expected multipart payload for {:?}", media);
            };
            assert_eq!(parts.last(), Some(&MessagePart::text("PROMPT")));
            assert_eq!(
                parts
                    .iter()
                    .filter(|p| matches!(p, MessagePart::Text { .. }))
                    .count(),
                1
            );
        }
    }

    #[tokio::test]
    async fn test_malformed_media_is_rejected() {
        let rasterizer = MockRasterizer::new();
        let err = assemble(
            &rasterizer,
            &["data:image/png;base64,@@@@"],
            ProviderFamily::OpenAiCompatible,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, crate::Error::MalformedMedia(_)));
    }

    #[test]
    fn test_payload_reports_family() {
        assert_eq!(
            ProviderPayload::Google(vec![]).family(),
            ProviderFamily::GoogleGenerative
        );
        assert_eq!(
            ProviderPayload::OpenAi(ChatMessageContent::Text(String::new())).family(),
            ProviderFamily::OpenAiCompatible
        );
    }
}
