//! Two-stage diagram pipeline.
//!
//! Stage 1 (architect) turns paper content into a Visual Schema; stage 2
//! (renderer) turns a Visual Schema into an image. The stages share nothing:
//! callers carry the schema from one to the other.

use crate::ai::{
    interpret, ContentAssembler, HttpProviderInvoker, Interpretation, ProviderFamily,
    ProviderInvoker,
};
use crate::media::{PdfiumRasterizer, Rasterizer};
use crate::models::{EndpointConfig, GenerateSchemaRequest, RenderImageRequest, ServerConfig};
use crate::{prompts, Error, Result};
use tracing::info;

pub const SCHEMA_BEGIN_MARKER: &str = "---BEGIN PROMPT---";
pub const SCHEMA_END_MARKER: &str = "---END PROMPT---";

/// Coordinates assembly, invocation and interpretation for both stages.
pub struct Pipeline {
    invoker: Box<dyn ProviderInvoker>,
    rasterizer: Box<dyn Rasterizer>,
    dpi: u32,
}

/// Injectable service bundle used to construct [`Pipeline`] in tests/harnesses.
pub struct PipelineServices {
    pub invoker: Box<dyn ProviderInvoker>,
    pub rasterizer: Box<dyn Rasterizer>,
}

impl Pipeline {
    pub fn with_services(services: PipelineServices, dpi: u32) -> Self {
        Self {
            invoker: services.invoker,
            rasterizer: services.rasterizer,
            dpi,
        }
    }

    /// Build the production pipeline. Probes for pdfium exactly once.
    pub fn from_config(config: &ServerConfig) -> Self {
        let rasterizer = PdfiumRasterizer::detect(config.pdfium_lib_path.as_deref());
        let invoker = Box::new(HttpProviderInvoker::new(reqwest::Client::new()));

        Self::with_services(
            PipelineServices {
                invoker,
                rasterizer,
            },
            config.raster_dpi,
        )
    }

    fn assembler(&self) -> ContentAssembler<'_> {
        ContentAssembler::new(self.rasterizer.as_ref(), self.dpi)
    }

    /// Stage 1: produce a Visual Schema from paper content and optional media.
    pub async fn generate_schema(&self, request: &GenerateSchemaRequest) -> Result<String> {
        require_credential(
            &request.config,
            "API Key is required. Please configure your API key in Settings.",
        )?;

        let family = ProviderFamily::classify(&request.config.base_url);
        let media = request.input_images.as_deref().unwrap_or_default();
        info!(
            "Architect stage: {} provider, model {}, {} media item(s)",
            family,
            request.config.model_name,
            media.len()
        );

        let prompt = prompts::render(
            prompts::ARCHITECT,
            &[("paper_content", &request.paper_content)],
        );
        let payload = self.assembler().assemble(&prompt, media, family).await?;

        let schema = self.invoker.invoke(&request.config, payload).await?;
        info!("Architect stage produced schema ({} chars)", schema.len());
        Ok(schema)
    }

    /// Stage 2: render a Visual Schema into an image, or the model's prose.
    pub async fn render_image(&self, request: &RenderImageRequest) -> Result<Interpretation> {
        require_credential(
            &request.config,
            "API Key is required. Please configure your Vision Model API key in Settings.",
        )?;
        validate_schema(&request.visual_schema)?;

        let references = request.reference_images.as_deref().unwrap_or_default();
        let template = if references.is_empty() {
            prompts::RENDERER
        } else {
            prompts::RENDERER_WITH_REFERENCES
        };
        info!(
            "Renderer stage: model {}, {} reference image(s)",
            request.config.model_name,
            references.len()
        );

        let prompt = prompts::render(
            template,
            &[("visual_schema_content", &request.visual_schema)],
        );
        let payload = self
            .assembler()
            .assemble(&prompt, references, ProviderFamily::OpenAiCompatible)
            .await?;

        let raw = self.invoker.invoke(&request.config, payload).await?;
        let result = interpret(&raw);
        info!(
            "Renderer stage finished: image {}",
            if result.image_url.is_some() { "found" } else { "not found" }
        );
        Ok(result)
    }
}

fn require_credential(config: &EndpointConfig, message: &str) -> Result<()> {
    if config.has_credential() {
        Ok(())
    } else {
        Err(Error::Configuration(message.to_string()))
    }
}

/// The schema must keep both markers; nothing else about it is checked.
pub fn validate_schema(schema: &str) -> Result<()> {
    if schema.contains(SCHEMA_BEGIN_MARKER) && schema.contains(SCHEMA_END_MARKER) {
        Ok(())
    } else {
        Err(Error::Format(format!(
            "Please preserve the {} and {} tags.",
            SCHEMA_BEGIN_MARKER, SCHEMA_END_MARKER
        )))
    }
}
