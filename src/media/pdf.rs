//! PDF rasterization via pdfium.
//!
//! Rendering runs on tokio's blocking pool since pdfium is CPU-bound and not
//! async-aware. Failures never reach the caller: a PDF that cannot be rendered
//! contributes no pages, and the reason is emitted under the `rasterize`
//! tracing target.

use super::{DataUrl, Rasterizer};
use crate::{Error, Result};
use async_trait::async_trait;
use image::ImageFormat;
use pdfium_render::prelude::*;
use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

const POINTS_PER_INCH: f32 = 72.0;

/// Rasterizer backed by the pdfium shared library.
///
/// One `Pdfium` is bound at start-up and held for the life of the process;
/// dropping it destroys the process-global library. Renders take turns on it.
pub struct PdfiumRasterizer {
    pdfium: Arc<Mutex<Pdfium>>,
}

impl PdfiumRasterizer {
    /// Bind to the pdfium shared library, either at `lib_path` or wherever the
    /// system loader finds it.
    pub fn bind(lib_path: Option<&Path>) -> Result<Self> {
        Ok(Self {
            pdfium: Arc::new(Mutex::new(load_pdfium(lib_path)?)),
        })
    }

    /// Probe for pdfium once at start-up and pick the matching rasterizer.
    pub fn detect(lib_path: Option<&Path>) -> Box<dyn Rasterizer> {
        match Self::bind(lib_path) {
            Ok(rasterizer) => {
                info!("PDF rasterization enabled (pdfium)");
                Box::new(rasterizer)
            }
            Err(e) => {
                warn!("PDF rasterization disabled: {}", e);
                Box::new(UnavailableRasterizer)
            }
        }
    }

    fn render_blocking(
        pdfium: &Mutex<Pdfium>,
        pdf_bytes: Vec<u8>,
        dpi: u32,
    ) -> Result<Vec<DataUrl>> {
        let pdfium = pdfium
            .lock()
            .map_err(|_| Error::Invariant("pdfium lock poisoned".to_string()))?;
        let document = pdfium
            .load_pdf_from_byte_vec(pdf_bytes, None)
            .map_err(|e| Error::MalformedMedia(format!("unreadable PDF: {:?}", e)))?;

        let render_config =
            PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / POINTS_PER_INCH);

        let pages = document.pages();
        let total = pages.len();
        let mut images = Vec::with_capacity(total as usize);

        for (index, page) in pages.iter().enumerate() {
            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                Error::MalformedMedia(format!("page {} failed to render: {:?}", index + 1, e))
            })?;

            let mut png = Vec::new();
            bitmap
                .as_image()
                .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                .map_err(|e| {
                    Error::MalformedMedia(format!("page {} PNG encode failed: {}", index + 1, e))
                })?;

            debug!("Converted PDF page {}/{} to PNG", index + 1, total);
            images.push(DataUrl::new("image/png", png));
        }

        Ok(images)
    }
}

#[async_trait]
impl Rasterizer for PdfiumRasterizer {
    async fn rasterize(&self, pdf_bytes: &[u8], dpi: u32) -> Vec<DataUrl> {
        let pdfium = Arc::clone(&self.pdfium);
        let bytes = pdf_bytes.to_vec();

        let outcome =
            tokio::task::spawn_blocking(move || Self::render_blocking(&pdfium, bytes, dpi)).await;

        match outcome {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => {
                warn!(target: "rasterize", error = %e, "PDF rasterization failed; skipping document");
                Vec::new()
            }
            Err(e) => {
                warn!(target: "rasterize", error = %e, "PDF rasterization task panicked; skipping document");
                Vec::new()
            }
        }
    }
}

fn load_pdfium(lib_path: Option<&Path>) -> Result<Pdfium> {
    let bindings = match lib_path {
        Some(path) => Pdfium::bind_to_library(path),
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| Error::Invariant(format!("Failed to bind pdfium: {:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Stand-in used when pdfium could not be loaded at start-up.
pub struct UnavailableRasterizer;

#[async_trait]
impl Rasterizer for UnavailableRasterizer {
    async fn rasterize(&self, pdf_bytes: &[u8], _dpi: u32) -> Vec<DataUrl> {
        warn!(
            target: "rasterize",
            bytes = pdf_bytes.len(),
            "PDF conversion not available; document contributes no pages"
        );
        Vec::new()
    }
}
