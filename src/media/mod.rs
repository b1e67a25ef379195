//! Caller-supplied media handling
//!
//! Decodes base64 images and PDFs sent at the boundary and rasterizes PDF
//! pages into PNG images that vision models can consume.

pub mod codec;
pub mod mock;
pub mod pdf;

pub use codec::DataUrl;
pub use mock::MockRasterizer;
pub use pdf::{PdfiumRasterizer, UnavailableRasterizer};

use crate::Result;
use async_trait::async_trait;

pub const DEFAULT_DPI: u32 = 150;

/// A single caller-supplied media value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaReference {
    Image(DataUrl),
    Pdf(Vec<u8>),
}

impl MediaReference {
    pub fn parse(input: &str) -> Result<Self> {
        let url = DataUrl::parse(input)?;
        if url.is_pdf() {
            Ok(Self::Pdf(url.bytes))
        } else {
            Ok(Self::Image(url))
        }
    }
}

/// Turns PDF bytes into PNG page images.
///
/// Implementations never fail: an unavailable backend or a corrupt document
/// yields an empty page list.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, pdf_bytes: &[u8], dpi: u32) -> Vec<DataUrl>;
}
