use super::{DataUrl, Rasterizer};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Rasterizer that returns a fixed set of pages for every PDF.
pub struct MockRasterizer {
    pages: Vec<DataUrl>,
    call_count: Arc<Mutex<usize>>,
}

impl MockRasterizer {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_page(mut self, page: DataUrl) -> Self {
        self.pages.push(page);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Rasterizer for MockRasterizer {
    async fn rasterize(&self, _pdf_bytes: &[u8], _dpi: u32) -> Vec<DataUrl> {
        *self.call_count.lock().unwrap() += 1;
        self.pages.clone()
    }
}
