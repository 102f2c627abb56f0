//! Shared state for the HTTP service.

use idscan_core::error::OcrError;
use idscan_core::ocr::{OcrProvider, OcrResult, StaticTextProvider};
use idscan_core::service::DocumentService;
use idscan_core::store::RecordStore;

use crate::vision::VisionProvider;

/// OCR provider selected at startup.
pub enum AnyOcr {
    Vision(VisionProvider),
    Static(StaticTextProvider),
}

impl OcrProvider for AnyOcr {
    fn name(&self) -> &str {
        match self {
            Self::Vision(p) => p.name(),
            Self::Static(p) => p.name(),
        }
    }

    async fn recognize(&self, image: &[u8]) -> Result<OcrResult, OcrError> {
        match self {
            Self::Vision(p) => p.recognize(image).await,
            Self::Static(p) => p.recognize(image).await,
        }
    }
}

/// Document service with the store and provider chosen from configuration.
pub type Service = DocumentService<Box<dyn RecordStore>, AnyOcr>;

pub struct AppState {
    pub service: Service,
}

impl AppState {
    pub fn new(service: Service) -> Self {
        Self { service }
    }
}
