//! Identity card field extraction.

mod parser;
pub mod rules;

pub use parser::{extract, DocumentParser, ExtractionResult, FieldParser};

use crate::models::record::ExtractedRecord;
use crate::ocr::OcrResult;

/// Trait for identity card field extractors.
pub trait DocumentExtractor {
    /// Extract fields from an OCR result.
    fn extract(&self, ocr_result: &OcrResult) -> ExtractedRecord;

    /// Extract fields from plain text.
    fn extract_from_text(&self, text: &str) -> ExtractedRecord;
}
