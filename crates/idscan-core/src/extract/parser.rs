//! Rule-based identity card parser.

use std::time::Instant;

use tracing::debug;

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::record::ExtractedRecord;
use crate::ocr::OcrResult;

use super::rules::{
    dates::{assign_date_roles, DateExtractor},
    id_number::IdNumberExtractor,
    names::{GivenNameExtractor, LastNameExtractor},
    FieldExtractor,
};
use super::DocumentExtractor;

/// Result of field extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub record: ExtractedRecord,
    /// Raw text the fields were extracted from.
    pub raw_text: String,
    /// Fields that could not be recognized and dates that were dropped.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for text parsing.
pub trait FieldParser {
    /// Parse identity card fields from text. Never fails: unrecognized
    /// fields are absent.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Identity card parser running each field rule independently over the text.
#[derive(Debug, Clone)]
pub struct DocumentParser {
    given_name: GivenNameExtractor,
}

impl DocumentParser {
    /// Create a parser with the default rules.
    pub fn new() -> Self {
        Self {
            given_name: GivenNameExtractor::new(),
        }
    }

    /// Create a parser from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        Self::new().with_honorifics(&config.honorifics)
    }

    /// Set the honorifics accepted in front of the given name.
    pub fn with_honorifics<S: AsRef<str>>(mut self, honorifics: &[S]) -> Result<Self, ExtractionError> {
        self.given_name = GivenNameExtractor::with_honorifics(honorifics)?;
        Ok(self)
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldParser for DocumentParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        debug!("Extracting card fields from {} characters of text", text.chars().count());

        let identification_number = IdNumberExtractor::new().extract(text).map(|m| m.value);
        let given_name = self.given_name.extract(text).map(|m| m.value);
        let last_name = LastNameExtractor::new().extract(text).map(|m| m.value);

        let date_matches = DateExtractor::new().extract_all(text);
        debug!(
            "Found {} date candidates: {:?}",
            date_matches.len(),
            date_matches.iter().map(|m| m.source.as_str()).collect::<Vec<_>>()
        );
        let dates = assign_date_roles(date_matches);

        for date in &dates.unparseable {
            warnings.push(format!("Ignored unparseable date: {}", date));
        }
        for date in &dates.discarded {
            warnings.push(format!("Discarded extra date: {}", date));
        }

        let record = ExtractedRecord {
            identification_number,
            given_name,
            last_name,
            date_of_birth: dates.date_of_birth,
            date_of_issue: dates.date_of_issue,
            date_of_expiry: dates.date_of_expiry,
        };

        for field in record.missing_fields() {
            warnings.push(format!("Could not extract {}", field));
        }

        debug!(
            "Extracted {} of 6 card fields",
            6 - record.missing_fields().len()
        );

        ExtractionResult {
            record,
            raw_text: text.to_string(),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl DocumentExtractor for DocumentParser {
    fn extract(&self, ocr_result: &OcrResult) -> ExtractedRecord {
        self.parse(&ocr_result.text).record
    }

    fn extract_from_text(&self, text: &str) -> ExtractedRecord {
        self.parse(text).record
    }
}

/// Extract identity card fields from raw OCR text with the default rules.
pub fn extract(raw_text: &str) -> ExtractedRecord {
    DocumentParser::new().parse(raw_text).record
}
