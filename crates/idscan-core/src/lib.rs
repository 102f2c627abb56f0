//! Core library for identity card OCR processing.
//!
//! This crate provides:
//! - Field extraction from recognized text (identification number, names, dates)
//! - The OCR collaborator interface
//! - Record storage (in-memory and JSON file backed)
//! - The upload pipeline tying OCR, extraction and storage together

pub mod error;
pub mod extract;
pub mod models;
pub mod ocr;
pub mod service;
pub mod store;

pub use error::{IdScanError, Result};
pub use extract::{extract, DocumentExtractor, DocumentParser, ExtractionResult, FieldParser};
pub use models::config::IdScanConfig;
pub use models::record::{DocumentRecord, ExtractedRecord, OcrStatus, RecordSummary, RecordUpdate};
pub use ocr::{OcrProvider, OcrResult, StaticTextProvider, TextAnnotation};
pub use service::DocumentService;
pub use store::{JsonFileStore, MemoryStore, RecordStore, TimeRange};
