//! Data models for extracted identity card data and configuration.

pub mod config;
pub mod record;

pub use config::IdScanConfig;
pub use record::{DocumentRecord, ExtractedRecord, OcrStatus, RecordSummary, RecordUpdate};
