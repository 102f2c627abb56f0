//! Error types for the idscan-core library.

use thiserror::Error;

/// Main error type for the idscan library.
#[derive(Error, Debug)]
pub enum IdScanError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Record storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Field extraction setup error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// No record exists under the given identifier.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The caller supplied unusable input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by an OCR provider.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The provider could not be reached.
    #[error("request failed: {0}")]
    Request(String),

    /// The provider answered with an error.
    #[error("provider returned an error: {0}")]
    Provider(String),

    /// The provider response could not be decoded.
    #[error("malformed response: {0}")]
    Response(String),

    /// The provider is missing credentials or settings.
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Errors raised by a record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file holds invalid data.
    #[error("corrupt store: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A record with the same identifier already exists.
    #[error("duplicate record id: {0}")]
    Duplicate(String),

    /// The store lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Errors raised while building field extractors.
///
/// Matching itself never fails: a field that is not found is simply absent.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A configured pattern could not be compiled.
    #[error("invalid pattern for {field}: {reason}")]
    Pattern { field: String, reason: String },
}

/// Result type for the idscan library.
pub type Result<T> = std::result::Result<T, IdScanError>;
