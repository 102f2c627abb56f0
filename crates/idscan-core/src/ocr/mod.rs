//! OCR collaborator interface.
//!
//! Recognition itself happens in an external service. The rest of the
//! pipeline only needs the flattened text of one image.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// One piece of recognized text, as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    /// Recognized text.
    pub description: String,

    /// Detected language, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl TextAnnotation {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            locale: None,
        }
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    /// Annotations in provider order.
    pub annotations: Vec<TextAnnotation>,

    /// Full text (annotation descriptions joined with newlines).
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl OcrResult {
    /// Build a result from annotations, flattening them into text.
    pub fn from_annotations(annotations: Vec<TextAnnotation>) -> Self {
        let text = annotations
            .iter()
            .map(|a| a.description.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            annotations,
            text,
            processing_time_ms: 0,
        }
    }

    /// Build a result from already flattened text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let annotations = if text.is_empty() {
            Vec::new()
        } else {
            vec![TextAnnotation::new(text.clone())]
        };

        Self {
            annotations,
            text,
            processing_time_ms: 0,
        }
    }

    /// True when no text was detected.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn with_processing_time(mut self, ms: u64) -> Self {
        self.processing_time_ms = ms;
        self
    }
}

/// An OCR service turning image bytes into text.
pub trait OcrProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Recognize the text in one image.
    fn recognize(&self, image: &[u8]) -> impl Future<Output = Result<OcrResult, OcrError>> + Send;
}

/// Provider returning a fixed text for every image.
#[derive(Debug, Clone, Default)]
pub struct StaticTextProvider {
    text: String,
}

impl StaticTextProvider {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrProvider for StaticTextProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn recognize(&self, _image: &[u8]) -> Result<OcrResult, OcrError> {
        Ok(OcrResult::from_text(self.text.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_annotations_joined_with_newlines() {
        let result = OcrResult::from_annotations(vec![
            TextAnnotation::new("Name Mr JOHN"),
            TextAnnotation::new("Name"),
            TextAnnotation::new("JOHN"),
        ]);

        assert_eq!(result.text, "Name Mr JOHN\nName\nJOHN");
    }

    #[test]
    fn test_no_annotations_is_empty_text() {
        let result = OcrResult::from_annotations(Vec::new());

        assert_eq!(result.text, "");
        assert!(result.is_empty());
        assert_eq!(OcrResult::from_text("").annotations.len(), 0);
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticTextProvider::new("Last name SMITH");
        let result = provider.recognize(&[1, 2, 3]).await.unwrap();

        assert_eq!(result.text, "Last name SMITH");
        assert_eq!(provider.name(), "static");
    }
}
