//! Google Cloud Vision text detection client.

use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use tracing::debug;

use idscan_core::error::OcrError;
use idscan_core::models::config::OcrConfig;
use idscan_core::ocr::{OcrProvider, OcrResult, TextAnnotation};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// OCR provider calling the Vision `images:annotate` REST endpoint.
pub struct VisionProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    language_hints: Vec<String>,
}

impl VisionProvider {
    /// Build a provider from configuration. Fails when no API key is available.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            OcrError::NotConfigured(format!(
                "no API key; set ocr.api_key or {}",
                OcrConfig::API_KEY_ENV
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OcrError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            language_hints: config.language_hints.clone(),
        })
    }

    fn request_body(&self, image: &[u8]) -> AnnotateRequest {
        AnnotateRequest {
            requests: vec![ImageRequest {
                image: ImageContent {
                    content: BASE64.encode(image),
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION".to_string(),
                }],
                image_context: ImageContext {
                    language_hints: self.language_hints.clone(),
                },
            }],
        }
    }
}

impl OcrProvider for VisionProvider {
    fn name(&self) -> &str {
        "vision"
    }

    async fn recognize(&self, image: &[u8]) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let body = self.request_body(image);

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| OcrError::Request(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(OcrError::Provider(format!("HTTP {}: {}", status, detail)));
        }

        let parsed: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| OcrError::Response(e.without_url().to_string()))?;

        let result = parse_annotate_response(parsed)?
            .with_processing_time(start.elapsed().as_millis() as u64);

        debug!(
            "Vision returned {} annotations in {}ms",
            result.annotations.len(),
            result.processing_time_ms
        );

        Ok(result)
    }
}

fn parse_annotate_response(response: AnnotateResponse) -> Result<OcrResult, OcrError> {
    let Some(first) = response.responses.into_iter().next() else {
        return Ok(OcrResult::default());
    };

    if let Some(error) = first.error {
        return Err(OcrError::Provider(error.message));
    }

    Ok(OcrResult::from_annotations(first.text_annotations))
}

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<ImageRequest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
    image_context: ImageContext,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageContext {
    language_hints: Vec<String>,
}

#[derive(Deserialize, Default)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<VisionStatus>,
}

#[derive(Deserialize)]
struct VisionStatus {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn provider() -> VisionProvider {
        VisionProvider::from_config(&OcrConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(provider().request_body(b"abc")).unwrap();

        assert_eq!(body["requests"][0]["image"]["content"], "YWJj");
        assert_eq!(body["requests"][0]["features"][0]["type"], "TEXT_DETECTION");
        assert_eq!(
            body["requests"][0]["imageContext"]["languageHints"],
            serde_json::json!(["en", "num"])
        );
    }

    #[test]
    fn test_parse_response_joins_annotations() {
        let response: AnnotateResponse = serde_json::from_str(
            r#"{"responses": [{"textAnnotations": [
                {"locale": "en", "description": "Name Mr JOHN\nLast name SMITH"},
                {"description": "Name"},
                {"description": "Mr"}
            ]}]}"#,
        )
        .unwrap();

        let result = parse_annotate_response(response).unwrap();
        assert_eq!(result.text, "Name Mr JOHN\nLast name SMITH\nName\nMr");
        assert_eq!(result.annotations[0].locale.as_deref(), Some("en"));
    }

    #[test]
    fn test_parse_response_without_text() {
        let response: AnnotateResponse = serde_json::from_str(r#"{"responses": [{}]}"#).unwrap();
        assert_eq!(parse_annotate_response(response).unwrap().text, "");

        let response: AnnotateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parse_annotate_response(response).unwrap().text, "");
    }

    #[test]
    fn test_parse_response_error() {
        let response: AnnotateResponse = serde_json::from_str(
            r#"{"responses": [{"error": {"code": 3, "message": "Bad image data."}}]}"#,
        )
        .unwrap();

        assert!(matches!(
            parse_annotate_response(response),
            Err(OcrError::Provider(msg)) if msg == "Bad image data."
        ));
    }

    #[test]
    fn test_missing_api_key() {
        let config = OcrConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        // The environment may provide a key; only assert when it does not.
        if std::env::var(OcrConfig::API_KEY_ENV).is_err() {
            assert!(matches!(
                VisionProvider::from_config(&config),
                Err(OcrError::NotConfigured(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_request_error_hides_api_key() {
        let provider = VisionProvider::from_config(&OcrConfig {
            endpoint: "http://127.0.0.1:9/v1/images:annotate".to_string(),
            api_key: Some("SECRET-KEY-123".to_string()),
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap();

        let err = provider.recognize(b"abc").await.unwrap_err();
        assert!(matches!(err, OcrError::Request(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"));
    }
}
