//! HTTP handlers for the idscan service.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use idscan_core::models::record::{DocumentRecord, ExtractedRecord, RecordSummary, RecordUpdate};

use super::error::ApiError;
use super::state::AppState;

/// Multipart field carrying the uploaded image.
const IMAGE_FIELD: &str = "image";

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Upload an image, run OCR and extraction, and store the result.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(e.body_text()))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            debug!(
                "Received upload {:?} ({:?})",
                field.file_name().unwrap_or("unnamed"),
                field.content_type()
            );
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
            image = Some(bytes.to_vec());
            break;
        }
    }

    let image = image
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("No image file provided.".to_string()))?;

    if image::guess_format(&image).is_err() {
        return Err(ApiError::InvalidRequest(
            "Unsupported image format.".to_string(),
        ));
    }

    let record = state
        .service
        .upload(image)
        .await
        .map_err(ApiError::UploadFailed)?;

    info!("Upload stored as {}", record.id);

    Ok(Json(json!({
        "success": true,
        "message": "Image uploaded and OCR data saved successfully.",
        "fileId": record.id,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// `YYYY-MM-DD`, or an RFC 3339 timestamp whose UTC date is used.
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub success: bool,
    #[serde(rename = "allOCRData")]
    pub all_ocr_data: Vec<RecordSummary>,
}

/// List stored records, optionally only those uploaded on one day.
pub async fn all_ocr_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let date = query
        .date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(parse_day)
        .transpose()?;

    let records = state.service.list(date)?;

    Ok(Json(ListResponse {
        success: true,
        all_ocr_data: records,
    }))
}

fn parse_day(value: &str) -> Result<NaiveDate, ApiError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| ApiError::InvalidRequest(format!("Invalid date: {}", value)))
}

/// Extracted fields of one record as returned to clients.
#[derive(Debug, Serialize)]
pub struct OcrDataView {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: ExtractedRecord,
}

impl From<DocumentRecord> for OcrDataView {
    fn from(record: DocumentRecord) -> Self {
        Self {
            id: record.id,
            fields: record.fields,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrDataResponse {
    pub success: bool,
    pub message: String,
    pub ocr_data: OcrDataView,
}

/// Get the extracted fields of one record.
pub async fn get_ocr_data(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<Json<OcrDataResponse>, ApiError> {
    let record = state.service.get(&file_id)?;

    Ok(Json(OcrDataResponse {
        success: true,
        message: "OCR data retrieved successfully.".to_string(),
        ocr_data: record.into(),
    }))
}

/// Merge a user edit into a record. Blank values keep the stored ones.
pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
    update: Result<Json<RecordUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(update) = update.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    state.service.update(&file_id, &update)?;

    Ok(Json(json!({
        "success": true,
        "message": "OCR entry updated successfully.",
    })))
}

/// Delete a record.
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.service.delete(&file_id)?;

    Ok(Json(json!({
        "success": true,
        "message": "OCR entry deleted successfully.",
    })))
}
