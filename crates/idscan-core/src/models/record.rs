//! Identity card records: the extracted fields and the stored upload around them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured fields extracted from one identity card.
///
/// Every field is independently optional. Values are the matched text,
/// trimmed but otherwise verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedRecord {
    /// National identification number, e.g. `1 2345 67890 12 3`.
    pub identification_number: Option<String>,

    /// Given name following the "Name" label.
    pub given_name: Option<String>,

    /// Remainder of the line following the "Last name" label.
    pub last_name: Option<String>,

    /// Earliest date found on the card.
    pub date_of_birth: Option<String>,

    /// Second earliest date found on the card.
    pub date_of_issue: Option<String>,

    /// Third earliest date found on the card.
    pub date_of_expiry: Option<String>,
}

impl ExtractedRecord {
    /// True when no field was recognized.
    pub fn is_empty(&self) -> bool {
        self.identification_number.is_none()
            && self.given_name.is_none()
            && self.last_name.is_none()
            && self.date_of_birth.is_none()
            && self.date_of_issue.is_none()
            && self.date_of_expiry.is_none()
    }

    /// Names of the fields that were not recognized.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("identificationNumber", &self.identification_number),
            ("givenName", &self.given_name),
            ("lastName", &self.last_name),
            ("dateOfBirth", &self.date_of_birth),
            ("dateOfIssue", &self.date_of_issue),
            ("dateOfExpiry", &self.date_of_expiry),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Outcome of the OCR step for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrStatus {
    Success,
    Failure,
}

impl Default for OcrStatus {
    fn default() -> Self {
        Self::Success
    }
}

impl std::fmt::Display for OcrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// A persisted upload: the image, its OCR text and the extracted fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Generated record identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Generated unique file name for the uploaded image.
    pub filename: String,

    /// Raw uploaded image bytes.
    #[serde(with = "base64_bytes")]
    pub image_data: Vec<u8>,

    /// Text returned by the OCR provider.
    pub ocr_text: String,

    /// OCR outcome.
    pub status: OcrStatus,

    /// Upload time.
    pub timestamp: DateTime<Utc>,

    /// Extracted fields.
    #[serde(flatten)]
    pub fields: ExtractedRecord,
}

impl DocumentRecord {
    /// Create a new record with generated identifiers, stamped with the current time.
    pub fn new(image_data: Vec<u8>, ocr_text: impl Into<String>, fields: ExtractedRecord) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            filename: Uuid::new_v4().to_string(),
            image_data,
            ocr_text: ocr_text.into(),
            status: OcrStatus::Success,
            timestamp: Utc::now(),
            fields,
        }
    }

    /// Override the upload time.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The record without its image bytes.
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id.clone(),
            filename: self.filename.clone(),
            ocr_text: self.ocr_text.clone(),
            status: self.status,
            timestamp: self.timestamp,
            fields: self.fields.clone(),
        }
    }
}

/// A stored record as listed to clients, without image bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub filename: String,
    pub ocr_text: String,
    pub status: OcrStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: ExtractedRecord,
}

/// A user edit of the extracted fields.
///
/// Missing or blank values leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordUpdate {
    pub identification_number: Option<String>,

    /// Older clients send this field as `Name`.
    #[serde(alias = "Name")]
    pub given_name: Option<String>,

    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub date_of_issue: Option<String>,
    pub date_of_expiry: Option<String>,
}

impl RecordUpdate {
    /// Merge this update into `fields`. Returns true if anything changed.
    pub fn apply(&self, fields: &mut ExtractedRecord) -> bool {
        let mut changed = false;
        changed |= merge(&mut fields.identification_number, &self.identification_number);
        changed |= merge(&mut fields.given_name, &self.given_name);
        changed |= merge(&mut fields.last_name, &self.last_name);
        changed |= merge(&mut fields.date_of_birth, &self.date_of_birth);
        changed |= merge(&mut fields.date_of_issue, &self.date_of_issue);
        changed |= merge(&mut fields.date_of_expiry, &self.date_of_expiry);
        changed
    }
}

fn merge(stored: &mut Option<String>, incoming: &Option<String>) -> bool {
    match incoming {
        Some(value) if !value.trim().is_empty() => {
            if stored.as_deref() == Some(value.as_str()) {
                return false;
            }
            *stored = Some(value.clone());
            true
        }
        _ => false,
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(encoded).map_err(serde::de::Error::custom)
    }
}
