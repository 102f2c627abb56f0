//! Upload pipeline and record management.

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::{IdScanError, Result};
use crate::extract::{DocumentParser, FieldParser};
use crate::models::record::{DocumentRecord, RecordSummary, RecordUpdate};
use crate::ocr::OcrProvider;
use crate::store::{RecordStore, TimeRange};

/// Runs uploads through OCR and extraction and manages the stored records.
pub struct DocumentService<S, O> {
    store: Arc<S>,
    ocr: O,
    parser: DocumentParser,
}

impl<S: RecordStore, O: OcrProvider> DocumentService<S, O> {
    /// Create a service with the default extraction rules.
    pub fn new(store: Arc<S>, ocr: O) -> Self {
        Self {
            store,
            ocr,
            parser: DocumentParser::new(),
        }
    }

    /// Use a custom parser.
    pub fn with_parser(mut self, parser: DocumentParser) -> Self {
        self.parser = parser;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Recognize, extract and store one uploaded image.
    pub async fn upload(&self, image: Vec<u8>) -> Result<DocumentRecord> {
        if image.is_empty() {
            return Err(IdScanError::InvalidInput("No image file provided.".to_string()));
        }

        let start = Instant::now();
        info!("Processing upload of {} bytes with {} OCR", image.len(), self.ocr.name());

        let ocr = self.ocr.recognize(&image).await.map_err(|e| {
            warn!("OCR failed: {}", e);
            IdScanError::from(e)
        })?;

        if ocr.is_empty() {
            warn!("No text detected in uploaded image");
        }

        let extraction = self.parser.parse(&ocr.text);
        for warning in &extraction.warnings {
            debug!("{}", warning);
        }

        let record = DocumentRecord::new(image, ocr.text, extraction.record);
        self.store.insert(record.clone())?;

        info!(
            "Stored record {} ({} fields missing) in {}ms",
            record.id,
            record.fields.missing_fields().len(),
            start.elapsed().as_millis()
        );

        Ok(record)
    }

    /// Look up a record.
    pub fn get(&self, id: &str) -> Result<DocumentRecord> {
        self.store
            .get(id)?
            .ok_or_else(|| IdScanError::NotFound(id.to_string()))
    }

    /// List records, optionally only those uploaded on one UTC calendar day.
    pub fn list(&self, date: Option<NaiveDate>) -> Result<Vec<RecordSummary>> {
        let records = self.store.list(date.map(TimeRange::day))?;
        debug!("Listing {} records", records.len());
        Ok(records)
    }

    /// Apply a user edit to a record's fields.
    pub fn update(&self, id: &str, update: &RecordUpdate) -> Result<DocumentRecord> {
        let record = self
            .store
            .update(id, update)?
            .ok_or_else(|| IdScanError::NotFound(id.to_string()))?;
        info!("Updated record {}", id);
        Ok(record)
    }

    /// Delete a record. Deleting an unknown record is not an error.
    pub fn delete(&self, id: &str) -> Result<()> {
        if self.store.delete(id)? {
            info!("Deleted record {}", id);
        } else {
            debug!("Delete of unknown record {}", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::ocr::{OcrResult, StaticTextProvider};
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    const CARD_TEXT: &str = "Identification Number 1 1037 02214 81 4\n\
        Name Mr JOHN Last name SMITH\n\
        15 Mar 2025\n01 Jan 1990\n15 Mar 2015";

    struct FailingProvider;

    impl OcrProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn recognize(&self, _image: &[u8]) -> std::result::Result<OcrResult, OcrError> {
            Err(OcrError::Request("connection refused".to_string()))
        }
    }

    fn service(text: &str) -> DocumentService<MemoryStore, StaticTextProvider> {
        DocumentService::new(Arc::new(MemoryStore::new()), StaticTextProvider::new(text))
    }

    #[tokio::test]
    async fn test_upload_extracts_and_stores() {
        let service = service(CARD_TEXT);
        let record = service.upload(vec![1, 2, 3]).await.unwrap();

        assert_eq!(record.ocr_text, CARD_TEXT);
        assert_eq!(record.fields.identification_number.as_deref(), Some("1 1037 02214 81 4"));
        assert_eq!(record.fields.given_name.as_deref(), Some("JOHN"));
        assert_eq!(record.fields.date_of_birth.as_deref(), Some("01 Jan 1990"));
        assert_eq!(record.fields.date_of_issue.as_deref(), Some("15 Mar 2015"));
        assert_eq!(record.fields.date_of_expiry.as_deref(), Some("15 Mar 2025"));
        assert_ne!(record.id, record.filename);

        assert_eq!(service.get(&record.id).unwrap(), record);
    }

    #[tokio::test]
    async fn test_upload_without_text_stores_empty_record() {
        let service = service("");
        let record = service.upload(vec![1]).await.unwrap();

        assert!(record.fields.is_empty());
        assert_eq!(service.list(None).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let service = service(CARD_TEXT);

        assert!(matches!(
            service.upload(Vec::new()).await,
            Err(IdScanError::InvalidInput(_))
        ));
        assert!(service.list(None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ocr_failure_is_not_stored() {
        let store = Arc::new(MemoryStore::new());
        let service = DocumentService::new(store.clone(), FailingProvider);

        assert!(matches!(service.upload(vec![1]).await, Err(IdScanError::Ocr(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let service = service(CARD_TEXT);
        let record = service.upload(vec![1]).await.unwrap();

        let update = RecordUpdate {
            last_name: Some("SMYTHE".to_string()),
            given_name: Some(String::new()),
            ..Default::default()
        };
        let updated = service.update(&record.id, &update).unwrap();
        assert_eq!(updated.fields.last_name.as_deref(), Some("SMYTHE"));
        assert_eq!(updated.fields.given_name.as_deref(), Some("JOHN"));

        service.delete(&record.id).unwrap();
        service.delete(&record.id).unwrap();
        assert!(matches!(service.get(&record.id), Err(IdScanError::NotFound(_))));
        assert!(matches!(
            service.update(&record.id, &update),
            Err(IdScanError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_by_day() {
        let service = service(CARD_TEXT);
        let record = service.upload(vec![1]).await.unwrap();

        let today = record.timestamp.date_naive();
        let yesterday = today.pred_opt().unwrap();

        assert_eq!(service.list(Some(today)).unwrap().len(), 1);
        assert!(service.list(Some(yesterday)).unwrap().is_empty());
    }
}
