//! HTTP service exposing upload and record management.

mod error;
mod handlers;
mod state;

pub use state::{AnyOcr, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the service router.
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    // The browser client is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/upload", post(handlers::upload_image))
        .route("/all-ocr-data", get(handlers::all_ocr_data))
        .route("/ocr-data/:file_id", get(handlers::get_ocr_data))
        .route("/update-entry/:file_id", put(handlers::update_entry))
        .route("/delete-entry/:file_id", delete(handlers::delete_entry))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the router until the process is stopped.
pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    info!("Starting idscan service on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use idscan_core::ocr::StaticTextProvider;
    use idscan_core::service::DocumentService;
    use idscan_core::store::{MemoryStore, RecordStore};
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use tower::ServiceExt;

    const CARD_TEXT: &str = "Identification Number 1 1037 02214 81 4\n\
        Name Mr JOHN Last name SMITH\n\
        15 Mar 2025 01 Jan 1990 15 Mar 2015";

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    const BOUNDARY: &str = "idscan-test-boundary";

    fn app() -> Router {
        let store: Box<dyn RecordStore> = Box::new(MemoryStore::new());
        let ocr = AnyOcr::Static(StaticTextProvider::new(CARD_TEXT));
        let service = DocumentService::new(Arc::new(store), ocr);
        router(Arc::new(AppState::new(service)), 1024 * 1024)
    }

    fn multipart_request(field: &str, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"card.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn upload(app: &Router) -> String {
        let (status, json) = send(app, multipart_request("image", PNG_MAGIC)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        json["fileId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_upload_then_fetch() {
        let app = app();
        let id = upload(&app).await;

        let (status, json) = send(&app, get(&format!("/ocr-data/{id}"))).await;
        assert_eq!(status, StatusCode::OK);

        let data = &json["ocrData"];
        assert_eq!(data["_id"], id.as_str());
        assert_eq!(data["identificationNumber"], "1 1037 02214 81 4");
        assert_eq!(data["givenName"], "JOHN");
        assert_eq!(data["lastName"], "SMITH");
        assert_eq!(data["dateOfBirth"], "01 Jan 1990");
        assert_eq!(data["dateOfIssue"], "15 Mar 2015");
        assert_eq!(data["dateOfExpiry"], "15 Mar 2025");
    }

    #[tokio::test]
    async fn test_upload_requires_image_field() {
        let app = app();

        let (status, json) = send(&app, multipart_request("file", PNG_MAGIC)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "No image file provided.");

        let (status, _) = send(&app, multipart_request("image", b"plain text")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_excludes_image_and_filters_by_date() {
        let app = app();
        upload(&app).await;

        let (status, json) = send(&app, get("/all-ocr-data")).await;
        assert_eq!(status, StatusCode::OK);
        let all = json["allOCRData"].as_array().unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].get("imageData").is_none());
        assert_eq!(all[0]["status"], "success");

        let (_, json) = send(&app, get("/all-ocr-data?date=2001-01-01")).await;
        assert!(json["allOCRData"].as_array().unwrap().is_empty());

        let (status, _) = send(&app, get("/all-ocr-data?date=yesterday")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_keeps_blank_fields() {
        let app = app();
        let id = upload(&app).await;

        let request = Request::builder()
            .method("PUT")
            .uri(format!("/update-entry/{id}"))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"Name": "", "lastName": "SMYTHE"}"#))
            .unwrap();
        let (status, json) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "OCR entry updated successfully.");

        let (_, json) = send(&app, get(&format!("/ocr-data/{id}"))).await;
        assert_eq!(json["ocrData"]["givenName"], "JOHN");
        assert_eq!(json["ocrData"]["lastName"], "SMYTHE");
    }

    #[tokio::test]
    async fn test_update_with_malformed_body() {
        let app = app();
        let id = upload(&app).await;

        let request = Request::builder()
            .method("PUT")
            .uri(format!("/update-entry/{id}"))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"lastName": "#))
            .unwrap();
        let (status, json) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()));

        let (_, json) = send(&app, get(&format!("/ocr-data/{id}"))).await;
        assert_eq!(json["ocrData"]["lastName"], "SMITH");
    }

    #[tokio::test]
    async fn test_delete_and_missing_record() {
        let app = app();
        let id = upload(&app).await;

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/delete-entry/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);

        let (status, json) = send(&app, get(&format!("/ocr-data/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Image not found.");
    }
}
