use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use docproc_core::{
    ConvertError, DocumentConverter, Page, ParsedDocument, Table, TextItem,
};
use docproc_web::state::AppState;

const API_KEY: &str = "test-api-key";
const BOUNDARY: &str = "x-test-boundary-7MA4YWxkTrZu0gW";

// ── Test converters ─────────────────────────────────────────────────────

struct StubConverter {
    calls: Arc<AtomicUsize>,
}

impl StubConverter {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl DocumentConverter for StubConverter {
    fn convert(&self, _path: &Path) -> Result<ParsedDocument, ConvertError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut doc = ParsedDocument::new("# Sample Report\n\nFirst paragraph of the body.");
        doc.title = Some("Sample Report".into());
        doc.texts = vec![
            TextItem::new("Sample Report", "title", Some(1)),
            TextItem::new("First paragraph of the body.", "text", Some(1)),
        ];
        doc.tables = vec![Table {
            markdown: Some("| a | b |".into()),
            html: Some("<table></table>".into()),
            ..Table::default()
        }];
        doc.pages = Some(vec![Page { page_no: 1 }, Page { page_no: 2 }]);
        Ok(doc)
    }
}

struct FailingConverter;

impl DocumentConverter for FailingConverter {
    fn convert(&self, _path: &Path) -> Result<ParsedDocument, ConvertError> {
        Err(ConvertError::Extraction("truncated xref table".into()))
    }
}

fn make_app(converter: Arc<dyn DocumentConverter>) -> axum::Router {
    docproc_web::app(Arc::new(AppState {
        converter,
        api_key: API_KEY.to_string(),
        http: reqwest::Client::new(),
    }))
}

// ── Request helpers ─────────────────────────────────────────────────────

fn multipart_body(filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn extract_request(uri: &str, filename: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(multipart_body(filename, b"%PDF-1.4 fake")))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ── Tests ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let (converter, _) = StubConverter::new();
    let app = make_app(Arc::new(converter));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "docling-processor");
}

#[tokio::test]
async fn test_extract_requires_bearer_token() {
    let (converter, calls) = StubConverter::new();
    let app = make_app(Arc::new(converter));

    let response = app
        .oneshot(extract_request("/extract", "doc.pdf", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_extract_rejects_wrong_token() {
    let (converter, calls) = StubConverter::new();
    let app = make_app(Arc::new(converter));

    let response = app
        .oneshot(extract_request("/extract", "doc.pdf", Some("wrong")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_extract_rejects_non_pdf_without_converting() {
    let (converter, calls) = StubConverter::new();
    let app = make_app(Arc::new(converter));

    let response = app
        .oneshot(extract_request("/extract", "notes.docx", Some(API_KEY)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Only PDF files are supported");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_extract_success_shape() {
    let (converter, calls) = StubConverter::new();
    let app = make_app(Arc::new(converter));

    let response = app
        .oneshot(extract_request("/extract", "Report.PDF", Some(API_KEY)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["filename"], "Report.PDF");
    assert_eq!(body["success"], true);

    let content = &body["content"];
    assert_eq!(
        content["markdown"],
        "# Sample Report\n\nFirst paragraph of the body."
    );
    assert_eq!(content["structure"]["title"], "Sample Report");
    assert_eq!(content["structure"]["sections"][0]["level"], 1);
    assert_eq!(content["structure"]["sections"][0]["type"], "title");
    assert_eq!(content["structure"]["tables"][0]["index"], 0);
    assert_eq!(
        content["structure"]["tables"][0]["description"],
        "Table 1 from document"
    );
    assert_eq!(content["text_chunks"][0]["type"], "paragraph_group");
    assert_eq!(content["metadata"]["page_count"], 2);
    assert_eq!(content["metadata"]["has_tables"], true);
    assert_eq!(content["metadata"]["has_images"], false);
    assert_eq!(content["metadata"]["processing_method"], "docling");

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_extract_failure_is_200_with_success_false() {
    let app = make_app(Arc::new(FailingConverter));

    let response = app
        .oneshot(extract_request("/extract", "bad.pdf", Some(API_KEY)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["filename"], "bad.pdf");
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("truncated xref"));
    assert!(body["content"].is_null());
}

#[tokio::test]
async fn test_callback_failure_falls_back_to_full_result() {
    let (converter, _) = StubConverter::new();
    let app = make_app(Arc::new(converter));

    // Nothing listens on port 9; delivery fails fast with a refused
    // connection and the handler must fall back to the direct response.
    let uri = "/extract?callback_url=http%3A%2F%2F127.0.0.1%3A9%2Fcb&resource_id=res-1";
    let response = app
        .oneshot(extract_request(uri, "doc.pdf", Some(API_KEY)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert!(body["content"]["markdown"].as_str().is_some());
}

#[tokio::test]
async fn test_callback_delivery() {
    use axum::{Json, Router, routing::post};
    use tokio::sync::Mutex;

    let received: Arc<Mutex<Option<serde_json::Value>>> = Arc::new(Mutex::new(None));
    let sink = received.clone();

    let callback_app = Router::new().route(
        "/cb",
        post(move |Json(payload): Json<serde_json::Value>| {
            let sink = sink.clone();
            async move {
                *sink.lock().await = Some(payload);
                StatusCode::OK
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, callback_app).await.unwrap();
    });

    let (converter, _) = StubConverter::new();
    let app = make_app(Arc::new(converter));

    let uri = format!(
        "/extract?callback_url=http%3A%2F%2F{}%2Fcb&resource_id=res-42",
        addr.to_string().replace(':', "%3A")
    );
    let response = app
        .oneshot(extract_request(&uri, "doc.pdf", Some(API_KEY)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Results sent to callback URL");
    assert_eq!(body["resource_id"], "res-42");

    let payload = received.lock().await.take().expect("callback not received");
    assert_eq!(payload["resource_id"], "res-42");
    assert_eq!(payload["success"], true);
    assert_eq!(payload["extraction_method"], "docling");
    assert_eq!(
        payload["content"],
        "# Sample Report\n\nFirst paragraph of the body."
    );
    assert_eq!(
        payload["characters_extracted"],
        "# Sample Report\n\nFirst paragraph of the body.".len()
    );
    assert!(payload["structured_data"]["metadata"]["page_count"].is_number());
}
