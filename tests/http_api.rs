mod support;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use docgen::{
    api::create_router,
    config::Config,
    generation::{GenerationSettings, MISSING_API_KEY_MESSAGE, TextGenerator},
};
use serde_json::{Value, json};
use std::sync::Arc;
use support::{docx_bytes, pdf_bytes, text_lines};
use tower::ServiceExt;

const BOUNDARY: &str = "docgen-test-boundary";

/// Router wired to a real generator without an API key, so nothing leaves the process.
fn app() -> Router {
    app_with(Config::default())
}

fn app_with(config: Config) -> Router {
    let generator = TextGenerator::new(GenerationSettings {
        api_key: None,
        ..config.generation_settings()
    })
    .expect("generator");
    create_router(Arc::new(generator), &config)
}

fn multipart_request(field: &str, filename: Option<&str>, data: &[u8]) -> Request<Body> {
    let disposition = match filename {
        Some(filename) => format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream"
        ),
        None => format!("Content-Disposition: form-data; name=\"{field}\""),
    };
    let mut body = format!("--{BOUNDARY}\r\n{disposition}\r\n\r\n").into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/extract")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

async fn body_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json body")
}

#[tokio::test]
async fn hello_route_returns_acknowledgment() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/hello")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Hello from FastAPI!" })
    );
}

#[tokio::test]
async fn generate_without_api_key_fails_closed() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/generate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "prompt": "hello" }).to_string()))
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "text": MISSING_API_KEY_MESSAGE })
    );
}

#[tokio::test]
async fn extract_returns_docx_text() {
    let upload = docx_bytes(&["Hello", "", "World"]);
    let response = app()
        .oneshot(multipart_request("file", Some("letter.docx"), &upload))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "filename": "letter.docx", "text": "Hello\nWorld" })
    );
}

#[tokio::test]
async fn extract_returns_pdf_text() {
    let upload = pdf_bytes(&["Invoice 42", "Total due"]);
    let response = app()
        .oneshot(multipart_request("file", Some("invoice.PDF"), &upload))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["filename"], "invoice.PDF");
    let text = json["text"].as_str().expect("pdf text");
    assert_eq!(text_lines(text), vec!["Invoice 42", "Total due"]);
}

#[tokio::test]
async fn extract_returns_null_for_unsupported_upload() {
    let response = app()
        .oneshot(multipart_request("file", Some("notes.txt"), b"plain text"))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "filename": "notes.txt", "text": null })
    );
}

#[tokio::test]
async fn extract_without_file_part_is_bad_request() {
    let response = app()
        .oneshot(multipart_request("comment", None, b"no file here"))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "No file uploaded" })
    );
}

#[tokio::test]
async fn extract_rejects_upload_over_body_limit() {
    let config = Config {
        max_upload_bytes: 1024,
        ..Config::default()
    };
    let upload = vec![b'x'; 4 * 1024];
    let response = app_with(config)
        .oneshot(multipart_request("file", Some("large.pdf"), &upload))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    assert!(
        json["error"]
            .as_str()
            .is_some_and(|message| message.starts_with("Failed to read multipart")),
        "body: {json}"
    );
}

#[tokio::test]
async fn extract_accepts_upload_within_body_limit() {
    let config = Config {
        max_upload_bytes: 64 * 1024,
        ..Config::default()
    };
    let response = app_with(config)
        .oneshot(multipart_request("file", Some("notes.txt"), b"small"))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
}
