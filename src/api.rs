//! HTTP surface for docgen.
//!
//! This module exposes a compact Axum router:
//!
//! - `GET /api/hello` – Static acknowledgment payload.
//! - `GET /api/models` – Gemini models the frontend can pick from, plus the default.
//! - `POST /api/generate` – Forward `{ "prompt", "model"? }` to Gemini and return `{ "text" }`.
//!   Failures are reported inside `text` with status 200, never as an HTTP error.
//! - `POST /api/extract` – Accept a multipart file upload and return
//!   `{ "filename", "text" }`, where `text` is `null` when nothing could be extracted.
//!
//! Cross-origin requests are allowed from the configured origins only, with credentials and any
//! method or header.

use crate::config::Config;
use crate::extraction;
use crate::generation::{AiModel, GenerationApi};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

const HELLO_MESSAGE: &str = "Hello from FastAPI!";

/// Build the HTTP router exposing the generation and extraction API surface.
pub fn create_router<S>(service: Arc<S>, config: &Config) -> Router
where
    S: GenerationApi + 'static,
{
    Router::new()
        .route("/api/hello", get(hello))
        .route("/api/models", get(list_models::<S>))
        .route("/api/generate", post(generate::<S>))
        .route("/api/extract", post(extract_document))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(service)
}

/// CORS policy for the configured origin allow-list.
///
/// Credentials are allowed, so methods and headers are mirrored from the preflight instead of
/// answered with `*`.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

#[derive(Serialize)]
struct HelloResponse {
    message: &'static str,
}

async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: HELLO_MESSAGE,
    })
}

/// Response body for `GET /api/models`.
#[derive(Serialize)]
struct ModelsResponse {
    default: String,
    models: Vec<&'static str>,
}

async fn list_models<S>(State(service): State<Arc<S>>) -> Json<ModelsResponse>
where
    S: GenerationApi,
{
    Json(ModelsResponse {
        default: service.default_model().to_string(),
        models: AiModel::ALL.iter().map(|model| model.as_str()).collect(),
    })
}

/// Request body for `POST /api/generate`.
#[derive(Deserialize)]
struct GenerateRequest {
    /// Prompt forwarded verbatim to the model.
    prompt: String,
    /// Optional model override (defaults to `DEFAULT_MODEL`).
    #[serde(default)]
    model: Option<String>,
}

/// Response body for `POST /api/generate`.
#[derive(Serialize)]
struct GenerateResponse {
    /// Model output, or a fixed error message.
    text: String,
}

/// Generate text for a prompt.
async fn generate<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<GenerateRequest>,
) -> Json<GenerateResponse>
where
    S: GenerationApi,
{
    let text = service
        .generate_text(&request.prompt, request.model.as_deref())
        .await;
    Json(GenerateResponse { text })
}

/// Response body for `POST /api/extract`.
#[derive(Serialize)]
struct ExtractResponse {
    filename: String,
    text: Option<String>,
}

/// Extract text from the first file part of a multipart upload.
async fn extract_document(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await?;
        tracing::info!(filename = %filename, bytes = data.len(), "Received upload");
        let text = extract_upload(&filename, data).await?;
        return Ok(Json(ExtractResponse { filename, text }));
    }
    Err(AppError::BadRequest("No file uploaded".to_string()))
}

/// Stage the upload in a temporary file that keeps the original extension, then extract it
/// on a blocking thread. The file is removed when the task finishes.
async fn extract_upload(filename: &str, data: Bytes) -> Result<Option<String>, AppError> {
    let suffix = Path::new(filename)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| format!(".{extension}"))
        .unwrap_or_default();

    tokio::task::spawn_blocking(move || -> std::io::Result<Option<String>> {
        let mut file = tempfile::Builder::new()
            .prefix("docgen-upload-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(&data)?;
        file.flush()?;
        Ok(extraction::extract_text(file.path()))
    })
    .await
    .map_err(|error| AppError::Internal(format!("extraction task failed: {error}")))?
    .map_err(|error| AppError::Internal(format!("failed to stage upload: {error}")))
}

enum AppError {
    BadRequest(String),
    Rejected(StatusCode, String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Rejected(status, message) => (status, message),
            Self::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Keeps axum's status for the rejection, so an upload over the body limit answers 413.
impl From<MultipartError> for AppError {
    fn from(inner: MultipartError) -> Self {
        Self::Rejected(
            inner.status(),
            format!("Failed to read multipart: {}", inner.body_text()),
        )
    }
}
