//! HTTP surface for Lectern.
//!
//! - `POST /summarize?length=short|medium|long` – Summarize an uploaded lecture file. The body
//!   names the stored file (`file_url`, e.g. `/uploads/1700000000_week1.pdf`) and an optional
//!   `mime_hint`. Returns `{ "summary", "provider", "length" }`; `provider` is `fallback` when the
//!   local extractive summarizer stood in for the hosted engine.
//! - `GET /metrics` – Summary counters by provider.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.

use crate::processing::{LengthPreset, RequestError, SummarizationError, SummaryApi, SummaryResult};
use crate::storage::LocateError;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the summarization API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: SummaryApi + 'static,
{
    Router::new()
        .route("/summarize", post(summarize_lecture::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// Query string for `POST /summarize`.
#[derive(Deserialize)]
struct SummarizeQuery {
    /// Requested length preset; unknown values fall back to `medium`.
    #[serde(default)]
    length: Option<String>,
}

/// Request body for `POST /summarize`.
#[derive(Deserialize)]
struct SummarizeRequest {
    /// Stored file URL as recorded at upload time.
    file_url: String,
    /// Optional MIME type reported by the uploader.
    #[serde(default)]
    mime_hint: Option<String>,
}

/// Summarize a stored lecture file.
async fn summarize_lecture<S>(
    State(service): State<Arc<S>>,
    Query(query): Query<SummarizeQuery>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummaryResult>, AppError>
where
    S: SummaryApi,
{
    let preset = LengthPreset::parse_lenient(query.length.as_deref());
    let result = service
        .summarize_upload(&request.file_url, request.mime_hint.as_deref(), preset)
        .await?;
    tracing::info!(
        file_url = %request.file_url,
        preset = %preset,
        provider = ?result.provider,
        "Summarize request completed"
    );
    Ok(Json(result))
}

/// Return summary counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<serde_json::Value>
where
    S: SummaryApi,
{
    Json(json!(service.metrics_snapshot()))
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summarize?length=medium",
                description: "Summarize an uploaded lecture file. Response returns { \"summary\": string, \"provider\": \"huggingface\" | \"fallback\", \"length\": string }.",
                request_example: Some(json!({
                    "file_url": "/uploads/1700000000_week1.pdf",
                    "mime_hint": "application/pdf"
                })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return summary counters split by provider.",
                request_example: None,
            },
        ],
    })
}

struct AppError(RequestError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            RequestError::Locate(LocateError::NotAnUpload(_)) => {
                (StatusCode::BAD_REQUEST, "Lecture file not found")
            }
            RequestError::Locate(LocateError::Missing(_)) => {
                (StatusCode::NOT_FOUND, "File missing on server")
            }
            RequestError::Summarization(SummarizationError::NoReadableText) => {
                (StatusCode::BAD_REQUEST, "No readable text in file")
            }
            RequestError::Summarization(SummarizationError::ExtractionFailed(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Summarization failed")
            }
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Summarize route error");
        }
        let body = Json(json!({ "error": message, "detail": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl From<RequestError> for AppError {
    fn from(inner: RequestError) -> Self {
        Self(inner)
    }
}
