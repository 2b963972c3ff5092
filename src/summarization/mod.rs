//! Abstractions for generating abstractive summaries via a hosted inference engine.
//!
//! The engine is optional; without a credential every call fails fast with
//! [`ExternalError::MissingKey`] and the processing layer switches to the deterministic
//! extractive fallback. The Hugging Face client issues one HTTP request per call and never
//! retries.

use crate::config::EngineConfig;
use crate::processing::clamp::truncate_chars;
use crate::processing::types::LengthPreset;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use thiserror::Error;

/// Returned when the engine answers successfully but without a usable summary.
pub const EMPTY_SUMMARY: &str = "No summary.";

const MAX_ERROR_BODY_CHARS: usize = 300;
const REPETITION_PENALTY: f64 = 1.05;

/// Errors surfaced while calling the external summarization engine.
#[derive(Debug, Error)]
pub enum ExternalError {
    /// No credential is configured, so no request was attempted.
    #[error("Summarization engine credential is not configured")]
    MissingKey,
    /// The engine answered with a non-success status.
    #[error("Summarization engine returned {status}: {body}")]
    Http {
        /// HTTP status code returned by the engine.
        status: u16,
        /// Response body, truncated for logging.
        body: String,
    },
    /// The engine response could not be decoded.
    #[error("Malformed engine response: {0}")]
    Malformed(String),
    /// The request never reached the engine.
    #[error("Summarization engine unreachable: {0}")]
    Unreachable(String),
}

/// Interface implemented by abstractive summarization engines.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Condense `text` once, targeting the bounds of `preset`.
    async fn summarize_once(
        &self,
        text: &str,
        preset: LengthPreset,
    ) -> Result<String, ExternalError>;
}

/// Client for the Hugging Face hosted inference API.
pub struct HuggingFaceClient {
    http: Client,
    config: EngineConfig,
}

impl HuggingFaceClient {
    /// Build a client for the configured model.
    pub fn new(config: EngineConfig) -> Result<Self, ExternalError> {
        let http = Client::builder()
            .user_agent("lectern/summary")
            .build()
            .map_err(|error| ExternalError::Unreachable(format!("failed to build client: {error}")))?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl SummarizationClient for HuggingFaceClient {
    async fn summarize_once(
        &self,
        text: &str,
        preset: LengthPreset,
    ) -> Result<String, ExternalError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ExternalError::MissingKey)?;
        let bounds = preset.bounds();
        let payload = json!({
            "inputs": text,
            "parameters": {
                "min_length": bounds.min,
                "max_length": bounds.max,
                "do_sample": false,
                "repetition_penalty": REPETITION_PENALTY,
            },
            "options": { "wait_for_model": true }
        });

        tracing::debug!(
            model = %self.config.model,
            preset = %preset,
            input_chars = text.chars().count(),
            "Requesting abstractive summary"
        );
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                ExternalError::Unreachable(format!(
                    "failed to reach {}: {error}",
                    self.config.base_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalError::Http {
                status: status.as_u16(),
                body: truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS).to_string(),
            });
        }

        let body: Value = response.json().await.map_err(|error| {
            ExternalError::Malformed(format!("failed to decode engine response: {error}"))
        })?;
        Ok(extract_summary(&body))
    }
}

/// Pull `summary_text` out of either `{...}` or `[{...}]`, degrading to [`EMPTY_SUMMARY`].
fn extract_summary(body: &Value) -> String {
    let record = match body {
        Value::Array(items) => items.first(),
        other => Some(other),
    };
    record
        .and_then(|value| value.get("summary_text"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|summary| !summary.is_empty())
        .unwrap_or(EMPTY_SUMMARY)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> HuggingFaceClient {
        HuggingFaceClient::new(EngineConfig {
            api_key: api_key.map(str::to_string),
            model: "facebook/bart-large-cnn".into(),
            base_url: server.url("/models"),
        })
        .expect("client")
    }

    #[tokio::test]
    async fn sends_bounds_and_reads_array_response() {
        let server = MockServer::start_async().await;
        let client = client_for(&server, Some("hf_test"));

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/facebook/bart-large-cnn")
                    .header("authorization", "Bearer hf_test")
                    .json_body_partial(
                        r#"{"parameters":{"min_length":80,"max_length":250,"do_sample":false},"options":{"wait_for_model":true}}"#,
                    );
                then.status(200)
                    .json_body(json!([{ "summary_text": "  Entropy grows.  " }]));
            })
            .await;

        let summary = client
            .summarize_once("Long lecture text.", LengthPreset::Short)
            .await
            .expect("summary");

        mock.assert_async().await;
        assert_eq!(summary, "Entropy grows.");
    }

    #[tokio::test]
    async fn reads_object_response() {
        let server = MockServer::start_async().await;
        let client = client_for(&server, Some("hf_test"));
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200)
                    .json_body(json!({ "summary_text": "Object shaped." }));
            })
            .await;

        let summary = client
            .summarize_once("text", LengthPreset::Long)
            .await
            .expect("summary");
        assert_eq!(summary, "Object shaped.");
    }

    #[tokio::test]
    async fn missing_summary_field_degrades_to_placeholder() {
        let server = MockServer::start_async().await;
        let client = client_for(&server, Some("hf_test"));
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!([{ "generated_text": 42 }]));
            })
            .await;

        let summary = client
            .summarize_once("text", LengthPreset::Medium)
            .await
            .expect("summary");
        assert_eq!(summary, EMPTY_SUMMARY);
    }

    #[tokio::test]
    async fn error_status_carries_code_and_truncated_body() {
        let server = MockServer::start_async().await;
        let client = client_for(&server, Some("hf_test"));
        let long_body = "model loading ".repeat(100);
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(503).body(long_body.clone());
            })
            .await;

        let error = client
            .summarize_once("text", LengthPreset::Medium)
            .await
            .expect_err("error response");

        match error {
            ExternalError::Http { status, body } => {
                assert_eq!(status, 503);
                assert!(body.chars().count() <= MAX_ERROR_BODY_CHARS);
                assert!(body.starts_with("model loading"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start_async().await;
        let client = client_for(&server, Some("hf_test"));
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).body("<html>gateway</html>");
            })
            .await;

        let error = client
            .summarize_once("text", LengthPreset::Medium)
            .await
            .expect_err("malformed");
        assert!(matches!(error, ExternalError::Malformed(_)));
    }

    #[tokio::test]
    async fn missing_key_skips_the_network() {
        let server = MockServer::start_async().await;
        let client = client_for(&server, None);
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({ "summary_text": "unused" }));
            })
            .await;

        let error = client
            .summarize_once("text", LengthPreset::Short)
            .await
            .expect_err("missing key");
        assert!(matches!(error, ExternalError::MissingKey));
        mock.assert_hits_async(0).await;
    }

    #[test]
    fn extract_summary_handles_shapes() {
        assert_eq!(extract_summary(&json!({ "summary_text": "a" })), "a");
        assert_eq!(extract_summary(&json!([{ "summary_text": "b" }])), "b");
        assert_eq!(extract_summary(&json!([])), EMPTY_SUMMARY);
        assert_eq!(extract_summary(&json!({ "summary_text": "   " })), EMPTY_SUMMARY);
        assert_eq!(extract_summary(&json!("bare string")), EMPTY_SUMMARY);
    }
}
