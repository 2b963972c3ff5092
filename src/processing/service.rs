//! Summary service coordinating extraction, clamping, the engine, and the fallback.

use crate::{
    config::Config,
    extraction::{DocumentLocation, extract_text_async},
    metrics::{MetricsSnapshot, SummaryMetrics},
    processing::{
        clamp::clamp,
        fallback::fallback_summary,
        orchestrator::SummarizationOrchestrator,
        types::{LengthPreset, RequestError, SummarizationError, SummaryProvider, SummaryResult},
    },
    storage::UploadStore,
    summarization::{ExternalError, HuggingFaceClient, SummarizationClient},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Appended to fallback summaries when a configured engine failed.
pub const FALLBACK_NOTE: &str = "\n\n(Note: summarization engine unavailable; used local fallback.)";

/// Produces lecture summaries, preferring the external engine and degrading to the extractive
/// fallback whenever the engine is absent or fails.
///
/// Holds no per-request state; construct once and share through an `Arc`.
pub struct SummaryService {
    orchestrator: SummarizationOrchestrator,
    uploads: UploadStore,
    clamp_ceiling: usize,
    metrics: Arc<SummaryMetrics>,
}

/// Abstraction over the summary pipeline used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// Locate an uploaded lecture file and summarize it.
    async fn summarize_upload(
        &self,
        file_url: &str,
        mime_hint: Option<&str>,
        preset: LengthPreset,
    ) -> Result<SummaryResult, RequestError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl SummaryService {
    /// Build a service backed by the Hugging Face client described in `config`.
    pub fn new(config: &Config) -> Result<Self, ExternalError> {
        let client = HuggingFaceClient::new(config.engine.clone())?;
        tracing::info!(
            model = %config.engine.model,
            engine_configured = config.engine.api_key.is_some(),
            "Summary service initialized"
        );
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Build a service around an arbitrary engine client.
    pub fn with_client(config: &Config, client: Arc<dyn SummarizationClient>) -> Self {
        Self {
            orchestrator: SummarizationOrchestrator::new(client, config.pipeline),
            uploads: UploadStore::new(config.uploads_dir.clone()),
            clamp_ceiling: config.pipeline.clamp_ceiling,
            metrics: Arc::new(SummaryMetrics::new()),
        }
    }

    /// Extract, bound, and summarize the document at `document`.
    ///
    /// Engine failures never surface here; they switch the result to
    /// [`SummaryProvider::Fallback`].
    pub async fn produce_summary(
        &self,
        document: &DocumentLocation,
        preset: LengthPreset,
    ) -> Result<SummaryResult, SummarizationError> {
        tracing::info!(path = %document.path.display(), preset = %preset, "Summarizing document");
        let raw = extract_text_async(document.clone()).await?;
        self.summarize_text(&raw, preset).await
    }

    /// Summarize already extracted text.
    pub async fn summarize_text(
        &self,
        raw: &str,
        preset: LengthPreset,
    ) -> Result<SummaryResult, SummarizationError> {
        let text = clamp(raw, self.clamp_ceiling);
        if text.trim().is_empty() {
            return Err(SummarizationError::NoReadableText);
        }

        match self.orchestrator.summarize(&text, preset).await {
            Ok(outcome) => {
                self.metrics.record_external(outcome.engine_calls as u64);
                tracing::info!(
                    preset = %preset,
                    chunks = outcome.chunk_count,
                    engine_calls = outcome.engine_calls,
                    "Abstractive summary ready"
                );
                Ok(SummaryResult {
                    text: outcome.summary,
                    provider: SummaryProvider::External,
                    length: preset,
                })
            }
            Err(error) => {
                let mut summary = fallback_summary(&text, preset);
                if matches!(error, ExternalError::MissingKey) {
                    tracing::debug!("Summarization engine not configured; using local fallback");
                } else {
                    tracing::warn!(
                        error = %error,
                        "Abstractive summarization failed; falling back to extractive"
                    );
                    summary.push_str(FALLBACK_NOTE);
                }
                self.metrics.record_fallback();
                Ok(SummaryResult {
                    text: summary,
                    provider: SummaryProvider::Fallback,
                    length: preset,
                })
            }
        }
    }

    /// Locate an uploaded lecture file and summarize it.
    pub async fn summarize_upload(
        &self,
        file_url: &str,
        mime_hint: Option<&str>,
        preset: LengthPreset,
    ) -> Result<SummaryResult, RequestError> {
        let document = self.uploads.locate(file_url, mime_hint)?;
        Ok(self.produce_summary(&document, preset).await?)
    }

    /// Return the current summary metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl SummaryApi for SummaryService {
    async fn summarize_upload(
        &self,
        file_url: &str,
        mime_hint: Option<&str>,
        preset: LengthPreset,
    ) -> Result<SummaryResult, RequestError> {
        SummaryService::summarize_upload(self, file_url, mime_hint, preset).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        SummaryService::metrics_snapshot(self)
    }
}
