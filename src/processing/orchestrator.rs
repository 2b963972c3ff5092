//! Map-reduce summarization over sentence-aligned chunks.

use super::chunking::split_into_chunks;
use super::clamp::truncate_chars;
use super::types::LengthPreset;
use crate::config::PipelineConfig;
use crate::summarization::{ExternalError, SummarizationClient};
use std::sync::Arc;

const PARTIAL_SEPARATOR: &str = "\n\n";

/// Result of a successful map-reduce run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapReduceOutcome {
    /// Final abstractive summary.
    pub summary: String,
    /// Number of chunks the input was split into.
    pub chunk_count: usize,
    /// Number of engine calls issued.
    pub engine_calls: usize,
}

/// Drives the external engine across chunks of a document.
///
/// Calls are issued one at a time, in chunk order, and the first failure aborts the run.
pub struct SummarizationOrchestrator {
    client: Arc<dyn SummarizationClient>,
    limits: PipelineConfig,
}

impl SummarizationOrchestrator {
    /// Create an orchestrator over `client` using the chunking and reduction limits in `limits`.
    pub fn new(client: Arc<dyn SummarizationClient>, limits: PipelineConfig) -> Self {
        Self { client, limits }
    }

    /// Summarize `text` at `preset`.
    ///
    /// A single chunk is summarized once at `preset`. Several chunks are each summarized at the
    /// demoted preset, then their joined partials (capped at the reduction ceiling) are
    /// summarized once more at `preset`.
    pub async fn summarize(
        &self,
        text: &str,
        preset: LengthPreset,
    ) -> Result<MapReduceOutcome, ExternalError> {
        let chunks = split_into_chunks(text, self.limits.chunk_size, self.limits.lookahead);
        if chunks.len() <= 1 {
            let input = chunks.first().copied().unwrap_or(text);
            let summary = self.client.summarize_once(input, preset).await?;
            return Ok(MapReduceOutcome {
                summary,
                chunk_count: chunks.len(),
                engine_calls: 1,
            });
        }

        let chunk_preset = preset.demote();
        tracing::debug!(
            chunks = chunks.len(),
            preset = %preset,
            chunk_preset = %chunk_preset,
            "Summarizing chunks"
        );
        let mut partials = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let partial = self.client.summarize_once(chunk, chunk_preset).await?;
            tracing::trace!(chunk = index, partial_chars = partial.len(), "Chunk summarized");
            partials.push(partial);
        }

        let combined = partials.join(PARTIAL_SEPARATOR);
        let reduce_input = truncate_chars(&combined, self.limits.reduce_ceiling);
        let summary = self.client.summarize_once(reduce_input, preset).await?;
        Ok(MapReduceOutcome {
            summary,
            chunk_count: chunks.len(),
            engine_calls: chunks.len() + 1,
        })
    }
}
