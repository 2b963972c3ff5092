//! Core data types and error definitions for the summarization pipeline.

use crate::extraction::ExtractionError;
use crate::storage::LocateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Caller-chosen coarse target for summary length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthPreset {
    /// Roughly a paragraph.
    Short,
    /// The default when callers do not ask for anything specific.
    #[default]
    Medium,
    /// A page-length digest.
    Long,
}

/// Summary length bounds, in the external engine's length units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    /// Minimum summary length.
    pub min: u32,
    /// Maximum summary length.
    pub max: u32,
}

impl LengthPreset {
    /// All presets, shortest first.
    pub const ALL: [LengthPreset; 3] = [Self::Short, Self::Medium, Self::Long];

    /// Look up the engine length bounds for this preset.
    pub const fn bounds(self) -> LengthBounds {
        match self {
            Self::Short => LengthBounds { min: 80, max: 250 },
            Self::Medium => LengthBounds { min: 160, max: 600 },
            Self::Long => LengthBounds { min: 280, max: 900 },
        }
    }

    /// Preset used for per-chunk passes so partial summaries leave room for the reduction.
    pub const fn demote(self) -> Self {
        match self {
            Self::Long => Self::Medium,
            other => other,
        }
    }

    /// Number of sentences the extractive fallback aims to keep.
    pub const fn sentence_target(self) -> usize {
        match self {
            Self::Short => 6,
            Self::Medium => 12,
            Self::Long => 18,
        }
    }

    /// Parse a user supplied value, mapping anything unrecognised to [`LengthPreset::Medium`].
    pub fn parse_lenient(value: Option<&str>) -> Self {
        value
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for LengthPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LengthPreset {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            _ => Err(()),
        }
    }
}

/// Which path produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SummaryProvider {
    /// Abstractive summary from the hosted engine.
    #[serde(rename = "huggingface")]
    External,
    /// Deterministic extractive summary computed locally.
    #[serde(rename = "fallback")]
    Fallback,
}

/// Summary returned to callers. Created per request and never persisted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    /// Rendered summary text.
    #[serde(rename = "summary")]
    pub text: String,
    /// Provider that produced `text`.
    pub provider: SummaryProvider,
    /// Preset the summary was produced for.
    pub length: LengthPreset,
}

/// Errors surfaced by [`crate::processing::SummaryService::produce_summary`].
#[derive(Debug, Error)]
pub enum SummarizationError {
    /// Extraction succeeded but produced only whitespace.
    #[error("No readable text in file")]
    NoReadableText,
    /// Text extraction failed.
    #[error("Failed to extract text: {0}")]
    ExtractionFailed(#[from] ExtractionError),
}

/// Errors surfaced by the upload-oriented request path.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The stored file could not be located.
    #[error(transparent)]
    Locate(#[from] LocateError),
    /// The located document could not be summarized.
    #[error(transparent)]
    Summarization(#[from] SummarizationError),
}
