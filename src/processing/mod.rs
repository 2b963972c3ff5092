//! Summarization pipeline: clamping, chunking, map-reduce orchestration, and fallback.

pub mod chunking;
pub mod clamp;
pub mod fallback;
pub mod orchestrator;
mod service;
pub mod types;

pub use service::{FALLBACK_NOTE, SummaryApi, SummaryService};
pub use types::{
    LengthBounds, LengthPreset, RequestError, SummarizationError, SummaryProvider, SummaryResult,
};
