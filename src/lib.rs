#![deny(missing_docs)]

//! Core library for Lectern, the lecture summarization service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Text extraction from uploaded documents.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Summary counters.
pub mod metrics;
/// Summarization pipeline utilities.
pub mod processing;
/// Upload location helpers.
pub mod storage;
/// External abstractive summarization engine client.
pub mod summarization;
