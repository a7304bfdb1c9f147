#![deny(missing_docs)]

//! Core library for the docbrief document summarizer.

/// Command-line surface and entry-point dispatch.
pub mod cli;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Document processing pipeline: extraction, cleaning, segmentation.
pub mod pipeline;
/// On-disk layout for batch runs.
pub mod store;
/// Summarization backend abstraction and the Ollama adapter.
pub mod summarize;
