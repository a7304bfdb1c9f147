//! Core data types and error definitions for the processing pipeline.

use thiserror::Error;

/// Errors produced while turning an input file into raw text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Input path does not exist.
    #[error("File not found: {0}")]
    NotFound(String),
    /// Input extension is neither `.pdf` nor `.txt`.
    #[error("Unsupported file type: '{0}'. Use PDF or TXT.")]
    UnsupportedFormat(String),
    /// The PDF library could not extract text from the document.
    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),
    /// Filesystem read failed.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// A section title paired with the summary rendered for it.
///
/// Produced once per section by [`crate::pipeline::DocumentPipeline::process`];
/// an empty summary records an isolated backend failure for that section.
#[derive(Debug, Clone)]
pub struct SectionSummary {
    /// Section title as detected by segmentation.
    pub title: String,
    /// Rendered bullet summary, or empty when the backend call failed.
    pub summary: String,
}
