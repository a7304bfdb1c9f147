//! Document processing pipeline: extraction, cleaning, segmentation, and the
//! end-to-end orchestrator.
//!
//! Each stage owns and fully consumes its input, producing a fresh value for
//! the next stage. Documents are processed one at a time and sections are
//! summarized strictly sequentially.

/// Text normalization between extraction and segmentation.
pub mod clean;
/// Raw text extraction for PDF and plain-text inputs.
pub mod extract;
/// Header detection and section splitting.
pub mod segment;
/// Shared pipeline data types and errors.
pub mod types;

pub use clean::clean;
pub use extract::extract;
pub use segment::{HeaderRule, Section, SectionMap, detect_header, segment};
pub use types::{ExtractError, SectionSummary};

use crate::summarize::SummaryBackend;
use std::path::Path;

/// Runs one document end-to-end: extract, clean, segment, summarize.
///
/// The pipeline owns the summarization backend; construct it once near
/// process start. A single section's backend failure downgrades to an empty
/// summary rather than aborting the document.
pub struct DocumentPipeline {
    backend: Box<dyn SummaryBackend>,
}

impl DocumentPipeline {
    /// Build a pipeline around a summarization backend.
    pub fn new(backend: Box<dyn SummaryBackend>) -> Self {
        Self { backend }
    }

    /// Process one document, returning a summary per detected section.
    pub async fn process(&self, path: &Path) -> Result<Vec<SectionSummary>, ExtractError> {
        let raw = extract(path)?;
        let cleaned = clean(&raw);
        let sections = segment(&cleaned);
        tracing::info!(
            path = %path.display(),
            sections = sections.len(),
            "Document segmented"
        );

        let mut summaries = Vec::with_capacity(sections.len());
        for section in sections.iter() {
            let summary = self.summarize_section(&section.title, &section.body).await;
            summaries.push(SectionSummary {
                title: section.title.clone(),
                summary,
            });
        }
        Ok(summaries)
    }

    /// Summarize one section, isolating backend failures to an empty summary.
    pub async fn summarize_section(&self, title: &str, body: &str) -> String {
        match self.backend.summarize(body, title).await {
            Ok(summary) => {
                tracing::debug!(section = title, "Section summarized");
                summary
            }
            Err(error) => {
                tracing::warn!(
                    section = title,
                    error = %error,
                    "Summarization failed; recording empty summary"
                );
                String::new()
            }
        }
    }
}
