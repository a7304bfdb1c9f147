//! Command-line surface for the summarization pipeline.
//!
//! Three stage commands mirror the batch workflow on disk (`extract`,
//! `segment`, `summarize`, chained through `data/`), and `run` drives the
//! whole pipeline on one document without intermediate files. Fatal
//! conditions (missing input, unreachable backend, absent model) exit with
//! status 1 and an actionable hint.

use crate::config::Config;
use crate::pipeline::{self, DocumentPipeline};
use crate::store::{self, RunLayout};
use crate::summarize::{
    DEFAULT_PREFLIGHT_TIMEOUT, OllamaSummarizer, SummarizeError, SummaryBackend,
};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Split a document into sections and summarize each with a local model.
#[derive(Parser, Debug)]
#[command(name = "docbrief", version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract and clean a PDF or TXT file into data/raw/<run>.pdf.txt
    Extract {
        /// Path to the PDF or TXT input
        input: PathBuf,
        /// Run name grouping this document's artifacts
        #[arg(default_value = "sample")]
        run: String,
    },
    /// Split extracted text into per-section files under data/processed/<run>/
    Segment {
        /// Run name written by the extract stage
        #[arg(default_value = "sample")]
        run: String,
    },
    /// Summarize each section file into data/summaries/<run>/
    Summarize {
        /// Run name written by the segment stage
        #[arg(default_value = "sample")]
        run: String,
    },
    /// Run the full pipeline on one document and print each section's summary
    Run {
        /// Path to the PDF or TXT input
        input: PathBuf,
    },
}

impl Cli {
    /// Dispatch the parsed subcommand against the loaded configuration.
    pub async fn run(self, config: &Config) -> Result<()> {
        match self.command {
            Command::Extract { input, run } => extract_command(config, &input, &run),
            Command::Segment { run } => segment_command(config, &run),
            Command::Summarize { run } => summarize_command(config, &run).await,
            Command::Run { input } => run_command(config, &input).await,
        }
    }
}

fn extract_command(config: &Config, input: &Path, run: &str) -> Result<()> {
    let raw = pipeline::extract(input)?;
    let cleaned = pipeline::clean(&raw);

    let out_path = RunLayout::new(&config.data_dir, run).raw_text_path();
    store::write_with_parents(&out_path, &cleaned)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;
    println!("Wrote raw text to: {}", out_path.display());
    Ok(())
}

fn segment_command(config: &Config, run: &str) -> Result<()> {
    let layout = RunLayout::new(&config.data_dir, run);
    let in_path = layout.raw_text_path();
    if !in_path.exists() {
        bail!("Run extract first. Text not found: {}", in_path.display());
    }
    let text = fs::read_to_string(&in_path)
        .with_context(|| format!("Failed to read {}", in_path.display()))?;

    let sections = pipeline::segment(&text);
    let out_dir = layout.processed_dir();
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    for section in sections.iter() {
        let path = out_dir.join(format!("{}.txt", store::slugify(&section.title)));
        store::write_with_parents(&path, &section.body)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    println!("Wrote {} sections to: {}", sections.len(), out_dir.display());
    Ok(())
}

async fn summarize_command(config: &Config, run: &str) -> Result<()> {
    let layout = RunLayout::new(&config.data_dir, run);
    let summarizer = OllamaSummarizer::new(config);

    println!("Backend: Ollama | Model: {}", config.model);

    if let Err(error) = summarizer.wait_until_reachable(DEFAULT_PREFLIGHT_TIMEOUT).await {
        bail!("{error}\nOpen a terminal and run:  ollama serve   (or ensure the service is running)");
    }
    summarizer.ensure_model().await?;

    let input_dir = layout.processed_dir();
    let files = store::section_files(&input_dir);
    if files.is_empty() {
        bail!(
            "No input files found in: {}. Run segment first.",
            input_dir.display()
        );
    }

    let output_dir = layout.summaries_dir();
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    println!("Found {} section files. Summarizing...", files.len());
    for (index, file) in files.iter().enumerate() {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("section.txt");
        print!("[{}/{}] {} ...", index + 1, files.len(), name);
        std::io::stdout().flush().ok();

        match summarize_file(&summarizer, file, &output_dir.join(name)).await {
            Ok(()) => println!(" done"),
            Err(error) => println!(" error: {error:#}"),
        }
    }
    Ok(())
}

/// Summarize one section file, recording an empty summary when the backend
/// call fails; only filesystem errors bubble up to the progress line.
async fn summarize_file(
    summarizer: &OllamaSummarizer,
    input: &Path,
    output: &Path,
) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let section_name = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("section");

    let summary = match summarizer.summarize(&text, section_name).await {
        Ok(summary) => summary,
        Err(error @ (SummarizeError::Backend(_) | SummarizeError::InvalidResponse(_))) => {
            tracing::warn!(
                section = section_name,
                error = %error,
                "Summarization failed; recording empty summary"
            );
            String::new()
        }
        Err(fatal) => return Err(fatal.into()),
    };

    store::write_with_parents(output, &summary)
        .with_context(|| format!("Failed to write {}", output.display()))
}

async fn run_command(config: &Config, input: &Path) -> Result<()> {
    let pipeline = DocumentPipeline::new(Box::new(OllamaSummarizer::new(config)));
    let summaries = pipeline.process(input).await?;

    for entry in &summaries {
        println!("## {}", entry.title);
        if entry.summary.is_empty() {
            println!("(no summary generated)");
        } else {
            println!("{}", entry.summary);
        }
        println!();
    }
    Ok(())
}
