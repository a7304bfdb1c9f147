//! Abstractions for generating per-section summaries via a local Ollama runtime.
//!
//! The adapter issues one non-streaming chat request per section. The prompt
//! asks for a JSON object with `section` and `bullets` keys; replies that
//! ignore the instruction degrade gracefully to verbatim text, and an empty
//! reply becomes the no-content sentinel. Batch callers run a connectivity
//! preflight and a model-inventory check before the first request.

use crate::config::Config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;

/// Placeholder bullet used when a section has no extractable salient content.
pub const NO_CONTENT_SENTINEL: &str = "No salient content in this section.";

/// Overall budget for the batch-mode connectivity preflight.
pub const DEFAULT_PREFLIGHT_TIMEOUT: Duration = Duration::from_secs(5);

const PING_RETRY_INTERVAL: Duration = Duration::from_millis(250);
const PING_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors surfaced while talking to the summarization backend.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Backend did not answer the health probe within the timeout.
    #[error("Ollama server not reachable at {0}")]
    Unreachable(String),
    /// Configured model is absent from the backend's local inventory.
    #[error("Model '{0}' not found locally. Pull it first:\n  ollama pull {0}")]
    ModelMissing(String),
    /// Transport or backend error during a single summarization call.
    #[error("Failed to generate summary: {0}")]
    Backend(String),
    /// Backend response body could not be decoded.
    #[error("Malformed backend response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by summarization backends.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// Produce a bullet-point summary for one section of text.
    async fn summarize(&self, text: &str, section_name: &str)
    -> Result<String, SummarizeError>;
}

/// Summarization adapter for a local Ollama runtime.
pub struct OllamaSummarizer {
    http: Client,
    base_url: String,
    model: String,
    max_input_chars: usize,
    max_output_tokens: u32,
}

impl OllamaSummarizer {
    /// Build an adapter from the loaded configuration.
    pub fn new(config: &Config) -> Self {
        let http = Client::builder()
            .user_agent("docbrief/summary")
            .build()
            .expect("Failed to construct reqwest::Client for summarization");
        Self {
            http,
            base_url: config.ollama_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_input_chars: config.max_input_chars,
            max_output_tokens: config.max_output_tokens,
        }
    }

    fn chat_endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn tags_endpoint(&self) -> String {
        format!("{}/api/tags", self.base_url)
    }

    /// Poll the inventory endpoint until the backend answers or `timeout` elapses.
    pub async fn wait_until_reachable(&self, timeout: Duration) -> Result<(), SummarizeError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let probe = self
                .http
                .get(self.tags_endpoint())
                .timeout(PING_REQUEST_TIMEOUT)
                .send()
                .await;
            if let Ok(response) = probe {
                if response.status().is_success() {
                    return Ok(());
                }
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(SummarizeError::Unreachable(self.base_url.clone()));
            }
            tokio::time::sleep(PING_RETRY_INTERVAL).await;
        }
    }

    /// Verify the configured model is present in the backend's local inventory.
    pub async fn ensure_model(&self) -> Result<(), SummarizeError> {
        let response = self
            .http
            .get(self.tags_endpoint())
            .send()
            .await
            .map_err(|error| {
                SummarizeError::Unreachable(format!("{}: {error}", self.base_url))
            })?;

        if !response.status().is_success() {
            return Err(SummarizeError::Backend(format!(
                "model inventory request returned {}",
                response.status()
            )));
        }

        let inventory: ModelInventory = response.json().await.map_err(|error| {
            SummarizeError::InvalidResponse(format!("failed to decode model inventory: {error}"))
        })?;

        if inventory.models.iter().any(|entry| entry.model == self.model) {
            Ok(())
        } else {
            Err(SummarizeError::ModelMissing(self.model.clone()))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelInventory {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    #[serde(default)]
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
    #[serde(default)]
    done: bool,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl SummaryBackend for OllamaSummarizer {
    async fn summarize(
        &self,
        text: &str,
        section_name: &str,
    ) -> Result<String, SummarizeError> {
        let prompt = build_prompt(text, section_name, self.max_input_chars);
        let payload = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "stream": false,
            "options": {
                // Low temperature for stable structured output.
                "temperature": 0.2,
                // Modest context helps small local models.
                "num_ctx": 3072,
                "num_predict": self.max_output_tokens,
            }
        });

        let response = self
            .http
            .post(self.chat_endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizeError::Backend(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SummarizeError::Backend(format!(
                "chat endpoint {} returned 404",
                self.chat_endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Backend(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|error| {
            SummarizeError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        if !body.done {
            return Err(SummarizeError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(render_summary(&body.message.content))
    }
}

/// Build the summarization prompt, truncating input to the character budget.
pub(crate) fn build_prompt(text: &str, section_name: &str, max_chars: usize) -> String {
    let snippet: String = text.chars().take(max_chars).collect();
    format!(
        "You are a careful summarizer. ONLY use the given text.\n\
         Return JSON with keys: 'section', 'bullets'.\n\
         section must equal '{section_name}'.\n\
         bullets must be 3-5 short, factual bullet points. Include concrete names, metrics, dates if present.\n\
         If the text has no useful content, set bullets to ['{NO_CONTENT_SENTINEL}']\n\n\
         TEXT:\n{snippet}"
    )
}

/// Render a raw backend reply into the bullet list shown to the user.
///
/// A JSON object with a `bullets` array becomes one `• `-prefixed line per
/// entry, with the sentinel standing in when the list trims to nothing.
/// Anything that is not that shape passes through verbatim; an empty reply
/// becomes the sentinel on its own.
pub(crate) fn render_summary(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(trimmed) {
        if let Some(Value::Array(items)) = object.get("bullets") {
            let bullets: Vec<String> = items
                .iter()
                .map(bullet_text)
                .filter(|bullet| !bullet.is_empty())
                .collect();
            if bullets.is_empty() {
                return format!("• {NO_CONTENT_SENTINEL}");
            }
            return bullets
                .iter()
                .map(|bullet| format!("• {bullet}"))
                .collect::<Vec<_>>()
                .join("\n");
        }
    }

    if trimmed.is_empty() {
        NO_CONTENT_SENTINEL.to_string()
    } else {
        trimmed.to_string()
    }
}

fn bullet_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}
