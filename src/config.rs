use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the summarization pipeline.
///
/// Loaded once at process start and passed explicitly into every component
/// entry point; components never read ambient environment state themselves.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model identifier passed to the inference backend.
    pub model: String,
    /// Base URL of the local Ollama runtime.
    pub ollama_url: String,
    /// Maximum number of input characters sent per summarization request.
    pub max_input_chars: usize,
    /// Maximum number of tokens the backend may generate per request.
    pub max_output_tokens: u32,
    /// Root directory for batch-run artifacts (`raw/`, `processed/`, `summaries/`).
    pub data_dir: PathBuf,
}

// Small local models need modest input sizes for speed and quality.
const DEFAULT_MODEL: &str = "phi3:mini";
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_MAX_INPUT_CHARS: usize = 1800;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 256;
const DEFAULT_DATA_DIR: &str = "data";

impl Config {
    /// Load configuration from the environment, reading a local `.env` file first
    /// when one is present. Every key is optional and falls back to a default.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Build configuration from environment variables without touching `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            model: load_env_optional("MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ollama_url: load_env_optional("OLLAMA_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            max_input_chars: parse_env_optional("MAX_CHARS")?.unwrap_or(DEFAULT_MAX_INPUT_CHARS),
            max_output_tokens: parse_env_optional("MAX_TOKENS")?
                .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
            data_dir: load_env_optional("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        };
        tracing::debug!(
            model = %config.model,
            ollama_url = %config.ollama_url,
            max_input_chars = config.max_input_chars,
            max_output_tokens = config.max_output_tokens,
            data_dir = %config.data_dir.display(),
            "Loaded configuration"
        );
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_budgets() {
        let config = Config::default();
        assert_eq!(config.model, "phi3:mini");
        assert_eq!(config.max_input_chars, 1800);
        assert_eq!(config.max_output_tokens, 256);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }
}
