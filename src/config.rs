//! AI configuration: TOML file plus environment credentials.

use crate::ai::AiMoveProvider;
use crate::games::tictactoe::Mark;
use crate::llm_client::{LlmClient, LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Placeholder left in sample `.env` files.
const KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

/// Which AI backend to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiBackend {
    /// Ask a language model, falling back to random moves.
    #[default]
    Remote,
    /// Local tiered strategies; needs no credential.
    Local,
}

/// Configuration for the AI opponent.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct AiConfig {
    /// Remote or local move selection.
    #[serde(default)]
    backend: AiBackend,

    /// LLM provider (openai, anthropic or gemini).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name (e.g., "gemini-2.5-flash", "gpt-4o-mini").
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Optional base URL override for the provider API.
    #[serde(default)]
    api_base: Option<String>,

    /// Limit on one remote round trip, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    request_timeout_ms: u64,

    /// Pause before the AI moves, in milliseconds.
    #[serde(default = "default_ai_delay_ms")]
    ai_delay_ms: u64,

    /// Mark the AI plays.
    #[serde(default = "default_ai_mark")]
    ai_mark: Mark,
}

fn default_provider() -> LlmProvider {
    LlmProvider::Gemini
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_max_tokens() -> u32 {
    256
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_ai_delay_ms() -> u64 {
    500
}

fn default_ai_mark() -> Mark {
    Mark::O
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: AiBackend::default(),
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            api_base: None,
            request_timeout_ms: default_request_timeout_ms(),
            ai_delay_ms: default_ai_delay_ms(),
            ai_mark: default_ai_mark(),
        }
    }
}

impl AiConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            backend = ?config.backend,
            provider = %config.llm_provider,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Replaces the backend.
    pub fn with_backend(mut self, backend: AiBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Remote round-trip limit.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Pause before the AI moves.
    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }

    /// Creates LLM configuration using the provider's API key environment variable.
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        self.create_llm_config_with(|var| std::env::var(var).ok())
    }

    /// Creates LLM configuration, looking the API key up with `lookup`.
    pub fn create_llm_config_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<LlmConfig, ConfigError> {
        let var = self.llm_provider.api_key_var();
        let api_key = lookup(var)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && !key.contains(KEY_PLACEHOLDER))
            .ok_or_else(|| {
                warn!(var, "API key missing");
                ConfigError::new(format!("{} environment variable not set", var))
            })?;

        let config = LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
        );
        Ok(match &self.api_base {
            Some(base) => config.with_api_base(base.clone()),
            None => config,
        })
    }

    /// Builds the AI move provider this configuration describes.
    ///
    /// A remote backend without a credential is a configuration error.
    #[instrument(skip(self), fields(backend = ?self.backend))]
    pub fn build_provider(&self) -> Result<AiMoveProvider, ConfigError> {
        let provider = match self.backend {
            AiBackend::Local => AiMoveProvider::local(),
            AiBackend::Remote => {
                let client = LlmClient::new(self.create_llm_config()?);
                AiMoveProvider::remote(Arc::new(client))
            }
        };
        Ok(provider.with_timeout(self.request_timeout()))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_empty_file() {
        let config: AiConfig = toml::from_str("").unwrap();
        assert_eq!(config, AiConfig::default());
        assert_eq!(config.ai_delay(), Duration::from_millis(500));
        assert_eq!(*config.ai_mark(), Mark::O);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
backend = "remote"
llm_provider = "anthropic"
llm_model = "claude-3-5-haiku-20241022"
request_timeout_ms = 2500
"#
        )
        .unwrap();

        let config = AiConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.llm_provider(), LlmProvider::Anthropic);
        assert_eq!(config.llm_model(), "claude-3-5-haiku-20241022");
        assert_eq!(config.request_timeout(), Duration::from_millis(2500));
        assert_eq!(*config.llm_max_tokens(), 256);
    }

    #[test]
    fn test_from_missing_file_fails() {
        assert!(AiConfig::from_file("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn test_missing_key_is_error() {
        let config = AiConfig::default();
        assert!(config.create_llm_config_with(|_| None).is_err());
    }

    #[test]
    fn test_placeholder_key_is_missing() {
        let config = AiConfig::default();
        let result = config.create_llm_config_with(|_| Some("YOUR_API_KEY_HERE".to_string()));
        assert!(result.is_err());
        assert!(config.create_llm_config_with(|_| Some("  ".to_string())).is_err());
    }

    #[test]
    fn test_key_lookup_uses_provider_variable() {
        let config = AiConfig::default();
        let llm = config
            .create_llm_config_with(|var| (var == "GEMINI_API_KEY").then(|| "secret".to_string()))
            .unwrap();
        assert_eq!(llm.api_key(), "secret");
        assert_eq!(llm.model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_local_backend_needs_no_key() {
        let config = AiConfig::default().with_backend(AiBackend::Local);
        let provider = config.build_provider().unwrap();
        assert!(matches!(provider.backend(), crate::ai::Backend::Local));
    }
}
