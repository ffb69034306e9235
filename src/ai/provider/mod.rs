//! LLM Provider Abstraction
//!
//! Defines the `LlmProvider` trait: a plain text-completion call, prompt in,
//! text out. All providers return `LlmResponse` with token usage metrics.
//!
//! Providers never retry. A failed call surfaces as `DocError::Llm` and it is
//! up to the caller to abort.

mod gemini;
mod ollama;
mod openai;

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::types::{DocError, Result};

// =============================================================================
// LLM Response with Usage Metrics
// =============================================================================

/// Complete LLM response including text and usage metrics
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text, verbatim
    pub content: String,
    pub usage: TokenUsage,
    pub timing: ResponseTiming,
    pub metadata: ResponseMetadata,
}

impl LlmResponse {
    /// Create response with content only (usage unknown)
    pub fn content_only(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: TokenUsage::default(),
            timing: ResponseTiming::default(),
            metadata: ResponseMetadata::default(),
        }
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens (prompt)
    pub input_tokens: u32,
    /// Output tokens (response)
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens used (input + output)
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Accumulate another call's usage
    pub fn add(&mut self, other: &TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Total response time in milliseconds (wall clock)
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: std::time::Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

/// Response metadata
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    pub model: String,
    pub provider: String,
}

/// Shared provider handle, constructed once per process.
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for LLM providers
///
/// API keys are never serialized and are redacted in debug output.
/// Each provider converts the key to `SecretString` internally.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type: "gemini", "openai", "ollama"
    pub provider: String,
    /// Model name (provider-specific)
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub temperature: f32,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_base: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::from(&LlmConfig::default())
    }
}

impl From<&LlmConfig> for ProviderConfig {
    fn from(llm: &LlmConfig) -> Self {
        Self {
            provider: llm.provider.clone(),
            model: llm.model.clone().filter(|m| !m.trim().is_empty()),
            timeout_secs: llm.timeout_secs,
            temperature: llm.temperature,
            api_key: llm.api_key.clone(),
            api_base: llm.api_base.clone(),
        }
    }
}

/// Read an API key from config, falling back to the given environment variable.
/// A missing key is a startup configuration error.
fn resolve_api_key(config_key: Option<String>, env_var: &str, provider: &str) -> Result<String> {
    config_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| std::env::var(env_var).ok().filter(|k| !k.trim().is_empty()))
        .ok_or_else(|| {
            DocError::Config(format!(
                "{} API key not found. Set {} env var or provide llm.api_key in config",
                provider, env_var
            ))
        })
}

/// Build a reqwest client with the configured request timeout
fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| DocError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a non-success HTTP response into a categorized provider error
async fn error_from_response(response: reqwest::Response, provider: &str) -> DocError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ErrorClassifier::classify_http_status(
        status.as_u16(),
        &format!("API error ({}): {}", status, body),
        provider,
    )
    .into()
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// Text-completion backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send `prompt` verbatim and return the model's text response
    async fn generate(&self, prompt: &str) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a shared provider from configuration
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiProvider::new(config.clone())?)),
        "openai" => Ok(Arc::new(OpenAiProvider::new(config.clone())?)),
        "ollama" => Ok(Arc::new(OllamaProvider::new(config.clone())?)),
        _ => Err(DocError::Config(format!(
            "Unknown provider: {}. Supported: gemini, openai, ollama",
            config.provider
        ))),
    }
}
