//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/doclearn/) and project (.doclearn/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{lookup, network, pipeline};
use crate::types::{DocError, KnowledgeLevel, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Text-completion backend settings
    pub llm: LlmConfig,

    /// Encyclopedia summary lookup settings
    pub lookup: LookupConfig,

    /// Pipeline behaviour
    pub pipeline: PipelineConfig,

    /// Document output settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            lookup: LookupConfig::default(),
            pipeline: PipelineConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DocError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(DocError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(DocError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.lookup.timeout_secs == 0 {
            return Err(DocError::Config(
                "Lookup timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.question_count == 0 {
            return Err(DocError::Config(
                "Pipeline question_count must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: gemini, openai, ollama
    pub provider: String,

    /// Model name; unset uses the provider's own default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature (0.0 = deterministic)
    pub temperature: f32,

    /// API base URL override
    pub api_base: Option<String>,

    /// API key; prefer the provider's environment variable.
    /// Never serialized to output.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: 0.7,
            api_base: None,
            api_key: None,
        }
    }
}

// =============================================================================
// Lookup Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL of the summary REST API
    pub api_base: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_base: lookup::DEFAULT_API_BASE.to_string(),
            timeout_secs: lookup::DEFAULT_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Pipeline Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of questions requested in the question prompt
    pub question_count: usize,

    /// Fail when the model returns a different number of questions
    pub strict_question_count: bool,

    /// Level used when the caller gives none
    pub default_level: KnowledgeLevel,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            question_count: pipeline::DEFAULT_QUESTION_COUNT,
            strict_question_count: false,
            default_level: KnowledgeLevel::Basic,
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

/// Download format for the generated document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Easy to read
    #[default]
    Markdown,
    /// Easy to share
    Pdf,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Pdf => write!(f, "pdf"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(format!(
                "Unknown output format: {}. Valid values: markdown, pdf",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Directory the document is written to
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Markdown,
            dir: PathBuf::from("."),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
