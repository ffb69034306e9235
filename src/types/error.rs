//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Kinds
//!
//! - **Generation**: a language-model call failed; fatal to the request
//! - **Config**: invalid or missing configuration, raised at startup
//! - **Alignment**: per-question sequences disagree in length
//! - **Export**: the document could not be rendered to the requested format
//!
//! Summary lookups never produce an error; they degrade to
//! [`LookupResult::NotFound`](crate::lookup::LookupResult).

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Categories of text-completion failures, derived from the backend response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited or quota exhausted
    RateLimit,
    /// Credential rejected
    Auth,
    /// Request rejected as malformed
    BadRequest,
    /// Model or endpoint does not exist
    Unavailable,
    /// Server-side failure (5xx)
    Transient,
    /// Connection, DNS or timeout failure
    Network,
    /// Response body did not have the expected shape
    ParseError,
    /// Anything else
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Network => write!(f, "NETWORK"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Text-completion error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    pub category: ErrorCategory,
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps transport failures and HTTP statuses onto [`ErrorCategory`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an HTTP status code returned by a provider
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 422 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500..=599 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider)
    }

    /// Classify a reqwest transport error
    pub fn classify_transport(err: &reqwest::Error, provider: &str) -> LlmError {
        let category = if err.is_timeout() || err.is_connect() {
            ErrorCategory::Network
        } else if err.is_decode() {
            ErrorCategory::ParseError
        } else {
            ErrorCategory::Unknown
        };
        LlmError::with_provider(category, format!("request failed: {}", err), provider)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum DocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// A pipeline stage failed; no partial document is produced
    #[error("Document generation failed during {stage}: {source}")]
    Generation {
        stage: &'static str,
        #[source]
        source: Box<DocError>,
    },

    #[error("Misaligned pipeline output in {stage}: {detail}")]
    Alignment { stage: &'static str, detail: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl From<LlmError> for DocError {
    fn from(err: LlmError) -> Self {
        DocError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, DocError>;

impl DocError {
    /// Wrap an error as a failure of the named pipeline stage
    pub fn generation(stage: &'static str, source: DocError) -> Self {
        Self::Generation {
            stage,
            source: Box::new(source),
        }
    }

    /// Create an LLM error from message
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(LlmError::new(ErrorCategory::Unknown, message))
    }

    /// Stage name when this is a generation failure
    pub fn failed_stage(&self) -> Option<&'static str> {
        match self {
            Self::Generation { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
        assert_eq!(ErrorCategory::ParseError.to_string(), "PARSE_ERROR");
    }

    #[test]
    fn test_classify_http_status() {
        let rate_limit = ErrorClassifier::classify_http_status(429, "quota", "gemini");
        assert_eq!(rate_limit.category, ErrorCategory::RateLimit);

        let auth = ErrorClassifier::classify_http_status(403, "denied", "gemini");
        assert_eq!(auth.category, ErrorCategory::Auth);

        let server = ErrorClassifier::classify_http_status(503, "overloaded", "openai");
        assert_eq!(server.category, ErrorCategory::Transient);

        let missing = ErrorClassifier::classify_http_status(404, "no model", "ollama");
        assert_eq!(missing.category, ErrorCategory::Unavailable);
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::with_provider(ErrorCategory::RateLimit, "Too many requests", "gemini");
        assert_eq!(err.to_string(), "[gemini:RATE_LIMIT] Too many requests");

        let err = LlmError::new(ErrorCategory::Network, "Connection failed");
        assert_eq!(err.to_string(), "[NETWORK] Connection failed");
    }

    #[test]
    fn test_generation_error_keeps_cause() {
        let err = DocError::generation("answers", DocError::llm("backend down"));
        assert_eq!(err.failed_stage(), Some("answers"));

        let message = err.to_string();
        assert!(message.starts_with("Document generation failed during answers"));
        assert!(message.contains("backend down"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
