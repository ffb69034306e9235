//! AI Integration Layer
//!
//! Text-completion providers and the prompt templates sent to them.

pub mod prompt;
pub mod provider;

pub use prompt::PromptTemplates;
pub use provider::{
    ErrorCategory, ErrorClassifier, GeminiProvider, LlmError, LlmProvider, LlmResponse,
    OllamaProvider, OpenAiProvider, ProviderConfig, ResponseMetadata, ResponseTiming,
    SharedProvider, TokenUsage, create_provider,
};
