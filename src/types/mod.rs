//! Core Types
//!
//! The per-request generation record and the application error types.

pub mod error;
pub mod record;

pub use error::{DocError, ErrorCategory, ErrorClassifier, LlmError, Result};
pub use record::{GenerationRecord, KnowledgeLevel};
