//! DocLearn - Topic Study Guide Generator
//!
//! Asks a language model for questions about a topic, answers each one,
//! attaches encyclopedia summaries where available and assembles the result
//! into a Markdown document (optionally exported as PDF).
//!
//! ## Quick Start
//!
//! ```ignore
//! use doclearn::{ConfigLoader, KnowledgeLevel, Pipeline};
//!
//! let config = ConfigLoader::load()?;
//! let pipeline = Pipeline::from_config(&config)?;
//! let markdown = pipeline
//!     .generate_document("Photosynthesis", Some(KnowledgeLevel::Basic))
//!     .await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: LLM provider abstraction and prompt templates
//! - [`lookup`]: Wikipedia summary lookup
//! - [`pipeline`]: The five-stage document pipeline and progress events
//! - [`export`]: Markdown and PDF output
//! - [`config`]: Layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod export;
pub mod lookup;
pub mod pipeline;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, OutputFormat};

// Error Types
pub use types::{DocError, ErrorCategory, Result};

// Domain
pub use types::{GenerationRecord, KnowledgeLevel};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{Pipeline, ProgressEvent, ProgressTracker};

// =============================================================================
// Leaf Re-exports
// =============================================================================

pub use ai::{LlmProvider, LlmResponse, SharedProvider, create_provider};
pub use lookup::{LookupResult, SharedLookup, SummaryLookup, WikipediaLookup};
