//! Knowledge Lookup
//!
//! Best-effort encyclopedia summaries keyed by a single term. A lookup never
//! fails: every error collapses to [`LookupResult::NotFound`] and the
//! pipeline carries on without web context for that question.

mod wikipedia;

pub use wikipedia::WikipediaLookup;

use async_trait::async_trait;
use std::sync::Arc;

use crate::constants::lookup::NOT_FOUND_SENTINEL;

/// Outcome of one summary lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    /// Summary text for the term
    Found(String),
    /// No usable summary (missing page, bad response, network failure)
    NotFound,
}

impl LookupResult {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found(_))
    }

    /// Summary text, or the "No summary found." sentinel
    pub fn as_text(&self) -> &str {
        match self {
            LookupResult::Found(text) => text,
            LookupResult::NotFound => NOT_FOUND_SENTINEL,
        }
    }
}

impl std::fmt::Display for LookupResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_text())
    }
}

/// Summary lookup service
#[async_trait]
pub trait SummaryLookup: Send + Sync {
    /// Look up `term`; must not fail
    async fn lookup_summary(&self, term: &str) -> LookupResult;

    /// Service name for logging
    fn name(&self) -> &str;
}

/// Shared lookup handle, constructed once per process.
pub type SharedLookup = Arc<dyn SummaryLookup + Send + Sync>;

/// Last whitespace-delimited token of a question, punctuation included.
///
/// "What is the importance of photosynthesis?" → "photosynthesis?"
pub fn subject_term(question: &str) -> Option<&str> {
    question.split_whitespace().next_back()
}
