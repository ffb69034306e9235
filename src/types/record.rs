//! Generation Record
//!
//! The mutable record threaded through the five pipeline stages. One record
//! is created per request and dropped once the document is handed out.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lookup::LookupResult;

/// Target audience level, controls the difficulty wording of the question prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeLevel {
    /// Fundamental concepts
    #[default]
    Basic,
    /// In-depth knowledge
    Intermediate,
    /// Advanced topics
    Expert,
}

impl std::fmt::Display for KnowledgeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnowledgeLevel::Basic => write!(f, "Basic"),
            KnowledgeLevel::Intermediate => write!(f, "Intermediate"),
            KnowledgeLevel::Expert => write!(f, "Expert"),
        }
    }
}

impl std::str::FromStr for KnowledgeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(KnowledgeLevel::Basic),
            "intermediate" => Ok(KnowledgeLevel::Intermediate),
            "expert" => Ok(KnowledgeLevel::Expert),
            _ => Err(format!(
                "Unknown knowledge level: {}. Valid values: basic, intermediate, expert",
                s
            )),
        }
    }
}

/// Per-request state shared by all pipeline stages
#[derive(Debug, Clone)]
pub struct GenerationRecord {
    /// Correlates log lines of one request
    pub id: Uuid,
    pub topic: String,
    pub knowledge_level: KnowledgeLevel,
    /// Stage 1 output, in generation order
    pub questions: Vec<String>,
    /// Stage 2 output, index-aligned with `questions`
    pub llm_answers: Vec<String>,
    /// Stage 3 output, index-aligned with `questions`
    pub web_answers: Vec<LookupResult>,
    /// Stage 4 output, index-aligned with `questions`
    pub final_answers: Vec<String>,
    /// Stage 5 output
    pub document: Option<String>,
}

impl GenerationRecord {
    pub fn new(topic: impl Into<String>, knowledge_level: KnowledgeLevel) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: topic.into(),
            knowledge_level,
            questions: Vec::new(),
            llm_answers: Vec::new(),
            web_answers: Vec::new(),
            final_answers: Vec::new(),
            document: None,
        }
    }

    /// Take the finished document, consuming the record
    pub fn into_document(self) -> Option<String> {
        self.document
    }
}
