//! Prompt Templates
//!
//! The two prompts the pipeline sends: one question-list prompt per document,
//! one answer prompt per question.

use crate::constants::pipeline::{ANSWER_MAX_WORDS, ANSWER_MIN_WORDS};
use crate::types::KnowledgeLevel;

/// Preset prompt templates
pub struct PromptTemplates;

impl PromptTemplates {
    /// Ask for `count` questions about `topic`, basic to complex, questions only
    pub fn questions(topic: &str, level: KnowledgeLevel, count: usize) -> String {
        format!(
            "Generate {count} questions about {topic} with {level} difficulty level that require in-depth answers. \
             The questions should be in increasing order of context (from basic to complex according to the given difficulty level). \
             Output should strictly start with questions only and should only contain questions, one per line."
        )
    }

    /// Ask for a detailed bullet-point answer to one question
    pub fn answer(question: &str) -> String {
        format!(
            "Provide a detailed answer ({ANSWER_MIN_WORDS}-{ANSWER_MAX_WORDS} words) to this question: {question}. \
             Include examples and explanations. Answers should be bullet points separated by newlines."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_prompt() {
        let prompt = PromptTemplates::questions("Photosynthesis", KnowledgeLevel::Expert, 10);

        assert!(prompt.starts_with("Generate 10 questions about Photosynthesis"));
        assert!(prompt.contains("Expert difficulty level"));
        assert!(prompt.contains("only contain questions"));
    }

    #[test]
    fn test_answer_prompt() {
        let prompt = PromptTemplates::answer("What is chlorophyll?");

        assert!(prompt.contains("(400-500 words)"));
        assert!(prompt.contains("this question: What is chlorophyll?."));
        assert!(prompt.contains("bullet points"));
    }
}
