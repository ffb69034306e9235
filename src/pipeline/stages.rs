//! Pipeline Stages
//!
//! Each stage reads fields of the [`GenerationRecord`] filled by earlier
//! stages and writes its own. Stages 2 and 3 map one-to-one over
//! `questions`; stages 4 and 5 refuse to run on misaligned sequences.

use tracing::{debug, info};

use super::progress::ProgressTracker;
use crate::ai::{LlmProvider, PromptTemplates, TokenUsage};
use crate::config::PipelineConfig;
use crate::constants::pipeline::{WEB_CONTEXT_MARKER, stage};
use crate::lookup::{LookupResult, SummaryLookup, subject_term};
use crate::types::{DocError, ErrorCategory, GenerationRecord, KnowledgeLevel, LlmError, Result};

/// Split a raw model response into questions: one per line, trimmed, blanks dropped.
pub fn parse_questions(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Stage 1: one model call for the question list
pub async fn generate_questions(
    record: &mut GenerationRecord,
    provider: &dyn LlmProvider,
    config: &PipelineConfig,
) -> Result<()> {
    let prompt =
        PromptTemplates::questions(&record.topic, record.knowledge_level, config.question_count);
    let response = provider.generate(&prompt).await?;
    debug!(
        tokens = response.usage.total(),
        elapsed_ms = response.timing.total_ms,
        "question list received"
    );
    let questions = parse_questions(&response.content);

    if questions.is_empty() {
        return Err(DocError::Alignment {
            stage: stage::QUESTIONS,
            detail: "model response contained no questions".to_string(),
        });
    }

    if config.strict_question_count && questions.len() != config.question_count {
        return Err(DocError::Alignment {
            stage: stage::QUESTIONS,
            detail: format!(
                "expected {} questions, model returned {}",
                config.question_count,
                questions.len()
            ),
        });
    }

    debug!(count = questions.len(), "parsed questions");
    record.questions = questions;
    Ok(())
}

/// Stage 2: one model call per question, in question order.
/// A blank answer would leave an empty section, so it fails the stage.
pub async fn generate_answers(
    record: &mut GenerationRecord,
    provider: &dyn LlmProvider,
    progress: Option<&ProgressTracker>,
) -> Result<()> {
    let mut answers = Vec::with_capacity(record.questions.len());
    let mut usage = TokenUsage::default();
    let mut elapsed_ms = 0;

    for (i, question) in record.questions.iter().enumerate() {
        let response = provider
            .generate(&PromptTemplates::answer(question))
            .await?;
        usage.add(&response.usage);
        elapsed_ms += response.timing.total_ms;

        let answer = response.content;
        if answer.trim().is_empty() {
            return Err(LlmError::with_provider(
                ErrorCategory::ParseError,
                format!("Empty answer for question {}: {}", i + 1, question),
                provider.name(),
            )
            .into());
        }
        debug!(index = i, chars = answer.len(), "answer generated");
        answers.push(answer);

        if let Some(tracker) = progress {
            tracker.item_completed(stage::ANSWERS, i + 1, question);
        }
    }

    info!(
        input_tokens = usage.input_tokens,
        output_tokens = usage.output_tokens,
        elapsed_ms,
        "{} answers generated",
        answers.len()
    );
    record.llm_answers = answers;
    Ok(())
}

/// Stage 3: look up the last token of every question. Never fails.
pub async fn enrich_answers(
    record: &mut GenerationRecord,
    lookup: &dyn SummaryLookup,
    progress: Option<&ProgressTracker>,
) {
    let mut web_answers = Vec::with_capacity(record.questions.len());

    for (i, question) in record.questions.iter().enumerate() {
        let result = match subject_term(question) {
            Some(term) => lookup.lookup_summary(term).await,
            None => LookupResult::NotFound,
        };
        debug!(index = i, found = result.is_found(), "lookup finished");
        web_answers.push(result);

        if let Some(tracker) = progress {
            tracker.item_completed(stage::ENRICHMENT, i + 1, question);
        }
    }

    record.web_answers = web_answers;
}

/// Combine a model answer with its lookup result
pub fn refine_answer(llm_answer: &str, web: &LookupResult) -> String {
    match web {
        LookupResult::Found(summary) => {
            format!("{llm_answer}\n\n**{WEB_CONTEXT_MARKER}:**\n{summary}")
        }
        LookupResult::NotFound => llm_answer.to_string(),
    }
}

/// Stage 4: merge `llm_answers` and `web_answers` index by index
pub fn refine_answers(record: &mut GenerationRecord) -> Result<()> {
    ensure_aligned(
        stage::REFINEMENT,
        &[
            ("questions", record.questions.len()),
            ("llm_answers", record.llm_answers.len()),
            ("web_answers", record.web_answers.len()),
        ],
    )?;

    record.final_answers = record
        .llm_answers
        .iter()
        .zip(&record.web_answers)
        .map(|(llm, web)| refine_answer(llm, web))
        .collect();
    Ok(())
}

/// Render the Markdown document from aligned questions and answers
pub fn render_document(
    topic: &str,
    level: KnowledgeLevel,
    questions: &[String],
    answers: &[String],
) -> String {
    let mut doc = format!(
        "# A comprehensive Guide to {topic}\n\n\
         This document provides detailed insights into {topic}. Difficulty level: {level}\n\n"
    );

    for (question, answer) in questions.iter().zip(answers) {
        doc.push_str(&format!("## {question}\n{answer}\n\n"));
    }

    doc
}

/// Stage 5: assemble the final document
pub fn assemble_document(record: &mut GenerationRecord) -> Result<()> {
    ensure_aligned(
        stage::ASSEMBLY,
        &[
            ("questions", record.questions.len()),
            ("final_answers", record.final_answers.len()),
        ],
    )?;

    record.document = Some(render_document(
        &record.topic,
        record.knowledge_level,
        &record.questions,
        &record.final_answers,
    ));
    Ok(())
}

fn ensure_aligned(stage: &'static str, lengths: &[(&str, usize)]) -> Result<()> {
    let Some(&(_, expected)) = lengths.first() else {
        return Ok(());
    };

    if lengths.iter().all(|&(_, len)| len == expected) {
        return Ok(());
    }

    let detail = lengths
        .iter()
        .map(|(name, len)| format!("{name}={len}"))
        .collect::<Vec<_>>()
        .join(", ");
    Err(DocError::Alignment { stage, detail })
}
