//! Document Generation Pipeline
//!
//! ```text
//! Questions → Answers → Web Enrichment → Refinement → Assembly
//! ```
//!
//! Five stages run strictly in sequence over one [`GenerationRecord`]. The
//! first stage error aborts the request: no partial document is returned.
//! Lookup failures are not errors and only remove web context.

pub mod progress;
pub mod stages;

pub use progress::{ProgressEvent, ProgressState, ProgressTracker};
pub use stages::{parse_questions, refine_answer, render_document};

use tracing::{Instrument, info, info_span, warn};

use crate::ai::{ProviderConfig, SharedProvider, create_provider};
use crate::config::{Config, PipelineConfig};
use crate::constants::pipeline::stage;
use crate::lookup::{SharedLookup, WikipediaLookup};
use crate::types::{DocError, GenerationRecord, KnowledgeLevel, Result};

use std::sync::Arc;

/// Pipeline driver holding the injected model and lookup clients
#[derive(Clone)]
pub struct Pipeline {
    provider: SharedProvider,
    lookup: SharedLookup,
    config: PipelineConfig,
    progress: Option<ProgressTracker>,
}

impl Pipeline {
    pub fn new(provider: SharedProvider, lookup: SharedLookup, config: PipelineConfig) -> Self {
        Self {
            provider,
            lookup,
            config,
            progress: None,
        }
    }

    /// Build the configured provider and Wikipedia lookup.
    /// Missing credentials surface here as `DocError::Config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = create_provider(&ProviderConfig::from(&config.llm))?;
        let lookup: SharedLookup = Arc::new(WikipediaLookup::new(&config.lookup)?);
        Ok(Self::new(provider, lookup, config.pipeline.clone()))
    }

    pub fn with_progress(mut self, tracker: ProgressTracker) -> Self {
        self.progress = Some(tracker);
        self
    }

    pub fn provider(&self) -> &SharedProvider {
        &self.provider
    }

    /// Generate the Markdown guide for `topic`.
    /// `level` falls back to `pipeline.default_level`.
    pub async fn generate_document(
        &self,
        topic: &str,
        level: Option<KnowledgeLevel>,
    ) -> Result<String> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(DocError::InvalidInput("topic must not be empty".to_string()));
        }

        let record =
            GenerationRecord::new(topic, level.unwrap_or(self.config.default_level));
        let record = self.run(record).await?;

        record.into_document().ok_or_else(|| DocError::Alignment {
            stage: stage::ASSEMBLY,
            detail: "no document produced".to_string(),
        })
    }

    /// Run all five stages and return the completed record
    pub async fn run(&self, record: GenerationRecord) -> Result<GenerationRecord> {
        let span = info_span!("generate", id = %record.id, topic = %record.topic);

        async move {
            if let Some(tracker) = &self.progress {
                tracker.start();
            }

            let result = self.run_stages(record).await;

            match &result {
                Ok(record) => {
                    info!(questions = record.questions.len(), "Document generated");
                    self.finish(true, &format!("{} sections", record.questions.len()));
                }
                Err(e) => {
                    warn!(error = %e, "Document generation failed");
                    self.finish(false, &e.to_string());
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn run_stages(&self, mut record: GenerationRecord) -> Result<GenerationRecord> {
        info!(
            "Stage 1: Generating questions ({}, {})",
            record.knowledge_level,
            self.provider.name()
        );
        self.begin(1, stage::QUESTIONS, 1);
        stages::generate_questions(&mut record, self.provider.as_ref(), &self.config)
            .await
            .map_err(|e| DocError::generation(stage::QUESTIONS, e))?;
        self.end(stage::QUESTIONS);

        let total = record.questions.len();

        info!("Stage 2: Generating {} answers", total);
        self.begin(2, stage::ANSWERS, total);
        stages::generate_answers(&mut record, self.provider.as_ref(), self.progress.as_ref())
            .await
            .map_err(|e| DocError::generation(stage::ANSWERS, e))?;
        self.end(stage::ANSWERS);

        info!("Stage 3: Web enrichment via {}", self.lookup.name());
        self.begin(3, stage::ENRICHMENT, total);
        stages::enrich_answers(&mut record, self.lookup.as_ref(), self.progress.as_ref()).await;
        self.end(stage::ENRICHMENT);

        info!("Stage 4: Refining answers");
        self.begin(4, stage::REFINEMENT, total);
        stages::refine_answers(&mut record)
            .map_err(|e| DocError::generation(stage::REFINEMENT, e))?;
        self.end(stage::REFINEMENT);

        info!("Stage 5: Assembling document");
        self.begin(5, stage::ASSEMBLY, 1);
        stages::assemble_document(&mut record)
            .map_err(|e| DocError::generation(stage::ASSEMBLY, e))?;
        self.end(stage::ASSEMBLY);

        Ok(record)
    }

    fn begin(&self, index: u8, name: &'static str, total: usize) {
        if let Some(tracker) = &self.progress {
            tracker.start_stage(index, name, total);
        }
    }

    fn end(&self, name: &'static str) {
        if let Some(tracker) = &self.progress {
            tracker.complete_stage(name);
        }
    }

    fn finish(&self, success: bool, summary: &str) {
        if let Some(tracker) = &self.progress {
            tracker.finish(success, summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::stages::tests::{FailingProvider, StubLookup, StubProvider};
    use super::*;
    use crate::constants::pipeline::WEB_CONTEXT_MARKER;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const QUESTIONS: &str = "What is photosynthesis?\nWhere does it happen?\nWhy do plants need chlorophyll?";

    fn fifty_words() -> String {
        (1..=50)
            .map(|i| format!("word{i}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn pipeline(provider: StubProvider, lookup: StubLookup) -> (Pipeline, Arc<StubProvider>) {
        let provider = Arc::new(provider);
        let pipeline = Pipeline::new(
            provider.clone(),
            Arc::new(lookup),
            PipelineConfig::default(),
        );
        (pipeline, provider)
    }

    #[tokio::test]
    async fn test_photosynthesis_basic_end_to_end() {
        let answer = fifty_words();
        let (pipeline, provider) =
            pipeline(StubProvider::new(QUESTIONS, &answer), StubLookup::default());

        let doc = pipeline
            .generate_document("Photosynthesis", Some(KnowledgeLevel::Basic))
            .await
            .unwrap();

        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(lines.iter().filter(|l| l.starts_with("# ")).count(), 1);
        assert_eq!(lines.iter().filter(|l| l.starts_with("## ")).count(), 3);
        assert!(!doc.contains(WEB_CONTEXT_MARKER));

        for (i, line) in lines.iter().enumerate() {
            if line.starts_with("## ") {
                assert_eq!(lines[i + 1], answer);
            }
        }
        assert!(doc.starts_with("# A comprehensive Guide to Photosynthesis\n\n"));
        assert!(doc.contains("Difficulty level: Basic"));
        // 1 question call + 3 answer calls
        assert_eq!(provider.calls(), 4);
    }

    #[tokio::test]
    async fn test_found_summary_appears_after_answer() {
        let lookup = StubLookup {
            summaries: HashMap::from([(
                "chlorophyll?".to_string(),
                "Chlorophyll is a green pigment.".to_string(),
            )]),
            ..Default::default()
        };
        let (pipeline, _) = pipeline(StubProvider::new(QUESTIONS, "An answer."), lookup);

        let record = pipeline
            .run(GenerationRecord::new("Photosynthesis", KnowledgeLevel::Expert))
            .await
            .unwrap();

        assert_eq!(record.questions.len(), 3);
        assert_eq!(record.llm_answers.len(), 3);
        assert_eq!(record.web_answers.len(), 3);
        assert_eq!(record.final_answers[0], "An answer.");
        assert_eq!(
            record.final_answers[2],
            "An answer.\n\n**Additional Context from Web:**\nChlorophyll is a green pigment."
        );
        assert!(record.document.unwrap().contains("Difficulty level: Expert"));
    }

    #[tokio::test]
    async fn test_default_level_applies() {
        let (pipeline, _) = pipeline(StubProvider::new("Q1", "A1"), StubLookup::default());

        let doc = pipeline.generate_document("Tides", None).await.unwrap();
        assert!(doc.contains("Difficulty level: Basic"));
    }

    #[tokio::test]
    async fn test_empty_topic_is_rejected() {
        let (pipeline, provider) = pipeline(StubProvider::new("Q1", "A1"), StubLookup::default());

        let result = pipeline.generate_document("   ", None).await;
        assert!(matches!(result, Err(DocError::InvalidInput(_))));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_generator_failure_aborts() {
        let provider = FailingProvider {
            questions: QUESTIONS.to_string(),
            fail_at: 2,
            calls: Mutex::new(0),
        };
        let lookup = Arc::new(StubLookup::default());
        let pipeline = Pipeline::new(Arc::new(provider), lookup.clone(), PipelineConfig::default());

        let err = pipeline
            .generate_document("Photosynthesis", None)
            .await
            .unwrap_err();

        assert_eq!(err.failed_stage(), Some(stage::ANSWERS));
        assert!(err.to_string().contains("Document generation failed"));
        // Enrichment never ran
        assert!(lookup.terms.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_answers_fail_answer_stage() {
        let (pipeline, _) = pipeline(StubProvider::new("Q1\nQ2", ""), StubLookup::default());

        let err = pipeline.generate_document("Tides", None).await.unwrap_err();

        assert_eq!(err.failed_stage(), Some(stage::ANSWERS));
        match err {
            DocError::Generation { source, .. } => assert!(matches!(
                *source,
                DocError::Llm(ref e) if e.category == crate::types::ErrorCategory::ParseError
            )),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_question_failure_reports_stage() {
        let provider = FailingProvider {
            questions: String::new(),
            fail_at: 0,
            calls: Mutex::new(0),
        };
        let pipeline = Pipeline::new(
            Arc::new(provider),
            Arc::new(StubLookup::default()),
            PipelineConfig::default(),
        );

        let err = pipeline.generate_document("Volcanoes", None).await.unwrap_err();
        assert_eq!(err.failed_stage(), Some(stage::QUESTIONS));
    }

    #[tokio::test]
    async fn test_progress_events_cover_every_stage() {
        let (pipeline, _) = pipeline(StubProvider::new(QUESTIONS, "A"), StubLookup::default());
        let tracker = ProgressTracker::new();
        let mut rx = tracker.subscribe();
        let pipeline = pipeline.with_progress(tracker);

        pipeline.generate_document("Photosynthesis", None).await.unwrap();

        let mut started = Vec::new();
        let mut items = 0;
        let mut finished = None;
        while let Ok(event) = rx.try_recv() {
            match event {
                ProgressEvent::StageStarted { index, .. } => started.push(index),
                ProgressEvent::ItemCompleted { .. } => items += 1,
                ProgressEvent::Finished { success, .. } => finished = Some(success),
                ProgressEvent::StageCompleted { .. } => {}
            }
        }

        assert_eq!(started, vec![1, 2, 3, 4, 5]);
        // 3 answers + 3 lookups
        assert_eq!(items, 6);
        assert_eq!(finished, Some(true));
    }
}
