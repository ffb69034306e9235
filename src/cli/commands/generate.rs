//! Generate Command
//!
//! Run the document pipeline for a topic and save the result.
//!
//! Usage:
//!   doclearn generate <TOPIC> [-l basic|intermediate|expert] [-f markdown|pdf] [-o DIR]

use std::path::{Path, PathBuf};

use tokio::runtime::Runtime;
use tracing::info;

use crate::cli::progress::ConsoleRenderer;
use crate::cli::ui::Output;
use crate::config::{Config, ConfigLoader, OutputFormat};
use crate::export;
use crate::pipeline::{Pipeline, ProgressTracker};
use crate::types::{DocError, KnowledgeLevel, Result};

/// Generate run options (consolidated parameters)
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub topic: String,
    /// Falls back to `pipeline.default_level`
    pub level: Option<KnowledgeLevel>,
    /// Falls back to `output.format`
    pub format: Option<OutputFormat>,
    /// Falls back to `output.dir`
    pub output: Option<PathBuf>,
    /// LLM provider override
    pub provider: Option<String>,
    /// Model override
    pub model: Option<String>,
    /// Also print the Markdown to stdout
    pub print: bool,
    /// Suppress progress output
    pub quiet: bool,
}

pub fn run(options: GenerateOptions) -> Result<()> {
    let topic = options.topic.trim().to_string();
    if topic.is_empty() {
        return Err(DocError::InvalidInput(
            "Please enter a topic to proceed.".to_string(),
        ));
    }

    let mut config = ConfigLoader::load()?;
    apply_overrides(&mut config, &options);
    config.validate()?;

    let format = options.format.unwrap_or(config.output.format);
    let dir = options
        .output
        .clone()
        .unwrap_or_else(|| config.output.dir.clone());
    let level = options.level.unwrap_or(config.pipeline.default_level);

    let pipeline = Pipeline::from_config(&config)?;
    info!(
        "Using LLM provider: {} ({})",
        pipeline.provider().name(),
        pipeline.provider().model()
    );

    let out = Output::new();
    if !options.quiet {
        out.header(&format!("A comprehensive Guide to {} ({})", topic, level));
    }

    let rt = Runtime::new()?;
    let document = rt.block_on(async {
        let tracker = ProgressTracker::new();
        let render = (!options.quiet)
            .then(|| ConsoleRenderer::new(tracker.clone()).start_render_loop());

        let pipeline = pipeline.with_progress(tracker);
        let result = pipeline.generate_document(&topic, Some(level)).await;

        // Closes the channel so the renderer drains and exits
        drop(pipeline);
        if let Some(handle) = render {
            let _ = handle.await;
        }
        result
    })?;

    if options.print {
        println!("{}", document);
    }

    save(&out, &document, &topic, format, &dir)
}

/// Write the document; a failed PDF conversion falls back to Markdown
fn save(
    out: &Output,
    document: &str,
    topic: &str,
    format: OutputFormat,
    dir: &Path,
) -> Result<()> {
    match export::write_document(document, topic, format, dir) {
        Ok(path) => {
            out.success(&format!("Saved {} document", format));
            out.detail("Path", path.display());
            Ok(())
        }
        Err(e) if format == OutputFormat::Pdf => {
            out.error(&format!("PDF conversion failed: {}", e));
            let path = export::write_document(document, topic, OutputFormat::Markdown, dir)?;
            out.warning(&format!("Saved Markdown instead: {}", path.display()));
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// CLI flags take precedence over every config layer
fn apply_overrides(config: &mut Config, options: &GenerateOptions) {
    if let Some(provider) = &options.provider {
        if *provider != config.llm.provider && options.model.is_none() {
            // Configured model belongs to the other backend
            config.llm.model = None;
        }
        config.llm.provider = provider.clone();
    }
    if let Some(model) = &options.model {
        config.llm.model = Some(model.clone());
    }
}
