//! Document Export
//!
//! Writes the generated Markdown to disk, either verbatim or rendered to PDF.

mod pdf;

pub use pdf::markdown_to_pdf;

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::info;

use crate::config::OutputFormat;
use crate::types::Result;

/// `{topic}_guide.{ext}` with the topic reduced to a safe file stem
pub fn document_file_name(topic: &str, format: OutputFormat) -> String {
    static UNSAFE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("valid regex"));

    let stem = UNSAFE_RE.replace_all(topic.trim(), "_");
    let stem = stem.trim_matches('_');
    let stem = if stem.is_empty() { "document" } else { stem };

    format!("{}_guide.{}", stem, format.extension())
}

/// Write `markdown` for `topic` into `dir` in the given format.
/// Returns the written path.
pub fn write_document(
    markdown: &str,
    topic: &str,
    format: OutputFormat,
    dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(document_file_name(topic, format));

    match format {
        OutputFormat::Markdown => std::fs::write(&path, markdown)?,
        OutputFormat::Pdf => {
            let title = format!("A comprehensive Guide to {}", topic.trim());
            let bytes = markdown_to_pdf(markdown, &title)?;
            std::fs::write(&path, bytes)?;
        }
    }

    info!("Wrote {} document to {}", format, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_document_file_name() {
        assert_eq!(
            document_file_name("Photosynthesis", OutputFormat::Markdown),
            "Photosynthesis_guide.md"
        );
        assert_eq!(
            document_file_name("  Quantum / Mechanics?  ", OutputFormat::Pdf),
            "Quantum_Mechanics_guide.pdf"
        );
        assert_eq!(
            document_file_name("???", OutputFormat::Markdown),
            "document_guide.md"
        );
    }

    #[test]
    fn test_write_markdown() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested");
        let markdown = "# A comprehensive Guide to Tides\n\n## Q\nA\n\n";

        let path = write_document(markdown, "Tides", OutputFormat::Markdown, &out).unwrap();

        assert_eq!(path, out.join("Tides_guide.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), markdown);
    }

    #[test]
    fn test_write_pdf() {
        let dir = TempDir::new().unwrap();
        let markdown = "# A comprehensive Guide to Tides\n\n## Why are there tides?\nThe moon.\n\n";

        let path = write_document(markdown, "Tides", OutputFormat::Pdf, dir.path()).unwrap();

        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
