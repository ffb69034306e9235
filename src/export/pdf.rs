//! Markdown → PDF
//!
//! Handles the subset the pipeline emits: `#`/`##` headings, paragraphs,
//! bullet lines and blank-line spacing. Inline emphasis markers are dropped
//! and `**Bold line**` paragraphs are set in the bold face. `<sub>` content is
//! set inline (CO<sub>2</sub> → CO2) and `<sup>` content gets a caret (x^2).
//!
//! The builtin Helvetica faces only cover WinAnsi (Latin-1 plus a few
//! symbols). Unicode sub/superscript digits and arrows are mapped to ASCII;
//! anything else outside WinAnsi (Greek, CJK, most math) is dropped by the
//! PDF writer.

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use regex::Regex;
use std::sync::LazyLock;

use crate::constants::pdf::{
    BODY_FONT_SIZE, BODY_LEADING_MM, HEADING1_FONT_SIZE, HEADING2_FONT_SIZE, MARGIN_MM,
    PAGE_HEIGHT_MM, PAGE_WIDTH_MM, SPACER_MM,
};
use crate::types::{DocError, Result};

const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_WIDTH: f32 = 0.5;
const LAYER: &str = "Layer 1";

/// Render `markdown` as an A4 PDF and return the file bytes
pub fn markdown_to_pdf(markdown: &str, title: &str) -> Result<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER);
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| DocError::Export(format!("Failed to load font: {:?}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| DocError::Export(format!("Failed to load font: {:?}", e)))?;

    let layer = doc.get_page(page).get_layer(layer);
    let mut writer = PageWriter {
        doc: &doc,
        layer,
        cursor: PAGE_HEIGHT_MM - MARGIN_MM,
    };

    for block in parse_blocks(markdown) {
        match block {
            Block::Heading1(text) => writer.paragraph(&text, HEADING1_FONT_SIZE, &bold),
            Block::Heading2(text) => writer.paragraph(&text, HEADING2_FONT_SIZE, &bold),
            Block::Strong(text) => writer.paragraph(&text, BODY_FONT_SIZE, &bold),
            Block::Text(text) => writer.paragraph(&text, BODY_FONT_SIZE, &regular),
            Block::Blank => writer.space(SPACER_MM),
        }
    }

    doc.save_to_bytes()
        .map_err(|e| DocError::Export(format!("Failed to write PDF: {:?}", e)))
}

#[derive(Debug, Clone, PartialEq)]
enum Block {
    Heading1(String),
    Heading2(String),
    /// Line wrapped entirely in `**`
    Strong(String),
    Text(String),
    Blank,
}

fn parse_blocks(markdown: &str) -> Vec<Block> {
    markdown
        .lines()
        .map(|line| {
            let line = line.trim_end();
            if line.trim().is_empty() {
                Block::Blank
            } else if let Some(text) = line.strip_prefix("# ") {
                Block::Heading1(strip_inline(text))
            } else if let Some(text) = line.strip_prefix("## ") {
                Block::Heading2(strip_inline(text))
            } else if line.len() > 4 && line.starts_with("**") && line.ends_with("**") {
                Block::Strong(strip_inline(line))
            } else {
                Block::Text(strip_inline(line))
            }
        })
        .collect()
}

/// Drop emphasis and inline-code markers, turn `* ` bullets into `- `,
/// flatten `<sub>`/`<sup>` tags
fn strip_inline(text: &str) -> String {
    static EMPHASIS_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\*\*|__|`").expect("valid regex"));
    static BULLET_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^(\s*)[*+] ").expect("valid regex"));
    static SUB_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)<sub>(.*?)</sub>").expect("valid regex"));
    static SUP_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)<sup>(.*?)</sup>").expect("valid regex"));

    let text = BULLET_RE.replace(text, "$1- ");
    let text = SUB_RE.replace_all(&text, "$1");
    let text = SUP_RE.replace_all(&text, "^$1");
    let text = EMPHASIS_RE.replace_all(&text, "");
    to_win_ansi(text.trim_end())
}

/// Map common characters the builtin fonts cannot encode to ASCII
fn to_win_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '₀'..='₉' => out.push(char::from(b'0' + (c as u32 - '₀' as u32) as u8)),
            '⁰' => out.push_str("^0"),
            '¹' => out.push_str("^1"),
            '²' => out.push_str("^2"),
            '³' => out.push_str("^3"),
            '⁴'..='⁹' => {
                out.push('^');
                out.push(char::from(b'4' + (c as u32 - '⁴' as u32) as u8));
            }
            '→' => out.push_str("->"),
            '←' => out.push_str("<-"),
            '↔' | '⇌' => out.push_str("<->"),
            '≤' => out.push_str("<="),
            '≥' => out.push_str(">="),
            _ => out.push(c),
        }
    }
    out
}

/// Greedy word wrap to at most `max_chars` per line; longer words are split
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let indent: String = text.chars().take_while(|c| c.is_whitespace()).collect();
    let mut lines = Vec::new();
    let mut current = indent.clone();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.trim().is_empty() {
                lines.push(std::mem::replace(&mut current, indent.clone()));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();

        let needed = if current.trim().is_empty() {
            current.chars().count() + word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > max_chars && !current.trim().is_empty() {
            lines.push(std::mem::replace(&mut current, indent.clone()));
        }
        if !current.trim().is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.trim().is_empty() {
        lines.push(current);
    }
    lines
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    /// Baseline of the next line, measured from the page bottom
    cursor: f32,
}

impl PageWriter<'_> {
    fn paragraph(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
        let max_chars = (usable / (size * PT_TO_MM * AVG_GLYPH_WIDTH)) as usize;
        let leading = if size > BODY_FONT_SIZE {
            size * PT_TO_MM * 1.4
        } else {
            BODY_LEADING_MM
        };

        for line in wrap(text, max_chars) {
            self.ensure_room(leading);
            self.cursor -= leading;
            self.layer
                .use_text(line, size, Mm(MARGIN_MM), Mm(self.cursor), font);
        }
    }

    fn space(&mut self, height: f32) {
        if self.cursor - height > MARGIN_MM {
            self.cursor -= height;
        }
    }

    fn ensure_room(&mut self, height: f32) {
        if self.cursor - height < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER);
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.cursor = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blocks() {
        let blocks = parse_blocks(
            "# Guide\n\nIntro\n## What is light?\n* **Photons** carry energy\n\n**Additional Context from Web:**\nSummary",
        );
        assert_eq!(
            blocks,
            vec![
                Block::Heading1("Guide".to_string()),
                Block::Blank,
                Block::Text("Intro".to_string()),
                Block::Heading2("What is light?".to_string()),
                Block::Text("- Photons carry energy".to_string()),
                Block::Blank,
                Block::Strong("Additional Context from Web:".to_string()),
                Block::Text("Summary".to_string()),
            ]
        );
    }

    #[test]
    fn test_sub_and_sup_tags_become_plain_text() {
        assert_eq!(
            strip_inline("Plants take in CO<sub>2</sub> and release O<sub>2</sub>"),
            "Plants take in CO2 and release O2"
        );
        assert_eq!(strip_inline("E = mc<sup>2</sup>"), "E = mc^2");
    }

    #[test]
    fn test_unicode_outside_win_ansi_is_mapped() {
        assert_eq!(
            strip_inline("6CO₂ + 6H₂O → C₆H₁₂O₆ + 6O₂"),
            "6CO2 + 6H2O -> C6H12O6 + 6O2"
        );
        assert_eq!(strip_inline("x² ≥ 0"), "x^2 >= 0");
        assert_eq!(strip_inline("café"), "café");
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let lines = wrap(text, 12);
        assert!(lines.iter().all(|l| l.chars().count() <= 12));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_pdf_bytes() {
        let body = "Plants turn light into chemical energy. ".repeat(400);
        let markdown = format!("# A comprehensive Guide to Plants\n\n## Why?\n{body}\n\n");

        let bytes = markdown_to_pdf(&markdown, "A comprehensive Guide to Plants").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
