//! Source-text acquisition for deck generation.
//!
//! Accepts an uploaded document as raw bytes and returns the plain
//! text that feeds the generation prompt. Plain text and Markdown are
//! read directly; an existing PPTX deck has its slide text drained so
//! it can be regenerated into a new deck.

mod deck;

use deck_core::{Error, Result};
use std::io::Cursor;
use unicode_normalization::UnicodeNormalization;

/// The kind of source document, detected from the filename extension
/// or from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// UTF-8 plain text (.txt).
    PlainText,
    /// Markdown, treated as plain text for prompt purposes (.md).
    Markdown,
    /// An existing PPTX deck (ZIP + OOXML).
    PptxDeck,
}

impl SourceFormat {
    /// Detect format from a filename extension.
    pub fn from_name(filename: &str) -> Option<Self> {
        let ext = filename.rsplit('.').next()?;
        match ext.to_lowercase().as_str() {
            "txt" | "text" => Some(Self::PlainText),
            "md" | "markdown" => Some(Self::Markdown),
            "pptx" => Some(Self::PptxDeck),
            _ => None,
        }
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::PptxDeck);
        }
        None
    }
}

/// Extract prompt-ready plain text from an uploaded document.
///
/// The filename drives format detection, with a ZIP magic check as a
/// fallback for misnamed deck files. Unsupported or unparsable input
/// is a recoverable error; no partial text is returned.
pub fn extract_text(data: &[u8], filename: &str) -> Result<String> {
    let format = SourceFormat::from_name(filename)
        .or_else(|| SourceFormat::from_magic(data))
        .ok_or_else(|| Error::UnsupportedSource(filename.to_string()))?;

    log::debug!("Extracting text from '{filename}' as {format:?}");

    let raw = match format {
        SourceFormat::PlainText | SourceFormat::Markdown => String::from_utf8(data.to_vec())
            .map_err(|_| {
                Error::SourceParseError(format!("'{filename}' is not valid UTF-8 text"))
            })?,
        SourceFormat::PptxDeck => deck::extract_deck_text(Cursor::new(data))?,
    };

    let text = tidy(&raw);
    if text.is_empty() {
        return Err(Error::SourceParseError(format!(
            "'{filename}' contains no extractable text"
        )));
    }
    Ok(text)
}

/// Normalize extracted text before it enters the prompt: NFC, unified
/// line endings, trimmed lines, and blank runs collapsed.
fn tidy(text: &str) -> String {
    let normalized: String = text.nfc().collect();
    let unified = normalized.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<&str> = Vec::new();
    let mut blank_run = 0usize;
    for line in unified.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run == 1 {
                lines.push("");
            }
        } else {
            blank_run = 0;
            lines.push(line);
        }
    }

    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_name() {
        assert_eq!(SourceFormat::from_name("notes.txt"), Some(SourceFormat::PlainText));
        assert_eq!(SourceFormat::from_name("Plan.MD"), Some(SourceFormat::Markdown));
        assert_eq!(SourceFormat::from_name("deck.pptx"), Some(SourceFormat::PptxDeck));
        assert_eq!(SourceFormat::from_name("scan.pdf"), None);
        assert_eq!(SourceFormat::from_name("archive"), None);
    }

    #[test]
    fn test_format_from_magic() {
        assert_eq!(
            SourceFormat::from_magic(&[0x50, 0x4B, 0x03, 0x04, 0x00]),
            Some(SourceFormat::PptxDeck)
        );
        assert_eq!(SourceFormat::from_magic(b"hello"), None);
        assert_eq!(SourceFormat::from_magic(&[]), None);
    }

    #[test]
    fn test_extract_plain_text() {
        let text = extract_text("First line\r\nSecond line".as_bytes(), "notes.txt").unwrap();
        assert_eq!(text, "First line\nSecond line");
    }

    #[test]
    fn test_extract_unsupported_is_an_error() {
        let result = extract_text(b"%PDF-1.7", "scan.pdf");
        assert!(matches!(result, Err(Error::UnsupportedSource(_))));
    }

    #[test]
    fn test_extract_invalid_utf8_is_an_error() {
        let result = extract_text(&[0xFF, 0xFE, 0x41], "notes.txt");
        assert!(matches!(result, Err(Error::SourceParseError(_))));
    }

    #[test]
    fn test_extract_empty_text_is_an_error() {
        let result = extract_text(b"  \n\n  ", "notes.txt");
        assert!(matches!(result, Err(Error::SourceParseError(_))));
    }

    #[test]
    fn test_tidy_collapses_blank_runs() {
        assert_eq!(tidy("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(tidy("  \n a \n"), "a");
    }

    #[test]
    fn test_tidy_applies_nfc() {
        // "e" + combining acute composes to a single char.
        let decomposed = "re\u{0301}sume\u{0301}";
        assert_eq!(tidy(decomposed), "r\u{00e9}sum\u{00e9}");
    }
}
