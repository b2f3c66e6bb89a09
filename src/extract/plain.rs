//! Plain text extractor.

use super::TextExtractor;
use crate::error::Result;

/// Page separator used by `pdftotext` and most text dumps.
const FORM_FEED: char = '\x0c';

/// Extracts pages from UTF-8 text separated by form feeds.
///
/// A trailing separator does not produce an extra empty page. Text without
/// any separator is a single page.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor {
    _private: (),
}

impl PlainTextExtractor {
    /// Create a new plain text extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for PlainTextExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn name(&self) -> &str {
        "plain"
    }

    fn extract(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let text = String::from_utf8(bytes.to_vec())?;
        let mut pages: Vec<String> = text.split(FORM_FEED).map(str::to_string).collect();
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }
        log::debug!("Split {} bytes into {} pages", bytes.len(), pages.len());
        Ok(pages)
    }
}
