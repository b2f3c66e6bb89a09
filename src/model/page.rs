//! Page-level types.

use crate::classify::Classification;
use crate::detect::PrintedNumber;
use serde::{Deserialize, Serialize};

/// Structural role of a page within a manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageCategory {
    /// Cover, title and copyright pages
    Title,
    /// Table of contents
    Toc,
    /// Preface, foreword, about-this-manual
    Preface,
    /// Substantive content
    Main,
    /// Appendices and annexes
    Appendix,
    /// Glossary and definitions
    Glossary,
    /// Empty or near-empty page
    Blank,
    /// No category scored high enough
    #[default]
    Unknown,
}

impl PageCategory {
    /// Lower-case name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageCategory::Title => "title",
            PageCategory::Toc => "toc",
            PageCategory::Preface => "preface",
            PageCategory::Main => "main",
            PageCategory::Appendix => "appendix",
            PageCategory::Glossary => "glossary",
            PageCategory::Blank => "blank",
            PageCategory::Unknown => "unknown",
        }
    }

    /// Check if the category precedes the main content.
    pub fn is_front_matter(&self) -> bool {
        matches!(
            self,
            PageCategory::Title | PageCategory::Toc | PageCategory::Preface
        )
    }
}

impl std::fmt::Display for PageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single page of an ingested document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Physical page index (1-indexed, reading order)
    pub index: u32,

    /// Extracted page text
    pub text: String,

    /// Classified role of the page
    pub category: PageCategory,

    /// Classification confidence (0-100)
    pub confidence: u8,

    /// Page number printed on the page, if one was detected
    pub printed: Option<PrintedNumber>,

    /// Number of characters in the trimmed text
    pub char_count: usize,
}

impl Page {
    /// Create an unclassified page.
    pub fn new(index: u32, text: impl Into<String>) -> Self {
        let text = text.into();
        let char_count = text.trim().chars().count();
        Self {
            index,
            text,
            category: PageCategory::Unknown,
            confidence: 0,
            printed: None,
            char_count,
        }
    }

    /// Set the category with full confidence.
    pub fn with_category(mut self, category: PageCategory) -> Self {
        self.category = category;
        self.confidence = 100;
        self
    }

    /// Apply a classifier result.
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.category = classification.category;
        self.confidence = classification.confidence;
        self
    }

    /// Set the detected printed number.
    pub fn with_printed(mut self, printed: Option<PrintedNumber>) -> Self {
        self.printed = printed;
        self
    }

    /// Check if the page takes part in retrieval.
    pub fn is_searchable(&self) -> bool {
        self.category == PageCategory::Main
    }

    /// Check if the page is blank.
    pub fn is_blank(&self) -> bool {
        self.category == PageCategory::Blank
    }
}
