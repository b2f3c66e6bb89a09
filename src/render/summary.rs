//! Structure summaries of ingested documents.

use super::json::{write_json, JsonFormat};
use crate::error::Result;
use crate::model::{Document, PageCategory, TocEntry};
use crate::structure::StartMethod;
use serde::Serialize;
use std::collections::BTreeMap;

/// The inferred structure of a document, without page text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    /// Document identifier
    pub id: String,
    /// Document title
    pub title: String,
    /// Total number of pages
    pub page_count: u32,
    /// Physical page where the main content begins
    pub content_start_page: u32,
    /// Rule that located the content start
    pub start_method: StartMethod,
    /// Printed minus physical page number
    pub offset: i32,
    /// Page count per category
    pub categories: BTreeMap<String, u32>,
    /// Table of contents
    pub toc: Vec<TocEntry>,
}

impl DocumentSummary {
    /// Summarize a document.
    pub fn new(doc: &Document) -> Self {
        let mut categories = BTreeMap::new();
        for page in doc.pages() {
            *categories.entry(page.category.to_string()).or_insert(0) += 1;
        }
        Self {
            id: doc.id().to_string(),
            title: doc.title().to_string(),
            page_count: doc.page_count(),
            content_start_page: doc.content_start_page(),
            start_method: doc.start_method(),
            offset: doc.offset().offset(),
            categories,
            toc: doc.toc_entries().to_vec(),
        }
    }

    /// Page count for one category.
    pub fn count(&self, category: PageCategory) -> u32 {
        self.categories.get(category.as_str()).copied().unwrap_or(0)
    }

    /// Serialize the summary to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        write_json(self, format)
    }
}
