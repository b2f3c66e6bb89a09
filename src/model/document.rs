//! Document-level types.

use super::{Page, TocEntry};
use crate::error::{Error, Result};
use crate::offset::PageOffset;
use crate::structure::StartMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of an ingested document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: String,

    /// Source file name, if ingested from a file
    pub source: Option<String>,

    /// Name of the extractor that produced the page text
    pub extractor: Option<String>,

    /// Ingestion timestamp
    pub ingested_at: DateTime<Utc>,

    /// Total number of pages
    pub page_count: u32,
}

impl Metadata {
    /// Create metadata for a document with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: None,
            extractor: None,
            ingested_at: Utc::now(),
            page_count: 0,
        }
    }

    /// Set the source file name.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the extractor name.
    pub fn with_extractor(mut self, extractor: impl Into<String>) -> Self {
        self.extractor = Some(extractor.into());
        self
    }
}

/// An ingested manual.
///
/// Pages are dense and 1-indexed, and the content start page always lies
/// within the document. Both are checked once in [`Document::assemble`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    metadata: Metadata,
    pages: Vec<Page>,
    content_start_page: u32,
    start_method: StartMethod,
    toc_entries: Vec<TocEntry>,
}

impl Document {
    /// Build a document from classified pages, checking its invariants.
    pub fn assemble(
        id: DocumentId,
        mut metadata: Metadata,
        pages: Vec<Page>,
        content_start_page: u32,
        start_method: StartMethod,
        toc_entries: Vec<TocEntry>,
    ) -> Result<Self> {
        if pages.is_empty() {
            return Err(Error::InvalidDocument("document has no pages".into()));
        }

        for (position, page) in pages.iter().enumerate() {
            let expected = position as u32 + 1;
            if page.index != expected {
                return Err(Error::InvalidDocument(format!(
                    "page at position {} has index {} (expected {})",
                    position, page.index, expected
                )));
            }
        }

        let page_count = pages.len() as u32;
        if content_start_page == 0 || content_start_page > page_count {
            return Err(Error::InvalidContentStart(content_start_page, page_count));
        }

        metadata.page_count = page_count;
        Ok(Self {
            id,
            metadata,
            pages,
            content_start_page,
            start_method,
            toc_entries,
        })
    }

    /// Build a document from pages with a known content start page.
    pub fn from_pages(
        title: impl Into<String>,
        pages: Vec<Page>,
        content_start_page: u32,
    ) -> Result<Self> {
        Self::assemble(
            DocumentId::generate(),
            Metadata::new(title),
            pages,
            content_start_page,
            StartMethod::Explicit,
            Vec::new(),
        )
    }

    /// Replace the identifier.
    pub fn with_id(mut self, id: impl Into<DocumentId>) -> Self {
        self.id = id.into();
        self
    }

    /// Document identifier.
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Document title.
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// Document metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// All pages in reading order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by physical index (1-indexed).
    pub fn page(&self, physical: u32) -> Option<&Page> {
        if physical == 0 {
            return None;
        }
        self.pages.get((physical - 1) as usize)
    }

    /// Get a page by physical index, failing when it is out of range.
    pub fn page_at(&self, physical: u32) -> Result<&Page> {
        self.page(physical)
            .ok_or(Error::PageOutOfRange(physical, self.page_count()))
    }

    /// Physical index where the main content begins.
    pub fn content_start_page(&self) -> u32 {
        self.content_start_page
    }

    /// How the content start page was determined.
    pub fn start_method(&self) -> StartMethod {
        self.start_method
    }

    /// Table of contents entries.
    pub fn toc_entries(&self) -> &[TocEntry] {
        &self.toc_entries
    }

    /// The physical/printed page translator for this document.
    pub fn offset(&self) -> PageOffset {
        PageOffset::new(self.content_start_page)
    }

    /// Printed page number of a physical page.
    pub fn printed_number(&self, physical: u32) -> i32 {
        self.offset().to_printed(physical)
    }

    /// Look up a page by the number a reader would say.
    pub fn page_for_printed(&self, printed: i32) -> Result<&Page> {
        let physical = self.offset().to_physical(printed);
        u32::try_from(physical)
            .ok()
            .and_then(|p| self.page(p))
            .ok_or(Error::PrintedPageOutOfRange(printed))
    }

    /// Label to show for a physical page.
    ///
    /// Body pages use their printed number. Front matter uses the number
    /// detected on the page (usually Roman), if any.
    pub fn page_label(&self, physical: u32) -> Option<String> {
        let page = self.page(physical)?;
        let printed = self.printed_number(physical);
        if printed >= 1 {
            return Some(printed.to_string());
        }
        page.printed.as_ref().map(|n| n.value.clone())
    }

    /// Pages that take part in retrieval.
    pub fn searchable_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(|p| p.is_searchable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::PrintedNumber;

    fn sample_pages(count: u32) -> Vec<Page> {
        (1..=count)
            .map(|i| Page::new(i, format!("page {}", i)))
            .collect()
    }

    #[test]
    fn test_assemble_validates_indices() {
        let mut pages = sample_pages(3);
        pages[1].index = 5;
        let result = Document::from_pages("Manual", pages, 1);
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_assemble_validates_content_start() {
        let result = Document::from_pages("Manual", sample_pages(3), 4);
        assert!(matches!(result, Err(Error::InvalidContentStart(4, 3))));

        let result = Document::from_pages("Manual", sample_pages(3), 0);
        assert!(matches!(result, Err(Error::InvalidContentStart(0, 3))));

        let result = Document::from_pages("Manual", Vec::new(), 1);
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_page_lookup() {
        let doc = Document::from_pages("Manual", sample_pages(6), 3).unwrap();
        assert_eq!(doc.page_count(), 6);
        assert_eq!(doc.metadata().page_count, 6);
        assert!(doc.page(0).is_none());
        assert_eq!(doc.page(6).unwrap().index, 6);
        assert!(doc.page(7).is_none());

        assert_eq!(doc.page_at(2).unwrap().index, 2);
        assert!(matches!(doc.page_at(7), Err(Error::PageOutOfRange(7, 6))));
        assert!(matches!(doc.page_at(0), Err(Error::PageOutOfRange(0, 6))));
    }

    #[test]
    fn test_printed_lookup() {
        let doc = Document::from_pages("Manual", sample_pages(6), 3).unwrap();
        assert_eq!(doc.printed_number(3), 1);
        assert_eq!(doc.printed_number(1), -1);
        assert_eq!(doc.page_for_printed(4).unwrap().index, 6);
        assert!(matches!(
            doc.page_for_printed(5),
            Err(Error::PrintedPageOutOfRange(5))
        ));
        assert!(doc.page_for_printed(-5).is_err());
    }

    #[test]
    fn test_page_label() {
        let mut pages = sample_pages(4);
        pages[1].printed = Some(PrintedNumber::roman("ii", 2));
        let doc = Document::from_pages("Manual", pages, 3).unwrap();
        assert_eq!(doc.page_label(1), None);
        assert_eq!(doc.page_label(2), Some("ii".to_string()));
        assert_eq!(doc.page_label(4), Some("2".to_string()));
    }

    #[test]
    fn test_with_id() {
        let doc = Document::from_pages("Manual", sample_pages(1), 1)
            .unwrap()
            .with_id("manual-a");
        assert_eq!(doc.id().as_str(), "manual-a");
        assert_eq!(doc.start_method(), StartMethod::Explicit);
    }
}
