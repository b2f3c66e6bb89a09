//! Per-conversation query context.
//!
//! A [`QueryContext`] holds the candidate documents for a sequence of queries
//! and the document currently being read, so follow-up requests such as
//! "show page 12" resolve against the right manual without any global state.

use crate::error::{Error, Result};
use crate::model::{Document, DocumentId, Page, PageCategory};
use crate::search::{SearchEngine, SearchOutcome};
use crate::store::DocumentStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A page resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    /// Document containing the page
    pub document_id: DocumentId,
    /// Title of that document
    pub document_title: String,
    /// Physical page index (1-indexed)
    pub physical_page: u32,
    /// Printed page number
    pub printed_page: i32,
    /// Category of the page
    pub category: PageCategory,
    /// Page text
    pub text: String,
}

/// Candidate documents and the current selection.
#[derive(Debug)]
pub struct QueryContext {
    candidates: Vec<Arc<Document>>,
    selected: Option<Arc<Document>>,
    engine: SearchEngine,
}

impl QueryContext {
    /// Create a context over the given candidates, in tie-break order.
    pub fn new(candidates: Vec<Arc<Document>>) -> Self {
        Self {
            candidates,
            selected: None,
            engine: SearchEngine::default(),
        }
    }

    /// Create a context over every document in a store.
    pub fn from_store(store: &dyn DocumentStore) -> Result<Self> {
        Ok(Self::new(store.documents()?))
    }

    /// Use a configured search engine.
    pub fn with_engine(mut self, engine: SearchEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Remaining candidate documents.
    pub fn candidates(&self) -> &[Arc<Document>] {
        &self.candidates
    }

    /// The selected document, if any.
    pub fn selected(&self) -> Option<&Arc<Document>> {
        self.selected.as_ref()
    }

    /// Search the candidates.
    ///
    /// When the search finds something, the document of the best hit becomes
    /// the selected document. A failed or empty search keeps the selection.
    pub fn search(&mut self, query: &str) -> Result<SearchOutcome> {
        let outcome = self.engine.search(query, &self.candidates)?;
        if let Some(best) = outcome.hits().first() {
            self.selected = self
                .candidates
                .iter()
                .find(|d| *d.id() == best.document_id)
                .cloned();
        }
        Ok(outcome)
    }

    /// Drop a document from the candidate set.
    ///
    /// Clears the selection if it was the excluded document.
    pub fn exclude(&mut self, id: &DocumentId) -> Result<Arc<Document>> {
        let position = self
            .candidates
            .iter()
            .position(|d| d.id() == id)
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;
        let removed = self.candidates.remove(position);
        if self.selected.as_ref().is_some_and(|d| d.id() == id) {
            self.selected = None;
        }
        log::debug!("Excluded {} from candidates", id);
        Ok(removed)
    }

    /// Select a candidate document for page navigation.
    pub fn select(&mut self, id: &DocumentId) -> Result<&Arc<Document>> {
        let document = self
            .candidates
            .iter()
            .find(|d| d.id() == id)
            .cloned()
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;
        Ok(self.selected.insert(document))
    }

    /// Show a page of the selected document by its printed number.
    pub fn show_printed_page(&self, printed: i32) -> Result<PageView> {
        let document = self.selected.as_ref().ok_or(Error::NoDocumentSelected)?;
        let page = document.page_for_printed(printed)?;
        Ok(view(document, page))
    }

    /// Show a page of the selected document by its physical index.
    pub fn show_physical_page(&self, physical: u32) -> Result<PageView> {
        let document = self.selected.as_ref().ok_or(Error::NoDocumentSelected)?;
        let page = document.page_at(physical)?;
        Ok(view(document, page))
    }
}

fn view(document: &Document, page: &Page) -> PageView {
    PageView {
        document_id: document.id().clone(),
        document_title: document.title().to_string(),
        physical_page: page.index,
        printed_page: document.printed_number(page.index),
        category: page.category,
        text: page.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(id: &str, texts: &[&str], start: u32) -> Arc<Document> {
        let pages = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Page::new(i as u32 + 1, *t).with_category(PageCategory::Main))
            .collect();
        Arc::new(Document::from_pages(id, pages, start).unwrap().with_id(id))
    }

    #[test]
    fn test_search_selects_best_document() {
        let mut context = QueryContext::new(vec![
            document("a", &["intro", "fuse"], 1),
            document("b", &["relay"], 1),
        ]);
        assert!(context.selected().is_none());
        context.search("relay").unwrap();
        assert_eq!(context.selected().unwrap().id().as_str(), "b");

        context.search("zebra").unwrap();
        assert_eq!(context.selected().unwrap().id().as_str(), "b");
    }

    #[test]
    fn test_show_printed_page() {
        let mut context = QueryContext::new(vec![document("a", &["i", "ii", "one", "two"], 3)]);
        assert!(matches!(
            context.show_printed_page(1),
            Err(Error::NoDocumentSelected)
        ));

        context.select(&DocumentId::from("a")).unwrap();
        let view = context.show_printed_page(2).unwrap();
        assert_eq!(view.physical_page, 4);
        assert_eq!(view.text, "two");
        assert!(matches!(
            context.show_printed_page(3),
            Err(Error::PrintedPageOutOfRange(3))
        ));
    }

    #[test]
    fn test_show_physical_page() {
        let mut context = QueryContext::new(vec![document("a", &["i", "ii", "one", "two"], 3)]);
        context.select(&DocumentId::from("a")).unwrap();

        let view = context.show_physical_page(2).unwrap();
        assert_eq!(view.text, "ii");
        assert_eq!(view.printed_page, 0);
        assert!(matches!(
            context.show_physical_page(5),
            Err(Error::PageOutOfRange(5, 4))
        ));
    }

    #[test]
    fn test_exclude() {
        let mut context = QueryContext::new(vec![document("a", &["fuse"], 1)]);
        context.select(&DocumentId::from("a")).unwrap();
        context.exclude(&DocumentId::from("a")).unwrap();
        assert!(context.selected().is_none());
        assert!(matches!(context.search("fuse"), Err(Error::NoDocuments)));
        assert!(matches!(
            context.exclude(&DocumentId::from("a")),
            Err(Error::DocumentNotFound(_))
        ));
    }
}
