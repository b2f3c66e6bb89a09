//! # pagewise
//!
//! Document structure inference and retrieval for technical manuals.
//!
//! Given the per-page text of a manual, pagewise works out what each page is
//! (title, table of contents, preface, main content, appendix, glossary,
//! blank), where the real content starts, and how the page numbers printed
//! in the manual relate to physical page positions. It then answers queries
//! over the main content with a multi-stage fallback search and reports hits
//! by the page numbers a reader would use.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagewise::{ingest_file, render, search};
//!
//! fn main() -> pagewise::Result<()> {
//!     let manual = ingest_file("inverter-manual.txt")?;
//!     println!("Content starts at page {}", manual.content_start_page());
//!
//!     let outcome = search("ground wire", &[manual])?;
//!     println!("{}", render::describe_outcome(&outcome));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Printed page detection**: Roman and Arabic page numbers in headers and footers
//! - **Table-driven classification**: weighted signature tables per page category
//! - **Content start resolution**: cascade from explicit page 1 down to a safe default
//! - **TOC parsing**: numbered, chapter, lettered, dotted-leader and plain entries
//! - **Page translation**: one linear map between physical and printed numbers
//! - **Multi-stage search**: exact phrase, word overlap, then partial stem
//! - **Parallel processing**: Uses Rayon for per-page classification and per-document search

pub mod classify;
pub mod detect;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod model;
pub mod offset;
pub mod render;
pub mod search;
pub mod session;
pub mod store;
pub mod structure;

// Re-export commonly used types
pub use classify::{Classification, ClassifierOptions, PageClassifier};
pub use detect::{detect_page_number, NumberKind, NumberingLimits, PrintedNumber};
pub use error::{Error, ErrorStage, Result};
pub use extract::{ExtractorRegistry, PlainTextExtractor, TextExtractor};
pub use ingest::{IngestOptions, Ingestor};
pub use model::{Document, DocumentId, Metadata, Page, PageCategory, TocEntry};
pub use offset::PageOffset;
pub use render::{DocumentSummary, JsonFormat};
pub use search::{SearchEngine, SearchHit, SearchOptions, SearchOutcome, StageKind};
pub use session::{PageView, QueryContext};
pub use store::{DocumentStore, MemoryStore};
pub use structure::{ContentStart, StartMethod, TocOptions};

use std::borrow::Borrow;
use std::path::Path;
use std::sync::Arc;

/// Ingest a manual from its page texts, in reading order.
///
/// # Example
///
/// ```
/// use pagewise::ingest_pages;
///
/// let pages = vec![
///     "ACME X100\nInstallation Manual\nCopyright 2024 Acme. All rights reserved.".to_string(),
///     "1.1 Mounting\nWARNING: Disconnect power before mounting the panel.\n\
///      Step 1 Fix the bracket with four screws and check the ground wire.\n1".to_string(),
/// ];
/// let doc = ingest_pages("X100", pages).unwrap();
/// assert_eq!(doc.content_start_page(), 2);
/// ```
pub fn ingest_pages(title: impl Into<String>, pages: Vec<String>) -> Result<Document> {
    Ingestor::default().ingest_pages(title, pages)
}

/// Ingest a manual from a file, using the built-in extractors.
///
/// # Example
///
/// ```no_run
/// use pagewise::ingest_file;
///
/// let doc = ingest_file("manual.txt").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn ingest_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    Ingestor::default().ingest_file(path.as_ref(), &ExtractorRegistry::with_defaults())
}

/// Ingest a manual from a file with custom options.
pub fn ingest_file_with_options<P: AsRef<Path>>(path: P, options: IngestOptions) -> Result<Document> {
    Ingestor::new(options).ingest_file(path.as_ref(), &ExtractorRegistry::with_defaults())
}

/// Search documents with the default engine.
pub fn search<D>(query: &str, documents: &[D]) -> Result<SearchOutcome>
where
    D: Borrow<Document> + Sync,
{
    SearchEngine::default().search(query, documents)
}

/// Builder for a manual library: ingestion, storage and search in one place.
///
/// # Example
///
/// ```no_run
/// use pagewise::Pagewise;
///
/// let library = Pagewise::new().sequential().build();
/// library.add_file("inverter-manual.txt")?;
/// let outcome = library.search("ground wire")?;
/// println!("{} hits", outcome.hits().len());
/// # Ok::<(), pagewise::Error>(())
/// ```
pub struct Pagewise {
    ingest_options: IngestOptions,
    search_options: SearchOptions,
    registry: ExtractorRegistry,
    classifier: Option<PageClassifier>,
}

impl Pagewise {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            ingest_options: IngestOptions::default(),
            search_options: SearchOptions::default(),
            registry: ExtractorRegistry::with_defaults(),
            classifier: None,
        }
    }

    /// Disable parallel processing for both ingestion and search.
    pub fn sequential(mut self) -> Self {
        self.ingest_options = self.ingest_options.sequential();
        self.search_options = self.search_options.sequential();
        self
    }

    /// Set ingest options.
    pub fn with_ingest_options(mut self, options: IngestOptions) -> Self {
        self.ingest_options = options;
        self
    }

    /// Set search options.
    pub fn with_search_options(mut self, options: SearchOptions) -> Self {
        self.search_options = options;
        self
    }

    /// Set the printed page number limits.
    pub fn with_numbering_limits(mut self, limits: NumberingLimits) -> Self {
        self.ingest_options = self.ingest_options.with_limits(limits);
        self
    }

    /// Classify pages on text only.
    pub fn without_number_detection(mut self) -> Self {
        self.ingest_options = self.ingest_options.without_number_detection();
        self
    }

    /// Register an additional text extractor.
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.registry.register(extractor);
        self
    }

    /// Use a customized page classifier.
    pub fn with_classifier(mut self, classifier: PageClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Build the library.
    pub fn build(self) -> Library {
        let mut ingestor = Ingestor::new(self.ingest_options);
        if let Some(classifier) = self.classifier {
            ingestor = ingestor.with_classifier(classifier);
        }
        Library {
            ingestor,
            registry: self.registry,
            engine: SearchEngine::new(self.search_options),
            store: MemoryStore::new(),
        }
    }
}

impl Default for Pagewise {
    fn default() -> Self {
        Self::new()
    }
}

/// A set of ingested manuals with search over them.
pub struct Library {
    ingestor: Ingestor,
    registry: ExtractorRegistry,
    engine: SearchEngine,
    store: MemoryStore,
}

impl Library {
    /// Ingest and store a file.
    pub fn add_file<P: AsRef<Path>>(&self, path: P) -> Result<Arc<Document>> {
        let document = self.ingestor.ingest_file(path.as_ref(), &self.registry)?;
        self.store.insert(document)
    }

    /// Ingest and store extracted page texts.
    pub fn add_pages(&self, title: impl Into<String>, pages: Vec<String>) -> Result<Arc<Document>> {
        let document = self.ingestor.ingest_pages(title, pages)?;
        self.store.insert(document)
    }

    /// Store an already ingested document.
    pub fn add_document(&self, document: Document) -> Result<Arc<Document>> {
        self.store.insert(document)
    }

    /// All stored documents in insertion order.
    pub fn documents(&self) -> Result<Vec<Arc<Document>>> {
        self.store.documents()
    }

    /// Search every stored document.
    pub fn search(&self, query: &str) -> Result<SearchOutcome> {
        let documents = self.store.documents()?;
        self.engine.search(query, &documents)
    }

    /// Start a query context over every stored document.
    pub fn context(&self) -> Result<QueryContext> {
        let engine = SearchEngine::new(self.engine.options().clone());
        Ok(QueryContext::from_store(&self.store)?.with_engine(engine))
    }

    /// The underlying store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}
