//! Multi-stage search over ingested documents.
//!
//! The engine runs an ordered chain of stages (exact phrase, word overlap,
//! partial stem) and returns the results of the first stage that finds
//! anything. Only main-content pages are searched.
//!
//! # Example
//!
//! ```
//! use pagewise::model::{Document, Page, PageCategory};
//! use pagewise::search::{SearchEngine, SearchOptions, StageKind};
//!
//! let pages = vec![
//!     Page::new(1, "Contents").with_category(PageCategory::Toc),
//!     Page::new(2, "Connect the ground wire to terminal PE.").with_category(PageCategory::Main),
//! ];
//! let doc = Document::from_pages("Inverter Manual", pages, 2).unwrap();
//!
//! let engine = SearchEngine::new(SearchOptions::default());
//! let outcome = engine.search("ground wire", &[doc]).unwrap();
//! assert_eq!(outcome.stage(), Some(StageKind::Exact));
//! assert_eq!(outcome.hits()[0].printed_page, 1);
//! ```

mod options;
mod query;
mod snippet;
mod stage;

pub use options::SearchOptions;
pub use query::{partial_stem, tokenize, Query};
pub use snippet::snippet;
pub use stage::{default_stages, ExactPhraseStage, PartialStage, SearchStage, WordOverlapStage};

use crate::error::{Error, Result};
use crate::model::{Document, DocumentId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Which stage produced a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// The full query matched verbatim
    Exact,
    /// Pages share words with the query
    Word,
    /// Pages contain a stem of the longest query word
    Partial,
}

impl StageKind {
    /// Check if the results are exact matches.
    pub fn is_exact(&self) -> bool {
        matches!(self, StageKind::Exact)
    }

    /// Lower-case name of the stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Exact => "exact",
            StageKind::Word => "word",
            StageKind::Partial => "partial",
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page that matched a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document containing the page
    pub document_id: DocumentId,

    /// Title of that document
    pub document_title: String,

    /// Physical page index (1-indexed)
    pub physical_page: u32,

    /// Page number as printed in the document
    pub printed_page: i32,

    /// Stage-specific relevance score
    pub score: u32,

    /// Text around the first match
    pub snippet: String,

    /// Stage that produced the hit
    pub stage: StageKind,
}

/// Result of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// A stage found matching pages
    Found {
        /// Stage that produced the hits
        stage: StageKind,
        /// Hits in relevance order
        hits: Vec<SearchHit>,
    },
    /// No stage found anything
    NoMatch {
        /// The query as given
        query: String,
    },
}

impl SearchOutcome {
    /// Hits, empty when nothing matched.
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            SearchOutcome::Found { hits, .. } => hits,
            SearchOutcome::NoMatch { .. } => &[],
        }
    }

    /// Stage that produced the hits.
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            SearchOutcome::Found { stage, .. } => Some(*stage),
            SearchOutcome::NoMatch { .. } => None,
        }
    }

    /// Check if anything matched.
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    /// Take the hits out of the outcome.
    pub fn into_hits(self) -> Vec<SearchHit> {
        match self {
            SearchOutcome::Found { hits, .. } => hits,
            SearchOutcome::NoMatch { .. } => Vec::new(),
        }
    }
}

/// Stateless multi-stage search engine.
pub struct SearchEngine {
    stages: Vec<Box<dyn SearchStage>>,
    options: SearchOptions,
}

impl SearchEngine {
    /// Create an engine with the built-in stages.
    pub fn new(options: SearchOptions) -> Self {
        Self {
            stages: default_stages(),
            options: options.validated(),
        }
    }

    /// Replace the stage chain.
    pub fn with_stages(mut self, stages: Vec<Box<dyn SearchStage>>) -> Self {
        self.stages = stages;
        self
    }

    /// Search options.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Stages in the order they are tried.
    pub fn stage_kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(|s| s.kind()).collect()
    }

    /// Search the candidate documents.
    ///
    /// Stages run in order; the first stage with any hit decides the result
    /// and later stages are not run. Documents are searched independently and
    /// merged in candidate order, so results do not depend on scheduling.
    pub fn search<D>(&self, query: &str, documents: &[D]) -> Result<SearchOutcome>
    where
        D: Borrow<Document> + Sync,
    {
        if documents.is_empty() {
            return Err(Error::NoDocuments);
        }
        let query = Query::parse(query, &self.options)?;

        for stage in &self.stages {
            let per_document: Vec<Vec<SearchHit>> = if self.options.parallel {
                documents
                    .par_iter()
                    .map(|d| stage.search_document(&query, d.borrow(), &self.options))
                    .collect()
            } else {
                documents
                    .iter()
                    .map(|d| stage.search_document(&query, d.borrow(), &self.options))
                    .collect()
            };

            let hits = stage.merge(per_document, &self.options);
            log::debug!(
                "Stage {} found {} hits for {:?}",
                stage.kind(),
                hits.len(),
                query.as_str()
            );
            if !hits.is_empty() {
                log::info!(
                    "Query {:?} answered by {} stage ({} hits)",
                    query.as_str(),
                    stage.kind(),
                    hits.len()
                );
                return Ok(SearchOutcome::Found {
                    stage: stage.kind(),
                    hits,
                });
            }
        }

        Ok(SearchOutcome::NoMatch {
            query: query.as_str().to_string(),
        })
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("stages", &self.stage_kinds())
            .field("options", &self.options)
            .finish()
    }
}
