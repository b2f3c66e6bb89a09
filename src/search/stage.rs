//! Search strategies.
//!
//! Each stage searches one document at a time and then merges the
//! per-document results. The engine tries stages in order and stops at the
//! first one that produces anything.

use super::snippet::snippet;
use super::{Query, SearchHit, SearchOptions, StageKind};
use crate::model::{Document, Page};
use std::cmp::Reverse;

/// A strategy in the search fallback chain.
pub trait SearchStage: Send + Sync {
    /// Which stage this is.
    fn kind(&self) -> StageKind;

    /// Search the searchable pages of one document.
    ///
    /// Implementations return at most `options.per_document` hits, already
    /// in the stage's relevance order.
    fn search_document(
        &self,
        query: &Query,
        document: &Document,
        options: &SearchOptions,
    ) -> Vec<SearchHit>;

    /// Merge per-document results, given in candidate order.
    ///
    /// The default takes hits round-robin across documents so that one
    /// document cannot fill the whole result list.
    fn merge(&self, per_document: Vec<Vec<SearchHit>>, options: &SearchOptions) -> Vec<SearchHit> {
        let mut queues: Vec<_> = per_document.into_iter().map(Vec::into_iter).collect();
        let mut merged = Vec::new();
        loop {
            let mut progressed = false;
            for queue in queues.iter_mut() {
                if merged.len() >= options.max_results {
                    return merged;
                }
                if let Some(hit) = queue.next() {
                    merged.push(hit);
                    progressed = true;
                }
            }
            if !progressed {
                return merged;
            }
        }
    }
}

/// The built-in stages in fallback order.
pub fn default_stages() -> Vec<Box<dyn SearchStage>> {
    vec![
        Box::new(ExactPhraseStage),
        Box::new(WordOverlapStage),
        Box::new(PartialStage),
    ]
}

fn make_hit(
    document: &Document,
    page: &Page,
    score: u32,
    snippet: String,
    stage: StageKind,
) -> SearchHit {
    SearchHit {
        document_id: document.id().clone(),
        document_title: document.title().to_string(),
        physical_page: page.index,
        printed_page: document.printed_number(page.index),
        score,
        snippet,
        stage,
    }
}

/// Case-insensitive match of the whole query, earliest pages first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactPhraseStage;

impl SearchStage for ExactPhraseStage {
    fn kind(&self) -> StageKind {
        StageKind::Exact
    }

    fn search_document(
        &self,
        query: &Query,
        document: &Document,
        options: &SearchOptions,
    ) -> Vec<SearchHit> {
        let mut hits = Vec::new();
        for page in document.searchable_pages() {
            let mut matches = query.phrase().find_iter(&page.text);
            let Some(first) = matches.next() else {
                continue;
            };
            let score = 1 + matches.count() as u32;
            let context = snippet(&page.text, first.start(), first.end(), options.snippet_radius);
            hits.push(make_hit(document, page, score, context, self.kind()));
            if hits.len() >= options.per_document {
                break;
            }
        }
        hits
    }
}

/// Pages scored by how many distinct query tokens they contain.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordOverlapStage;

impl SearchStage for WordOverlapStage {
    fn kind(&self) -> StageKind {
        StageKind::Word
    }

    fn search_document(
        &self,
        query: &Query,
        document: &Document,
        options: &SearchOptions,
    ) -> Vec<SearchHit> {
        if query.tokens().is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for page in document.searchable_pages() {
            let found: Vec<_> = query
                .tokens()
                .iter()
                .filter_map(|(_, re)| re.find(&page.text))
                .collect();
            let Some(first) = found.iter().min_by_key(|m| m.start()) else {
                continue;
            };
            let context = snippet(&page.text, first.start(), first.end(), options.snippet_radius);
            hits.push(make_hit(
                document,
                page,
                found.len() as u32,
                context,
                self.kind(),
            ));
        }

        // Stable: equal scores stay in page order.
        hits.sort_by_key(|h| Reverse(h.score));
        hits.truncate(options.per_document);
        hits
    }

    /// Overlap scores are comparable across documents, so the merge ranks
    /// globally; equal scores keep candidate order.
    fn merge(&self, per_document: Vec<Vec<SearchHit>>, options: &SearchOptions) -> Vec<SearchHit> {
        let mut merged: Vec<SearchHit> = per_document.into_iter().flatten().collect();
        merged.sort_by_key(|h| Reverse(h.score));
        merged.truncate(options.max_results);
        merged
    }
}

/// Match on a truncated stem of the longest query word, in page order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialStage;

impl SearchStage for PartialStage {
    fn kind(&self) -> StageKind {
        StageKind::Partial
    }

    fn search_document(
        &self,
        query: &Query,
        document: &Document,
        options: &SearchOptions,
    ) -> Vec<SearchHit> {
        let Some((_, stem)) = query.stem() else {
            return Vec::new();
        };

        document
            .searchable_pages()
            .filter_map(|page| {
                let mut matches = stem.find_iter(&page.text);
                let first = matches.next()?;
                let score = 1 + matches.count() as u32;
                let context =
                    snippet(&page.text, first.start(), first.end(), options.snippet_radius);
                Some(make_hit(document, page, score, context, self.kind()))
            })
            .take(options.per_document)
            .collect()
    }
}
