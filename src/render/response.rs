//! Human-readable responses for search outcomes and errors.
//!
//! These are the sentences a presentation layer reads back to the user. An
//! empty search is never reported as an error: it gets a "try different
//! terms" message instead.

use crate::error::Error;
use crate::search::{SearchHit, SearchOutcome, StageKind};
use crate::session::PageView;
use std::fmt::Write;

/// How a hit's page is named for the reader.
pub fn page_reference(hit: &SearchHit) -> String {
    if hit.printed_page >= 1 {
        format!("page {}", hit.printed_page)
    } else {
        format!("physical page {}", hit.physical_page)
    }
}

/// Describe a search outcome.
pub fn describe_outcome(outcome: &SearchOutcome) -> String {
    let (stage, hits) = match outcome {
        SearchOutcome::NoMatch { query } => {
            return format!("No results found for \"{}\". Try different terms.", query);
        }
        SearchOutcome::Found { stage, hits } => (*stage, hits),
    };

    let mut out = match stage {
        StageKind::Exact => format!("Found {} matching {}:", hits.len(), pages(hits.len())),
        StageKind::Word | StageKind::Partial => format!(
            "No exact match, but found {} {} containing related terms:",
            hits.len(),
            pages(hits.len())
        ),
    };
    for hit in hits {
        let _ = write!(
            out,
            "\n- {}, {}: {}",
            hit.document_title,
            page_reference(hit),
            hit.snippet
        );
    }
    out
}

fn pages(count: usize) -> &'static str {
    if count == 1 {
        "page"
    } else {
        "pages"
    }
}

/// Describe a displayed page.
pub fn describe_page(view: &PageView) -> String {
    format!(
        "{}, page {}:\n{}",
        view.document_title,
        view.printed_page,
        view.text.trim()
    )
}

/// Describe an error for the reader, naming the stage that failed.
pub fn describe_error(error: &Error) -> String {
    match error {
        Error::NoDocuments => "No documents are available to search. Add a manual first.".into(),
        Error::EmptyQuery => "Please say what you are looking for.".into(),
        Error::PrintedPageOutOfRange(page) => {
            format!("Page {} does not exist in this manual.", page)
        }
        Error::NoDocumentSelected => "Open a manual before asking for a page.".into(),
        Error::EmptyExtraction => {
            "The document could not be read: extraction produced no text.".into()
        }
        other => format!("The {} stage failed: {}", other.stage(), other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentId;

    fn hit(printed: i32, stage: StageKind) -> SearchHit {
        SearchHit {
            document_id: DocumentId::from("a"),
            document_title: "X100 Manual".into(),
            physical_page: 12,
            printed_page: printed,
            score: 1,
            snippet: "connect the ground wire".into(),
            stage,
        }
    }

    #[test]
    fn test_exact_outcome() {
        let outcome = SearchOutcome::Found {
            stage: StageKind::Exact,
            hits: vec![hit(8, StageKind::Exact)],
        };
        assert_eq!(
            describe_outcome(&outcome),
            "Found 1 matching page:\n- X100 Manual, page 8: connect the ground wire"
        );
    }

    #[test]
    fn test_related_terms_outcome() {
        let outcome = SearchOutcome::Found {
            stage: StageKind::Word,
            hits: vec![hit(8, StageKind::Word), hit(0, StageKind::Word)],
        };
        let text = describe_outcome(&outcome);
        assert!(text.starts_with("No exact match, but found 2 pages containing related terms:"));
        assert!(text.contains("physical page 12"));
    }

    #[test]
    fn test_no_match_outcome() {
        let outcome = SearchOutcome::NoMatch {
            query: "flux capacitor".into(),
        };
        assert_eq!(
            describe_outcome(&outcome),
            "No results found for \"flux capacitor\". Try different terms."
        );
    }

    #[test]
    fn test_describe_error() {
        assert_eq!(
            describe_error(&Error::NoDocuments),
            "No documents are available to search. Add a manual first."
        );
        assert_eq!(
            describe_error(&Error::Persistence("disk full".into())),
            "The persistence stage failed: Persistence error: disk full"
        );

        let config = crate::IngestOptions::from_json("{ not json").unwrap_err();
        assert!(describe_error(&config).starts_with("The configuration stage failed:"));
    }
}
