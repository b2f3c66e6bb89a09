//! Error types for pagewise library.

use std::io;
use thiserror::Error;

/// Result type alias for pagewise operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while ingesting or querying manuals.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading source files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The text extraction service failed.
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// The text extraction service returned no usable pages.
    #[error("Text extraction produced no pages")]
    EmptyExtraction,

    /// No extractor is registered for the given file type.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Extracted bytes are not valid UTF-8 text.
    #[error("Extracted text is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A classifier signature pattern failed to compile.
    #[error("Invalid signature pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A document failed its structural invariants.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A content-start page outside of the document.
    #[error("Content start page {0} is invalid (document has {1} pages)")]
    InvalidContentStart(u32, u32),

    /// Physical page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// A printed page number that maps outside of the document.
    #[error("Printed page {0} does not exist in this document")]
    PrintedPageOutOfRange(i32),

    /// A document with the same identifier is already stored.
    #[error("Document {0} already exists")]
    DuplicateDocument(String),

    /// The persistence store failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A search was issued with an empty candidate set.
    #[error("No documents available to search")]
    NoDocuments,

    /// The query contains no searchable text.
    #[error("Query is empty")]
    EmptyQuery,

    /// Requested document is not in the candidate set.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// A page request was made without a selected document.
    #[error("No document is currently selected")]
    NoDocumentSelected,

    /// Options could not be loaded from JSON.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[source] serde_json::Error),

    /// Error serializing or deserializing JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pipeline stage an error belongs to, used for user-visible reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    /// Reading the source and extracting page text.
    Extraction,
    /// Classification and structure inference.
    Ingestion,
    /// Writing or reading stored documents.
    Persistence,
    /// Query-time retrieval.
    Search,
    /// Page navigation on a loaded document.
    Navigation,
    /// Loading options.
    Configuration,
    /// Serializing documents and results.
    Output,
}

impl std::fmt::Display for ErrorStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorStage::Extraction => "extraction",
            ErrorStage::Ingestion => "ingestion",
            ErrorStage::Persistence => "persistence",
            ErrorStage::Search => "search",
            ErrorStage::Navigation => "navigation",
            ErrorStage::Configuration => "configuration",
            ErrorStage::Output => "output",
        };
        f.write_str(name)
    }
}

impl Error {
    /// The stage this error originated from.
    pub fn stage(&self) -> ErrorStage {
        match self {
            Error::Io(_)
            | Error::Extraction(_)
            | Error::EmptyExtraction
            | Error::UnsupportedFormat(_)
            | Error::InvalidUtf8(_) => ErrorStage::Extraction,
            Error::InvalidPattern(_)
            | Error::InvalidDocument(_)
            | Error::InvalidContentStart(..) => ErrorStage::Ingestion,
            Error::DuplicateDocument(_) | Error::Persistence(_) => ErrorStage::Persistence,
            Error::InvalidConfig(_) => ErrorStage::Configuration,
            Error::Json(_) => ErrorStage::Output,
            Error::NoDocuments | Error::EmptyQuery | Error::DocumentNotFound(_) => {
                ErrorStage::Search
            }
            Error::PageOutOfRange(..)
            | Error::PrintedPageOutOfRange(_)
            | Error::NoDocumentSelected => ErrorStage::Navigation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoDocuments;
        assert_eq!(err.to_string(), "No documents available to search");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.stage(), ErrorStage::Extraction);
    }

    #[test]
    fn test_error_stages() {
        assert_eq!(Error::EmptyExtraction.stage(), ErrorStage::Extraction);
        assert_eq!(
            Error::DuplicateDocument("a".into()).stage(),
            ErrorStage::Persistence
        );
        assert_eq!(Error::NoDocuments.stage(), ErrorStage::Search);
        assert_eq!(
            Error::PrintedPageOutOfRange(99).stage(),
            ErrorStage::Navigation
        );
        assert_eq!(ErrorStage::Persistence.to_string(), "persistence");
    }

    #[test]
    fn test_json_error_stages() {
        let parse = || serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        assert_eq!(Error::InvalidConfig(parse()).stage(), ErrorStage::Configuration);
        assert_eq!(Error::Json(parse()).stage(), ErrorStage::Output);
    }
}
