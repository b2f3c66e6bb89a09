//! Document model types for ingested manuals.
//!
//! Documents and pages are built once during ingestion and are read-only
//! afterwards, which lets query-time code share them across threads freely.

mod document;
mod page;
mod toc;

pub use document::{Document, DocumentId, Metadata};
pub use page::{Page, PageCategory};
pub use toc::TocEntry;
