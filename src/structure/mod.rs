//! Whole-document structure inference.
//!
//! Runs after every page has been classified: locates the start of the
//! main content and parses the table of contents pages.

mod content_start;
mod toc;

pub use content_start::{numbering_is_monotonic, resolve_content_start, ContentStart, StartMethod};
pub use toc::{extract_toc, TocOptions};
