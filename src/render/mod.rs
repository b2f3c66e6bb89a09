//! Rendering of documents and search results for output.

mod json;
pub mod response;
mod summary;

pub use json::{to_json, JsonFormat};
pub use response::{describe_error, describe_outcome, describe_page};
pub use summary::DocumentSummary;
