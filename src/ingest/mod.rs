//! Document ingestion: extracted page texts in, structured document out.

mod normalize;
mod options;
mod pipeline;

pub use normalize::normalize_text;
pub use options::IngestOptions;
pub use pipeline::Ingestor;
