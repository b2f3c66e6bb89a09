//! Text extraction with a plugin architecture for source formats.
//!
//! An extractor turns raw document bytes into an ordered list of page texts.
//! The ordering is taken as reading order and must cover every page. Format
//! decoding itself (PDF and friends) lives outside this crate; register an
//! extractor for each format you need.
//!
//! # Example
//!
//! ```no_run
//! use pagewise::extract::{ExtractorRegistry, PlainTextExtractor};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! fn main() -> pagewise::Result<()> {
//!     let mut registry = ExtractorRegistry::new();
//!     registry.register(Arc::new(PlainTextExtractor::new()));
//!
//!     let pages = registry.extract(Path::new("manual.txt"))?;
//!     println!("{} pages", pages.len());
//!     Ok(())
//! }
//! ```

mod plain;

pub use plain::PlainTextExtractor;

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Trait for page text extractors.
///
/// Implement this trait to add support for a new source format.
pub trait TextExtractor: Send + Sync {
    /// Get the supported file extensions for this extractor.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["txt"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this extractor.
    fn name(&self) -> &str;

    /// Extract page texts from bytes, in reading order.
    fn extract(&self, bytes: &[u8]) -> Result<Vec<String>>;

    /// Extract page texts from a file.
    fn extract_path(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = std::fs::read(path)?;
        self.extract(&bytes)
    }

    /// Check if this extractor supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for text extractors.
///
/// The registry maps file extensions to extractors.
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn TextExtractor>>,
    by_name: HashMap<String, Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the built-in extractors (plain text).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PlainTextExtractor::new()));
        registry
    }

    /// Register an extractor.
    ///
    /// The extractor will be registered for all its supported extensions,
    /// replacing any extractor previously registered for them.
    pub fn register(&mut self, extractor: Arc<dyn TextExtractor>) {
        for ext in extractor.supported_extensions() {
            self.extractors
                .insert(ext.to_lowercase(), extractor.clone());
        }
        self.by_name
            .insert(extractor.name().to_lowercase(), extractor);
    }

    /// Get an extractor by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn TextExtractor>> {
        self.extractors.get(&ext.to_lowercase()).cloned()
    }

    /// Get an extractor by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn TextExtractor>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.extractors.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.extractors.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Find the extractor for a file by its extension.
    pub fn for_path(&self, path: &Path) -> Result<Arc<dyn TextExtractor>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;

        self.get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedFormat(ext.to_string()))
    }

    /// Extract a file using the appropriate extractor.
    pub fn extract(&self, path: &Path) -> Result<Vec<String>> {
        self.for_path(path)?.extract_path(path)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
