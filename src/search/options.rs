//! Search options and configuration.

use serde::{Deserialize, Serialize};

/// Options for the multi-stage search engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Maximum number of hits returned overall
    pub max_results: usize,

    /// Maximum number of hits per document
    pub per_document: usize,

    /// Query tokens shorter than this are ignored by the word stage
    pub min_token_len: usize,

    /// Characters trimmed from the longest word by the partial stage
    pub partial_trim: usize,

    /// Shortest stem the partial stage will search for
    pub min_stem_len: usize,

    /// Characters of context on each side of a match in snippets
    pub snippet_radius: usize,

    /// Search documents in parallel
    pub parallel: bool,
}

impl SearchOptions {
    /// Create new search options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overall result cap.
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max.max(1);
        self
    }

    /// Set the per-document result cap.
    pub fn with_per_document(mut self, max: usize) -> Self {
        self.per_document = max.max(1);
        self
    }

    /// Set the snippet radius.
    pub fn with_snippet_radius(mut self, radius: usize) -> Self {
        self.snippet_radius = radius;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Raise zero caps to 1.
    ///
    /// Deserialized options skip the builder, so a `0` cap from a config
    /// file would otherwise drop every hit.
    pub fn validated(mut self) -> Self {
        self.max_results = self.max_results.max(1);
        self.per_document = self.per_document.max(1);
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 5,
            per_document: 3,
            min_token_len: 3,
            partial_trim: 2,
            min_stem_len: 4,
            snippet_radius: 60,
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_options_builder() {
        let options = SearchOptions::new()
            .with_max_results(0)
            .with_per_document(2)
            .sequential();

        assert_eq!(options.max_results, 1);
        assert_eq!(options.per_document, 2);
        assert!(!options.parallel);
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: SearchOptions = serde_json::from_str(r#"{"max_results": 8}"#).unwrap();
        assert_eq!(options.max_results, 8);
        assert_eq!(options.per_document, 3);
    }

    #[test]
    fn test_validated_raises_zero_caps() {
        let options: SearchOptions =
            serde_json::from_str(r#"{"max_results": 0, "per_document": 0}"#).unwrap();
        let options = options.validated();
        assert_eq!(options.max_results, 1);
        assert_eq!(options.per_document, 1);
        assert_eq!(SearchOptions::default().validated(), SearchOptions::default());
    }
}
