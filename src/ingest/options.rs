//! Ingestion options and configuration.

use crate::classify::ClassifierOptions;
use crate::detect::NumberingLimits;
use crate::error::{Error, Result};
use crate::structure::TocOptions;
use serde::{Deserialize, Serialize};

/// Options for ingesting a document.
///
/// All fields have defaults, so a JSON configuration only needs the values
/// it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Bounds for printed page number detection
    pub limits: NumberingLimits,

    /// Classifier thresholds
    pub classifier: ClassifierOptions,

    /// TOC entry limits
    pub toc: TocOptions,

    /// Minimum length of a page used by the substantial-content fallback
    pub substantial_floor: usize,

    /// Whether to classify pages in parallel
    pub parallel: bool,

    /// Pages handed to the worker pool at a time (0 = all at once)
    pub batch_size: usize,

    /// Whether to detect printed page numbers
    pub detect_numbers: bool,

    /// Whether to apply Unicode NFC normalization and ligature folding
    pub normalize: bool,
}

impl IngestOptions {
    /// Create new ingest options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::InvalidConfig)
    }

    /// Set the numbering limits.
    pub fn with_limits(mut self, limits: NumberingLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the classifier options.
    pub fn with_classifier(mut self, options: ClassifierOptions) -> Self {
        self.classifier = options;
        self
    }

    /// Set the TOC options.
    pub fn with_toc(mut self, options: TocOptions) -> Self {
        self.toc = options;
        self
    }

    /// Set the substantial-content floor.
    pub fn with_substantial_floor(mut self, chars: usize) -> Self {
        self.substantial_floor = chars;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the classification batch size.
    pub fn with_batch_size(mut self, pages: usize) -> Self {
        self.batch_size = pages;
        self
    }

    /// Skip printed page number detection; pages are classified on text only.
    pub fn without_number_detection(mut self) -> Self {
        self.detect_numbers = false;
        self
    }

    /// Enable or disable text normalization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            limits: NumberingLimits::default(),
            classifier: ClassifierOptions::default(),
            toc: TocOptions::default(),
            substantial_floor: 500,
            parallel: true,
            batch_size: 64,
            detect_numbers: true,
            normalize: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_options_builder() {
        let options = IngestOptions::new()
            .sequential()
            .with_batch_size(8)
            .without_number_detection()
            .with_substantial_floor(300);

        assert!(!options.parallel);
        assert_eq!(options.batch_size, 8);
        assert!(!options.detect_numbers);
        assert_eq!(options.substantial_floor, 300);
    }

    #[test]
    fn test_ingest_options_default() {
        let options = IngestOptions::default();
        assert!(options.parallel);
        assert!(options.normalize);
        assert_eq!(options.limits.roman_ceiling, 30);
        assert_eq!(options.toc.max_page, 500);
    }

    #[test]
    fn test_from_json_nested_partial() {
        let json = r#"{
            "limits": { "roman_ceiling": 50 },
            "classifier": { "late_page_floor": 20 },
            "parallel": false
        }"#;
        let options = IngestOptions::from_json(json).unwrap();
        assert_eq!(options.limits.roman_ceiling, 50);
        assert_eq!(options.limits.arabic_ceiling, 2000);
        assert_eq!(options.classifier.late_page_floor, 20);
        assert_eq!(options.classifier.blank_floor, 50);
        assert!(!options.parallel);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = IngestOptions::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert_eq!(err.stage(), crate::error::ErrorStage::Configuration);
    }
}
