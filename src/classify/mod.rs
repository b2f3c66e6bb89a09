//! Page classification.
//!
//! Every page is scored against the signature table of each category and
//! assigned the best-scoring one. Classification of a page depends only on
//! its own text, index and detected page number, so pages can be classified
//! in any order or in parallel.

mod signatures;

pub use signatures::{default_tables, Bonus, Gate, Signature, SignatureTable};

use crate::detect::PrintedNumber;
use crate::error::Result;
use crate::model::PageCategory;
use regex::Regex;
use serde::{Deserialize, Serialize};
use signatures::PageFeatures;
use std::sync::LazyLock;

static DEFAULT_TABLES: LazyLock<Vec<SignatureTable>> =
    LazyLock::new(|| default_tables().expect("built-in signature tables compile"));

/// Result of classifying one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Assigned category
    pub category: PageCategory,
    /// Confidence (0-100)
    pub confidence: u8,
}

impl Classification {
    /// Create a classification result.
    pub fn new(category: PageCategory, confidence: u8) -> Self {
        Self {
            category,
            confidence: confidence.min(100),
        }
    }
}

/// Thresholds used by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    /// Pages with fewer trimmed characters are blank
    pub blank_floor: usize,
    /// Minimum winning score for a category to be assigned
    pub confidence_floor: u32,
    /// Title signatures only apply up to this physical index
    pub title_max_index: u32,
    /// Title signatures only apply to pages up to this length
    pub title_max_chars: usize,
    /// Preface signatures only apply up to this physical index
    pub front_max_index: u32,
    /// Pages shorter than this get the title brevity bonus
    pub brief_page_chars: usize,
    /// Pages longer than this get the main-content length bonus
    pub large_page_chars: usize,
    /// Share of short numeric tokens that marks a table of contents
    pub toc_density_threshold: f32,
    /// Unclassified pages past this index default to main content
    pub late_page_floor: u32,
    /// Confidence given to late pages defaulted to main content
    pub late_default_confidence: u8,
    /// Minimum length for a late page to default to main content
    pub non_trivial_chars: usize,
}

impl ClassifierOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the blank page floor.
    pub fn with_blank_floor(mut self, chars: usize) -> Self {
        self.blank_floor = chars;
        self
    }

    /// Set the confidence floor.
    pub fn with_confidence_floor(mut self, score: u32) -> Self {
        self.confidence_floor = score;
        self
    }

    /// Set the late-page floor.
    pub fn with_late_page_floor(mut self, index: u32) -> Self {
        self.late_page_floor = index;
        self
    }
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            blank_floor: 50,
            confidence_floor: 30,
            title_max_index: 3,
            title_max_chars: 1500,
            front_max_index: 15,
            brief_page_chars: 400,
            large_page_chars: 1000,
            toc_density_threshold: 0.1,
            late_page_floor: 10,
            late_default_confidence: 50,
            non_trivial_chars: 100,
        }
    }
}

/// Signature-table page classifier.
#[derive(Debug, Clone)]
pub struct PageClassifier {
    tables: Vec<SignatureTable>,
    extra_terms: Option<Regex>,
    options: ClassifierOptions,
}

impl PageClassifier {
    /// Create a classifier with the built-in tables.
    pub fn new(options: ClassifierOptions) -> Self {
        Self {
            tables: DEFAULT_TABLES.clone(),
            extra_terms: None,
            options,
        }
    }

    /// Add a signature to a category's table.
    ///
    /// Blank and unknown are never scored, so signatures for them are ignored.
    pub fn with_signature(
        mut self,
        category: PageCategory,
        pattern: &str,
        weight: u32,
    ) -> Result<Self> {
        let signature = Signature::new(pattern, weight)?;
        match self.tables.iter_mut().find(|t| t.category == category) {
            Some(table) => table.signatures.push(signature),
            None => log::warn!("Ignoring signature for unscored category {}", category),
        }
        Ok(self)
    }

    /// Count additional domain terms toward main-content density.
    pub fn with_technical_terms(mut self, terms: &[&str]) -> Result<Self> {
        if terms.is_empty() {
            return Ok(self);
        }
        let alternation = terms
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        self.extra_terms = Some(Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))?);
        Ok(self)
    }

    /// Classifier options.
    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    /// Score every category for a page, in table order.
    pub fn scores(
        &self,
        text: &str,
        index: u32,
        printed: Option<&PrintedNumber>,
    ) -> Vec<(PageCategory, u32)> {
        let features = PageFeatures::measure(text, index, printed, self.extra_terms.as_ref());
        self.tables
            .iter()
            .map(|t| (t.category, t.score(&features, &self.options)))
            .collect()
    }

    /// Classify a page.
    ///
    /// `printed` is optional: without a detected number the page is scored on
    /// its text alone.
    pub fn classify(
        &self,
        text: &str,
        index: u32,
        printed: Option<&PrintedNumber>,
    ) -> Classification {
        let char_count = text.trim().chars().count();
        if char_count < self.options.blank_floor {
            return Classification::new(PageCategory::Blank, 100);
        }

        let mut best = (PageCategory::Unknown, 0u32);
        for (category, score) in self.scores(text, index, printed) {
            // Strictly greater keeps the first-declared category on ties.
            if score > best.1 {
                best = (category, score);
            }
        }

        let (category, score) = best;
        log::debug!(
            "Page {}: best category {} with score {}",
            index,
            category,
            score
        );

        if score >= self.options.confidence_floor {
            return Classification::new(category, score.min(100) as u8);
        }

        if index > self.options.late_page_floor && char_count >= self.options.non_trivial_chars {
            return Classification::new(PageCategory::Main, self.options.late_default_confidence);
        }

        Classification::new(PageCategory::Unknown, score.min(100) as u8)
    }
}

impl Default for PageClassifier {
    fn default() -> Self {
        Self::new(ClassifierOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str, index: u32) -> Classification {
        PageClassifier::default().classify(text, index, None)
    }

    #[test]
    fn test_blank_short_circuit() {
        let result = classify("   Table of Contents  ", 2);
        assert_eq!(result.category, PageCategory::Blank);

        // Exactly at the floor is no longer blank.
        let text = "x".repeat(50);
        assert_ne!(classify(&text, 2).category, PageCategory::Blank);
    }

    #[test]
    fn test_title_page() {
        let text = "ACME X100 Power Inverter\nInstallation Manual\n\
            Copyright 2024 Acme Corporation. All rights reserved.\nRevision 2.1";
        let result = classify(text, 1);
        assert_eq!(result.category, PageCategory::Title);
        assert!(result.confidence >= 30);
    }

    #[test]
    fn test_title_not_considered_late() {
        let text = "Copyright 2024 Acme Corporation. All rights reserved. Printed in Canada.";
        let result = classify(text, 8);
        assert_ne!(result.category, PageCategory::Title);
    }

    #[test]
    fn test_toc_page() {
        let text = "Table of Contents\n\
            1 Safety .......... 1\n\
            2 Installation .......... 5\n\
            2.1 Mounting .......... 6\n\
            3 Wiring .......... 9\n\
            4 Operation .......... 14\n\
            5 Maintenance .......... 20\n";
        let result = classify(text, 3);
        assert_eq!(result.category, PageCategory::Toc);
    }

    #[test]
    fn test_preface_page() {
        let text = "Preface\n\nAbout this manual: it explains how the unit is set up \
            and operated by qualified personnel.\n\niii";
        let roman = PrintedNumber::roman("iii", 3);
        let result = PageClassifier::default().classify(text, 3, Some(&roman));
        assert_eq!(result.category, PageCategory::Preface);
    }

    #[test]
    fn test_main_page() {
        let text = "3.2 Connecting the Supply\n\
            WARNING: Disconnect power at the breaker before wiring.\n\
            Step 1 Route the cable through the gland.\n\
            Step 2 Connect the ground wire to terminal PE and tighten to 1.2 Nm.\n\
            The supply voltage must be 240 V at 16 A.";
        let result = classify(text, 14);
        assert_eq!(result.category, PageCategory::Main);
    }

    #[test]
    fn test_unknown_early_page() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod.";
        let result = classify(text, 4);
        assert_eq!(result.category, PageCategory::Unknown);
    }

    #[test]
    fn test_late_page_defaults_to_main() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
            tempor incididunt ut labore et dolore magna aliqua.";
        let result = classify(text, 11);
        assert_eq!(result, Classification::new(PageCategory::Main, 50));
    }

    #[test]
    fn test_glossary_page() {
        let text = "Glossary\n\
            AC: alternating current\n\
            DC: direct current\n\
            GFCI: ground fault circuit interrupter\n\
            PE: protective earth\n\
            RCD: residual current device\n";
        let result = classify(text, 40);
        assert_eq!(result.category, PageCategory::Glossary);
    }

    #[test]
    fn test_appendix_page() {
        let text = "Appendix A Wiring Tables\n\nThe following tables list conductor \
            sizes for each supported installation.";
        let result = classify(text, 60);
        assert_eq!(result.category, PageCategory::Appendix);
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        let classifier = PageClassifier::default()
            .with_signature(PageCategory::Appendix, r"(?i)\bzebra\b", 60)
            .unwrap()
            .with_signature(PageCategory::Glossary, r"(?i)\bzebra\b", 60)
            .unwrap();
        let text = "zebra zebra zebra zebra zebra zebra zebra zebra zebra zebra zebra";
        let result = classifier.classify(text, 30, None);
        assert_eq!(result.category, PageCategory::Appendix);
    }

    #[test]
    fn test_custom_technical_terms() {
        let text = "The nebulizer uses a nebulizer chamber and a nebulizer cup for dosing.";
        let plain = PageClassifier::default().scores(text, 5, None);
        let tuned = PageClassifier::default()
            .with_technical_terms(&["nebulizer"])
            .unwrap()
            .scores(text, 5, None);
        let main = |scores: &[(PageCategory, u32)]| {
            scores
                .iter()
                .find(|(c, _)| *c == PageCategory::Main)
                .map(|(_, s)| *s)
                .unwrap()
        };
        assert_eq!(main(&tuned) - main(&plain), 9);
    }
}
