//! The ingestion pipeline.

use super::normalize::normalize_text;
use super::IngestOptions;
use crate::classify::PageClassifier;
use crate::detect::detect_page_number;
use crate::error::{Error, Result};
use crate::extract::{ExtractorRegistry, TextExtractor};
use crate::model::{Document, DocumentId, Metadata, Page, PageCategory, TocEntry};
use crate::structure::{extract_toc, numbering_is_monotonic, resolve_content_start};
use rayon::prelude::*;
use std::path::Path;

/// Turns extracted page texts into a structured [`Document`].
///
/// Pages are classified independently, in parallel batches when enabled.
/// Content start and TOC extraction need the whole classified page set and
/// run once every page is done.
#[derive(Debug, Clone)]
pub struct Ingestor {
    options: IngestOptions,
    classifier: PageClassifier,
}

impl Ingestor {
    /// Create an ingestor with the built-in classifier.
    pub fn new(options: IngestOptions) -> Self {
        let classifier = PageClassifier::new(options.classifier.clone());
        Self {
            options,
            classifier,
        }
    }

    /// Use a customized classifier.
    pub fn with_classifier(mut self, classifier: PageClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Ingest options.
    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    /// The page classifier.
    pub fn classifier(&self) -> &PageClassifier {
        &self.classifier
    }

    /// Ingest pages that were already extracted, in reading order.
    pub fn ingest_pages(&self, title: impl Into<String>, texts: Vec<String>) -> Result<Document> {
        self.build(Metadata::new(title), texts)
    }

    /// Extract and ingest raw document bytes.
    pub fn ingest_bytes(
        &self,
        title: impl Into<String>,
        bytes: &[u8],
        extractor: &dyn TextExtractor,
    ) -> Result<Document> {
        let texts = extractor.extract(bytes)?;
        let metadata = Metadata::new(title).with_extractor(extractor.name());
        self.build(metadata, texts)
    }

    /// Extract and ingest a file, picking the extractor by extension.
    ///
    /// The file stem becomes the document title.
    pub fn ingest_file(&self, path: &Path, registry: &ExtractorRegistry) -> Result<Document> {
        let extractor = registry.for_path(path)?;
        self.ingest_file_with(path, extractor.as_ref())
    }

    /// Extract and ingest a file with a specific extractor, ignoring its extension.
    pub fn ingest_file_with(&self, path: &Path, extractor: &dyn TextExtractor) -> Result<Document> {
        let texts = extractor.extract_path(path)?;

        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");
        let mut metadata = Metadata::new(title).with_extractor(extractor.name());
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            metadata = metadata.with_source(name);
        }
        self.build(metadata, texts)
    }

    /// Normalize, number and classify pages.
    ///
    /// Physical indices are assigned from the input order, starting at 1.
    pub fn classify_pages(&self, texts: Vec<String>) -> Vec<Page> {
        let indexed: Vec<(u32, String)> = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| (i as u32 + 1, text))
            .collect();

        if !self.options.parallel || indexed.len() < 2 {
            return indexed
                .into_iter()
                .map(|(index, text)| self.classify_page(index, text))
                .collect();
        }

        let batch_size = match self.options.batch_size {
            0 => indexed.len(),
            n => n,
        };
        let mut pages = Vec::with_capacity(indexed.len());
        let mut remaining = indexed.into_iter();
        loop {
            let batch: Vec<(u32, String)> = remaining.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                break;
            }
            let classified: Vec<Page> = batch
                .into_par_iter()
                .map(|(index, text)| self.classify_page(index, text))
                .collect();
            pages.extend(classified);
        }
        pages
    }

    fn classify_page(&self, index: u32, text: String) -> Page {
        let text = if self.options.normalize {
            normalize_text(&text)
        } else {
            text
        };
        let printed = if self.options.detect_numbers {
            detect_page_number(&text, &self.options.limits)
        } else {
            None
        };
        let classification = self.classifier.classify(&text, index, printed.as_ref());
        Page::new(index, text)
            .with_printed(printed)
            .with_classification(classification)
    }

    fn build(&self, metadata: Metadata, texts: Vec<String>) -> Result<Document> {
        if texts.iter().all(|t| t.trim().is_empty()) {
            return Err(Error::EmptyExtraction);
        }

        let pages = self.classify_pages(texts);

        let start = resolve_content_start(&pages, self.options.substantial_floor);
        let toc: Vec<TocEntry> = pages
            .iter()
            .filter(|p| p.category == PageCategory::Toc)
            .flat_map(|p| extract_toc(&p.text, &self.options.toc))
            .collect();
        if !numbering_is_monotonic(&pages, start.page) {
            log::warn!(
                "Printed numbering in {:?} is not monotonic; page translation may be off",
                metadata.title
            );
        }

        let document = Document::assemble(
            DocumentId::generate(),
            metadata,
            pages,
            start.page,
            start.method,
            toc,
        )?;

        log::info!(
            "Ingested {:?}: {} pages, content starts at page {} ({:?}), {} TOC entries",
            document.title(),
            document.page_count(),
            document.content_start_page(),
            document.start_method(),
            document.toc_entries().len()
        );
        Ok(document)
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new(IngestOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::NumberKind;
    use crate::extract::PlainTextExtractor;
    use crate::structure::StartMethod;

    fn body(n: u32) -> String {
        format!(
            "{n}.1 Wiring\n\
             WARNING: Disconnect power at the breaker before you open the panel.\n\
             Step 1 Route the cable to terminal PE and check the ground wire.\n\
             Step 2 Tighten each screw to 1.2 Nm and verify 240 V at the relay.\n\
             {n}"
        )
    }

    #[test]
    fn test_empty_extraction() {
        let ingestor = Ingestor::default();
        assert!(matches!(
            ingestor.ingest_pages("Empty", Vec::new()),
            Err(Error::EmptyExtraction)
        ));
        assert!(matches!(
            ingestor.ingest_pages("Blank", vec!["  ".into(), "\n".into()]),
            Err(Error::EmptyExtraction)
        ));
    }

    #[test]
    fn test_indices_follow_input_order() {
        let texts: Vec<String> = (1..=20).map(body).collect();
        let options = IngestOptions::default().with_batch_size(3);
        let pages = Ingestor::new(options).classify_pages(texts);
        let indices: Vec<u32> = pages.iter().map(|p| p.index).collect();
        assert_eq!(indices, (1..=20).collect::<Vec<_>>());
        assert_eq!(pages[6].printed.as_ref().map(|n| n.magnitude), Some(7));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let texts: Vec<String> = (1..=12).map(body).collect();
        let parallel = Ingestor::default().classify_pages(texts.clone());
        let sequential = Ingestor::new(IngestOptions::default().sequential()).classify_pages(texts);
        for (a, b) in parallel.iter().zip(&sequential) {
            assert_eq!(a.category, b.category);
            assert_eq!(a.confidence, b.confidence);
            assert_eq!(a.printed, b.printed);
        }
    }

    #[test]
    fn test_number_detection_can_be_disabled() {
        let texts: Vec<String> = (1..=3).map(body).collect();
        let options = IngestOptions::default().without_number_detection();
        let pages = Ingestor::new(options).classify_pages(texts);
        assert!(pages.iter().all(|p| p.printed.is_none()));
        assert!(pages.iter().all(|p| p.category == PageCategory::Main));
    }

    #[test]
    fn test_ingest_pages_page_one() {
        let mut texts = vec![
            "ACME X100 Installation Manual\nCopyright 2024 Acme. All rights reserved.".to_string(),
        ];
        texts.extend((1..=4).map(body));
        let doc = Ingestor::default().ingest_pages("X100", texts).unwrap();
        assert_eq!(doc.pages()[0].category, PageCategory::Title);
        assert_eq!(doc.content_start_page(), 2);
        assert_eq!(doc.start_method(), StartMethod::PageOne);
        assert_eq!(doc.printed_number(5), 4);
    }

    #[test]
    fn test_ingest_bytes_records_extractor() {
        let bytes = format!("{}\x0c{}", body(1), body(2));
        let doc = Ingestor::default()
            .ingest_bytes("Manual", bytes.as_bytes(), &PlainTextExtractor::new())
            .unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.metadata().extractor.as_deref(), Some("plain"));
        assert_eq!(
            doc.pages()[1].printed.as_ref().map(|n| n.kind),
            Some(NumberKind::Arabic)
        );
    }

    #[test]
    fn test_normalizes_ligatures() {
        let text = format!("{}\nRe\u{FB01}t the \u{FB02}ange.", body(1));
        let doc = Ingestor::default().ingest_pages("Manual", vec![text]).unwrap();
        assert!(doc.pages()[0].text.contains("Refit the flange."));
    }
}
