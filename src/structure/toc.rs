//! Table of contents extraction.

use crate::model::TocEntry;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Limits applied to parsed TOC entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocOptions {
    /// Entries must point below this page
    pub max_page: u32,
    /// Entries need a title of at least this many characters
    pub min_title_len: usize,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            max_page: 500,
            min_title_len: 3,
        }
    }
}

/// Separator between a title and its page: dot leaders or plain spacing.
const SEP: &str = r"(?:\s*[.·…]{2,}\s*|\s+)";

#[derive(Debug, Clone, Copy)]
enum LineShape {
    NumberedSection,
    Chapter,
    LetteredSection,
    DottedLeader,
    Generic,
}

static LINE_SHAPES: LazyLock<Vec<(LineShape, Regex)>> = LazyLock::new(|| {
    let shapes = [
        (
            LineShape::NumberedSection,
            format!(r"^(\d+(?:\.\d+)*)\.?\s+(.+?){SEP}(\d{{1,4}})$"),
        ),
        (
            LineShape::Chapter,
            format!(r"(?i)^chapter\s+(\d+|[ivxlcdm]+)\b\s*[:.\-–]?\s*(.+?){SEP}(\d{{1,4}})$"),
        ),
        (
            LineShape::LetteredSection,
            format!(r"(?i)^section\s+([a-z])\b\s*[:.\-–]?\s*(.+?){SEP}(\d{{1,4}})$"),
        ),
        (
            LineShape::DottedLeader,
            r"^(.+?)\s*[.·…]{2,}\s*(\d{1,4})$".to_string(),
        ),
        (LineShape::Generic, r"^(.+?)\s+(\d{1,4})$".to_string()),
    ];
    shapes
        .into_iter()
        .map(|(shape, pattern)| (shape, Regex::new(&pattern).expect("static TOC pattern")))
        .collect()
});

/// Parse table of contents text into entries.
///
/// Lines are matched against shapes from most to least specific and the
/// first shape that matches decides the entry. Lines matching no shape are
/// skipped, as are entries with an implausible page or a too-short title.
pub fn extract_toc(text: &str, options: &TocOptions) -> Vec<TocEntry> {
    let mut entries = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.chars().count() < 3 {
            continue;
        }

        let Some(entry) = LINE_SHAPES
            .iter()
            .find_map(|(shape, re)| re.captures(line).map(|caps| parse_entry(*shape, &caps)))
        else {
            continue;
        };

        let Some(entry) = entry else {
            continue;
        };

        if entry.page == 0 || entry.page >= options.max_page {
            log::debug!("Dropping TOC entry {:?}: page out of range", entry.title);
            continue;
        }
        if entry.title.chars().count() < options.min_title_len {
            continue;
        }
        if is_page_label(&entry.title) {
            log::debug!("Dropping TOC entry {:?}: page label", entry.title);
            continue;
        }
        entries.push(entry);
    }

    entries
}

/// A running header or footer such as "Page 2" or "Pg. 4".
fn is_page_label(title: &str) -> bool {
    let word = title.trim_end_matches('.').to_lowercase();
    word == "page" || word == "pg"
}

fn parse_entry(shape: LineShape, caps: &Captures<'_>) -> Option<TocEntry> {
    let group = |i: usize| caps.get(i).map(|m| m.as_str());

    let (section, title, page) = match shape {
        LineShape::NumberedSection => (Some(group(1)?.to_string()), group(2)?, group(3)?),
        LineShape::Chapter => (Some(format!("Chapter {}", group(1)?)), group(2)?, group(3)?),
        LineShape::LetteredSection => (
            Some(format!("Section {}", group(1)?.to_uppercase())),
            group(2)?,
            group(3)?,
        ),
        LineShape::DottedLeader | LineShape::Generic => (None, group(1)?, group(2)?),
    };

    let title = title
        .trim_end_matches(|c: char| c == '.' || c == '·' || c == '…' || c.is_whitespace())
        .trim();
    Some(TocEntry::new(section, title, page.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<TocEntry> {
        extract_toc(text, &TocOptions::default())
    }

    #[test]
    fn test_numbered_section_with_leaders() {
        let entries = extract("1.1 Grounding Requirements .......... 23");
        assert_eq!(
            entries,
            vec![TocEntry::new(
                Some("1.1".into()),
                "Grounding Requirements",
                23
            )]
        );
    }

    #[test]
    fn test_chapter_and_section_lines() {
        let entries = extract("Chapter 2: Installation 14\nSection b - Wiring Tables ..... 88");
        assert_eq!(entries[0].section.as_deref(), Some("Chapter 2"));
        assert_eq!(entries[0].title, "Installation");
        assert_eq!(entries[0].page, 14);
        assert_eq!(entries[1].section.as_deref(), Some("Section B"));
        assert_eq!(entries[1].title, "Wiring Tables");
        assert_eq!(entries[1].page, 88);
    }

    #[test]
    fn test_dotted_and_generic_lines() {
        let entries = extract("Safety Instructions.....3\nTroubleshooting   41");
        assert_eq!(entries[0], TocEntry::new(None, "Safety Instructions", 3));
        assert_eq!(entries[1], TocEntry::new(None, "Troubleshooting", 41));
    }

    #[test]
    fn test_rejects_out_of_range_pages() {
        let entries = extract("Index 0\nRevision History 500\nWarranty 1999\nSpecifications 499");
        assert_eq!(entries, vec![TocEntry::new(None, "Specifications", 499)]);
    }

    #[test]
    fn test_skips_noise() {
        let text = "Contents\n\nii\nAB 4\n2 Use\n\n3.4 Fuses ........ 61";
        let entries = extract(text);
        assert_eq!(entries, vec![TocEntry::new(Some("3.4".into()), "Fuses", 61)]);
    }

    #[test]
    fn test_skips_page_footers() {
        let text = "3.4 Fuses ........ 61\nPage 2\nPG. 3\nPage Layout ..... 12";
        let entries = extract(text);
        assert_eq!(
            entries,
            vec![
                TocEntry::new(Some("3.4".into()), "Fuses", 61),
                TocEntry::new(None, "Page Layout", 12),
            ]
        );
    }

    #[test]
    fn test_custom_limits() {
        let options = TocOptions {
            max_page: 1000,
            min_title_len: 3,
        };
        let entries = extract_toc("Parts Catalogue ........ 740", &options);
        assert_eq!(entries.len(), 1);
    }
}
