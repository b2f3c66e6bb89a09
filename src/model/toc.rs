//! Table of contents entries.

use crate::offset::PageOffset;
use serde::{Deserialize, Serialize};

/// A single entry parsed from the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Section label ("1.1", "Chapter 3", "Section A")
    pub section: Option<String>,

    /// Entry title
    pub title: String,

    /// Printed page number the entry points to
    pub page: u32,
}

impl TocEntry {
    /// Create a new entry.
    pub fn new(section: Option<String>, title: impl Into<String>, page: u32) -> Self {
        Self {
            section,
            title: title.into(),
            page,
        }
    }

    /// Physical page index the entry points to.
    pub fn physical_page(&self, offset: &PageOffset) -> i32 {
        offset.to_physical(self.page as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_page() {
        let entry = TocEntry::new(Some("1.1".into()), "Grounding Requirements", 23);
        let offset = PageOffset::new(5);
        assert_eq!(entry.physical_page(&offset), 27);
    }
}
