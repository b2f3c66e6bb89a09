//! Translation between physical page indices and printed page numbers.
//!
//! Storage and retrieval work with physical indices (position in the
//! extracted page sequence). Readers name pages by the number printed on
//! them. Every value crossing that boundary goes through [`PageOffset`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Linear map between physical and printed page numbers.
///
/// With content starting at physical page `s`, the offset is `-(s - 1)`:
/// physical page `s` is printed page 1 and front matter maps to zero or
/// negative numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOffset {
    content_start: u32,
}

impl PageOffset {
    /// Create a translator for the given content start page.
    ///
    /// A start page of 0 is treated as 1.
    pub fn new(content_start: u32) -> Self {
        Self {
            content_start: content_start.max(1),
        }
    }

    /// Create a translator, checking the start page against the page count.
    pub fn checked(content_start: u32, page_count: u32) -> Result<Self> {
        if content_start == 0 || content_start > page_count {
            return Err(Error::InvalidContentStart(content_start, page_count));
        }
        Ok(Self { content_start })
    }

    /// Physical index of printed page 1.
    pub fn content_start(&self) -> u32 {
        self.content_start
    }

    /// The signed offset added to a physical index.
    pub fn offset(&self) -> i32 {
        -(self.content_start as i32 - 1)
    }

    /// Printed page number for a physical index.
    pub fn to_printed(&self, physical: u32) -> i32 {
        physical as i32 + self.offset()
    }

    /// Physical index for a printed page number.
    pub fn to_physical(&self, printed: i32) -> i32 {
        printed - self.offset()
    }
}

impl Default for PageOffset {
    fn default() -> Self {
        Self::new(1)
    }
}
