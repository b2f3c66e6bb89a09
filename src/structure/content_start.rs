//! Content start resolution.

use crate::model::{Page, PageCategory};
use serde::{Deserialize, Serialize};

/// Which rule located the start of the main content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartMethod {
    /// A page carries the printed Arabic number 1
    PageOne,
    /// Roman front matter numbering switches to Arabic
    NumberingTransition,
    /// First page classified as main content
    FirstMainPage,
    /// First substantial page that is not front matter
    SubstantialContent,
    /// Nothing matched; the first page is used
    Default,
    /// Supplied by the caller
    Explicit,
}

/// Resolved start of the main content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStart {
    /// Physical page index (1-indexed)
    pub page: u32,
    /// Rule that produced the page
    pub method: StartMethod,
}

/// Find the physical page where the main content begins.
///
/// Rules are tried from the strongest signal to the weakest: the document
/// declaring its own page 1, a Roman-to-Arabic numbering switch, the
/// classifier's first main page, the first substantial non-front-matter
/// page, and finally page 1.
pub fn resolve_content_start(pages: &[Page], substantial_floor: usize) -> ContentStart {
    let found = |page: u32, method: StartMethod| {
        log::debug!("Content starts at page {} ({:?})", page, method);
        ContentStart { page, method }
    };

    if let Some(page) = pages
        .iter()
        .find(|p| p.printed.as_ref().is_some_and(|n| n.is_arabic() && n.magnitude == 1))
    {
        return found(page.index, StartMethod::PageOne);
    }

    let last_roman = pages
        .iter()
        .rev()
        .find(|p| p.printed.as_ref().is_some_and(|n| n.is_roman()));
    if let Some(roman) = last_roman {
        let first_arabic = pages
            .iter()
            .filter(|p| p.index > roman.index)
            .find(|p| p.printed.as_ref().is_some_and(|n| n.is_arabic()));
        if let Some(arabic) = first_arabic {
            return found(arabic.index, StartMethod::NumberingTransition);
        }
    }

    if let Some(page) = pages.iter().find(|p| p.category == PageCategory::Main) {
        return found(page.index, StartMethod::FirstMainPage);
    }

    if let Some(page) = pages.iter().find(|p| {
        !p.category.is_front_matter() && !p.is_blank() && p.char_count > substantial_floor
    }) {
        return found(page.index, StartMethod::SubstantialContent);
    }

    found(1, StartMethod::Default)
}

/// Check that printed Arabic numbers never decrease after the content start.
///
/// This is a sanity signal only; documents that fail it are still usable.
pub fn numbering_is_monotonic(pages: &[Page], content_start: u32) -> bool {
    let mut previous: Option<u32> = None;
    for page in pages.iter().filter(|p| p.index >= content_start) {
        let Some(number) = page.printed.as_ref().filter(|n| n.is_arabic()) else {
            continue;
        };
        if let Some(prev) = previous {
            if number.magnitude < prev {
                log::warn!(
                    "Printed page {} on physical page {} follows printed page {}",
                    number.magnitude,
                    page.index,
                    prev
                );
                return false;
            }
        }
        previous = Some(number.magnitude);
    }
    true
}
