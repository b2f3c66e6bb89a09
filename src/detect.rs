//! Printed page number detection.
//!
//! Manuals print their own page numbers in headers and footers, usually in
//! lower-case Roman numerals for front matter and Arabic numerals for the
//! body. This module finds that number in the extracted text of a page.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Numbering scheme of a printed page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberKind {
    /// i, ii, iii, ...
    Roman,
    /// 1, 2, 3, ...
    Arabic,
}

/// A page number as printed on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintedNumber {
    /// Numbering scheme
    pub kind: NumberKind,
    /// The token exactly as it appears (e.g. "iv")
    pub value: String,
    /// Numeric value of the token
    pub magnitude: u32,
}

impl PrintedNumber {
    /// Create a Roman page number.
    pub fn roman(value: impl Into<String>, magnitude: u32) -> Self {
        Self {
            kind: NumberKind::Roman,
            value: value.into(),
            magnitude,
        }
    }

    /// Create an Arabic page number.
    pub fn arabic(magnitude: u32) -> Self {
        Self {
            kind: NumberKind::Arabic,
            value: magnitude.to_string(),
            magnitude,
        }
    }

    /// Check if this is a Roman page number.
    pub fn is_roman(&self) -> bool {
        self.kind == NumberKind::Roman
    }

    /// Check if this is an Arabic page number.
    pub fn is_arabic(&self) -> bool {
        self.kind == NumberKind::Arabic
    }
}

impl std::fmt::Display for PrintedNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Bounds applied to detected page numbers.
///
/// The ceilings are empirical: Roman numbering rarely runs past the front
/// matter, and Arabic numbers past a couple of thousand are usually years or
/// part numbers rather than pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberingLimits {
    /// Largest accepted Roman magnitude
    pub roman_ceiling: u32,
    /// Longest accepted Roman token
    pub roman_max_len: usize,
    /// Arabic numbers must be strictly below this
    pub arabic_ceiling: u32,
    /// Number of non-empty lines inspected at the top and bottom of a page
    pub edge_lines: usize,
}

impl NumberingLimits {
    /// Create limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Roman ceiling.
    pub fn with_roman_ceiling(mut self, ceiling: u32) -> Self {
        self.roman_ceiling = ceiling;
        self
    }

    /// Set the Arabic ceiling.
    pub fn with_arabic_ceiling(mut self, ceiling: u32) -> Self {
        self.arabic_ceiling = ceiling;
        self
    }

    /// Set how many lines at each page edge are inspected.
    pub fn with_edge_lines(mut self, lines: usize) -> Self {
        self.edge_lines = lines.max(1);
        self
    }
}

impl Default for NumberingLimits {
    fn default() -> Self {
        Self {
            roman_ceiling: 30,
            roman_max_len: 4,
            arabic_ceiling: 2000,
            edge_lines: 3,
        }
    }
}

// Positional patterns, most specific placement first: a token alone on a
// line, a token wrapped in dashes or brackets, then "Page N".
static ROMAN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)^([ivxlcdm]+)$",
        r"(?i)^[-–—\[(]\s*([ivxlcdm]+)\s*[-–—\])]$",
        r"(?i)(?:^|\s)(?:page|pg\.?)\s*([ivxlcdm]+)(?:\s+of\s+\w+)?$",
    ])
});

static ARABIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"^(\d{1,5})$",
        r"^[-–—\[(]\s*(\d{1,5})\s*[-–—\])]$",
        r"(?i)(?:^|\s)(?:page|pg\.?)\s*(\d{1,5})(?:\s+of\s+\d+)?$",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("static page number pattern"))
        .collect()
}

/// Detect the printed page number of a page.
///
/// Only the first and last few non-empty lines are inspected. Roman patterns
/// are tried before Arabic ones and the first accepted match wins.
///
/// # Example
///
/// ```
/// use pagewise::detect::{detect_page_number, NumberKind, NumberingLimits};
///
/// let text = "Preface\n\nThis manual describes the unit.\n\n- iv -";
/// let number = detect_page_number(text, &NumberingLimits::default()).unwrap();
/// assert_eq!(number.kind, NumberKind::Roman);
/// assert_eq!(number.magnitude, 4);
/// ```
pub fn detect_page_number(text: &str, limits: &NumberingLimits) -> Option<PrintedNumber> {
    let candidates = edge_lines(text, limits.edge_lines);
    if candidates.is_empty() {
        return None;
    }

    for pattern in ROMAN_PATTERNS.iter() {
        for line in &candidates {
            let Some(token) = pattern.captures(line).and_then(|c| c.get(1)) else {
                continue;
            };
            let token = token.as_str();
            if token.len() > limits.roman_max_len {
                continue;
            }
            match roman_to_arabic(token) {
                Some(n) if n >= 1 && n <= limits.roman_ceiling => {
                    return Some(PrintedNumber::roman(token.to_lowercase(), n));
                }
                _ => continue,
            }
        }
    }

    for pattern in ARABIC_PATTERNS.iter() {
        for line in &candidates {
            let Some(token) = pattern.captures(line).and_then(|c| c.get(1)) else {
                continue;
            };
            match token.as_str().parse::<u32>() {
                Ok(n) if n > 0 && n < limits.arabic_ceiling => {
                    return Some(PrintedNumber::arabic(n));
                }
                _ => continue,
            }
        }
    }

    None
}

/// Collect the bottom and top edge lines of a page, bottom first.
fn edge_lines(text: &str, count: usize) -> Vec<&str> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() <= count * 2 {
        let mut all = lines;
        all.reverse();
        return all;
    }

    let mut edges: Vec<&str> = lines[lines.len() - count..].iter().rev().copied().collect();
    edges.extend_from_slice(&lines[..count]);
    edges
}

/// Convert a Roman numeral to its value.
///
/// Scans right to left, subtracting a digit whose value is below the largest
/// seen so far. Returns `None` for an empty token or any non-numeral character.
pub fn roman_to_arabic(token: &str) -> Option<u32> {
    if token.is_empty() {
        return None;
    }

    let mut total: u32 = 0;
    let mut max_seen: u32 = 0;
    for c in token.chars().rev() {
        let value = match c.to_ascii_lowercase() {
            'i' => 1,
            'v' => 5,
            'x' => 10,
            'l' => 50,
            'c' => 100,
            'd' => 500,
            'm' => 1000,
            _ => return None,
        };
        if value < max_seen {
            total = total.checked_sub(value)?;
        } else {
            total += value;
            max_seen = value;
        }
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Option<PrintedNumber> {
        detect_page_number(text, &NumberingLimits::default())
    }

    #[test]
    fn test_roman_to_arabic() {
        assert_eq!(roman_to_arabic("i"), Some(1));
        assert_eq!(roman_to_arabic("iv"), Some(4));
        assert_eq!(roman_to_arabic("IX"), Some(9));
        assert_eq!(roman_to_arabic("xiv"), Some(14));
        assert_eq!(roman_to_arabic("xxix"), Some(29));
        assert_eq!(roman_to_arabic("MCMXCIX"), Some(1999));
    }

    #[test]
    fn test_roman_rejects_non_numerals() {
        assert_eq!(roman_to_arabic(""), None);
        assert_eq!(roman_to_arabic("ivy"), None);
        assert_eq!(roman_to_arabic("page"), None);
        assert_eq!(roman_to_arabic("x1"), None);
    }

    #[test]
    fn test_detect_bare_roman_footer() {
        let number = detect("Foreword\n\nSome text about the product.\n\niii").unwrap();
        assert_eq!(number, PrintedNumber::roman("iii", 3));
    }

    #[test]
    fn test_detect_wrapped_arabic() {
        let number = detect("Installation\n\nMount the bracket.\n\n- 12 -").unwrap();
        assert_eq!(number, PrintedNumber::arabic(12));

        let number = detect("[7]\nWiring\nConnect the harness.").unwrap();
        assert_eq!(number.magnitude, 7);
    }

    #[test]
    fn test_detect_page_prefix() {
        let number = detect("Maintenance\nReplace the filter.\nX100 Service Manual   Page 42").unwrap();
        assert_eq!(number, PrintedNumber::arabic(42));

        let number = detect("Contents\nPage 3 of 120").unwrap();
        assert_eq!(number.magnitude, 3);

        let number = detect("Preface\nPg. ii").unwrap();
        assert!(number.is_roman());
        assert_eq!(number.magnitude, 2);
    }

    #[test]
    fn test_roman_tried_before_arabic() {
        let number = detect("14\nIntroduction\nvi").unwrap();
        assert!(number.is_roman());
        assert_eq!(number.magnitude, 6);
    }

    #[test]
    fn test_roman_ceiling() {
        // "xl" is 40, above the front matter ceiling; falls through to Arabic.
        let number = detect("Chapter text\nxl\n5");
        assert_eq!(number, Some(PrintedNumber::arabic(5)));

        // "mid" would be 1499 and is too long a number for front matter.
        assert!(detect("Heading\nmid").is_none());
    }

    #[test]
    fn test_arabic_ceiling_rejects_years() {
        assert!(detect("Copyright notice\n2023").is_none());
        assert!(detect("Header\n0").is_none());
    }

    #[test]
    fn test_middle_lines_are_ignored() {
        let text = "Line one\nLine two\nLine three\n17\nLine five\nLine six\nLine seven";
        assert!(detect(text).is_none());
    }

    #[test]
    fn test_custom_limits() {
        let limits = NumberingLimits::new().with_roman_ceiling(50);
        let number = detect_page_number("Body\nxl", &limits).unwrap();
        assert_eq!(number.magnitude, 40);

        let limits = NumberingLimits::new().with_arabic_ceiling(100);
        assert!(detect_page_number("Body\n150", &limits).is_none());
    }

    #[test]
    fn test_empty_page() {
        assert!(detect("").is_none());
        assert!(detect("   \n  \n").is_none());
    }
}
