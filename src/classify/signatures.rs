//! Category signature tables.
//!
//! Each category is described by data: a gate deciding whether the category
//! is considered at all for a page, weighted trigger patterns, and a layout
//! bonus computed from page features. Extending the classifier with a new
//! domain vocabulary means adding rows, not branches.

use super::ClassifierOptions;
use crate::detect::{NumberKind, PrintedNumber};
use crate::error::Result;
use crate::model::PageCategory;
use regex::Regex;
use std::sync::LazyLock;

/// A weighted trigger pattern.
#[derive(Debug, Clone)]
pub struct Signature {
    pattern: Regex,
    weight: u32,
}

impl Signature {
    /// Compile a signature.
    pub fn new(pattern: &str, weight: u32) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            weight,
        })
    }

    /// Weight contributed when the pattern matches.
    pub fn weight(&self) -> u32 {
        self.weight
    }

    fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Condition under which a category is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Always evaluated
    Always,
    /// Only early, short pages
    TitleWindow,
    /// Only pages within the front matter window
    FrontWindow,
}

/// Layout bonus applied on top of signature weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bonus {
    /// No bonus
    None,
    /// Very short pages look like covers
    Brevity,
    /// Page-reference density, dotted leaders, number-terminated lines
    TocLayout,
    /// Technical vocabulary density and page length
    TechnicalDensity,
    /// Many "term: definition" lines
    DefinitionList,
}

/// Signatures for one category.
#[derive(Debug, Clone)]
pub struct SignatureTable {
    /// Category scored by this table
    pub category: PageCategory,
    /// When the table applies
    pub gate: Gate,
    /// Weighted trigger patterns
    pub signatures: Vec<Signature>,
    /// Layout bonus
    pub bonus: Bonus,
    /// Bonus for a detected printed number of the given kind
    pub number_bonus: Option<(NumberKind, u32)>,
}

impl SignatureTable {
    fn build(
        category: PageCategory,
        gate: Gate,
        rows: &[(&str, u32)],
        bonus: Bonus,
        number_bonus: Option<(NumberKind, u32)>,
    ) -> Result<Self> {
        let signatures = rows
            .iter()
            .map(|(pattern, weight)| Signature::new(pattern, *weight))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            category,
            gate,
            signatures,
            bonus,
            number_bonus,
        })
    }

    /// Score a page against this table. Returns 0 when the gate is closed.
    pub(crate) fn score(&self, features: &PageFeatures<'_>, options: &ClassifierOptions) -> u32 {
        let open = match self.gate {
            Gate::Always => true,
            Gate::TitleWindow => {
                features.index <= options.title_max_index
                    && features.char_count <= options.title_max_chars
            }
            Gate::FrontWindow => features.index <= options.front_max_index,
        };
        if !open {
            return 0;
        }

        let mut score: u32 = self
            .signatures
            .iter()
            .filter(|s| s.matches(features.text))
            .map(Signature::weight)
            .sum();

        score += match self.bonus {
            Bonus::None => 0,
            Bonus::Brevity => {
                if features.char_count < options.brief_page_chars {
                    10
                } else {
                    0
                }
            }
            Bonus::TocLayout => toc_layout_bonus(features, options),
            Bonus::TechnicalDensity => {
                let density = (features.technical_terms as u32 * 3).min(30);
                let length = if features.char_count > options.large_page_chars {
                    15
                } else {
                    0
                };
                density + length
            }
            Bonus::DefinitionList => {
                if features.definition_lines >= 5 {
                    20
                } else {
                    0
                }
            }
        };

        if let (Some((kind, weight)), Some(printed)) = (self.number_bonus, features.printed) {
            if printed.kind == kind {
                score += weight;
            }
        }

        score
    }
}

fn toc_layout_bonus(features: &PageFeatures<'_>, options: &ClassifierOptions) -> u32 {
    let mut bonus = 0;
    if features.tokens >= 10 {
        let density = features.numeric_tokens as f32 / features.tokens as f32;
        if density >= options.toc_density_threshold {
            bonus += 20;
        }
    }
    bonus += match features.dotted_leaders {
        0 => 0,
        1 => 10,
        _ => 25,
    };
    if features.number_terminated_lines >= 5 {
        bonus += 25;
    }
    bonus
}

/// The built-in tables in declaration order. Ties resolve to the earlier table.
pub fn default_tables() -> Result<Vec<SignatureTable>> {
    Ok(vec![
        SignatureTable::build(
            PageCategory::Title,
            Gate::TitleWindow,
            &[
                (r"(?i)copyright|©|\(c\)\s*\d{4}", 25),
                (r"(?i)all rights reserved", 25),
                (
                    r"(?i)\b(?:user|owner'?s|operator'?s|service|installation|maintenance|technical|reference|instruction)\s+(?:manual|guide|handbook)\b",
                    20,
                ),
                (r"(?i)\bisbn\b|\bpublished by\b|\bprinted in\b", 15),
                (r"(?i)\b(?:edition|revision|rev\.|version)\s*[\d.]+", 15),
                (r"(?i)\b(?:model|part)\s*(?:no\.?|number|#)", 10),
            ],
            Bonus::Brevity,
            None,
        )?,
        SignatureTable::build(
            PageCategory::Toc,
            Gate::Always,
            &[
                (r"(?im)^\s*(?:table\s+of\s+)?contents\s*$", 40),
                (r"(?i)\btable of contents\b", 20),
            ],
            Bonus::TocLayout,
            None,
        )?,
        SignatureTable::build(
            PageCategory::Preface,
            Gate::FrontWindow,
            &[
                (r"(?im)^\s*(?:preface|foreword)\b", 40),
                (r"(?i)\b(?:preface|foreword)\b", 20),
                (r"(?i)\babout this (?:manual|guide|book|document)\b", 25),
                (r"(?i)\bhow to use this (?:manual|guide|book)\b", 25),
                (r"(?i)\backnowledge?ments?\b", 20),
                (
                    r"(?i)\b(?:conventions used|intended audience|typographic conventions)\b",
                    20,
                ),
            ],
            Bonus::None,
            Some((NumberKind::Roman, 15)),
        )?,
        SignatureTable::build(
            PageCategory::Main,
            Gate::Always,
            &[
                (r"(?im)^\s*chapter\s+\d+", 15),
                (r"(?m)^\s*\d+(?:\.\d+)+\s+[A-Z]", 15),
                (
                    r"(?i)\b(?:step\s+\d+|procedure|figure\s+\d+|table\s+\d+|fig\.\s*\d+)",
                    15,
                ),
                (r"(?i)\b(?:warning|caution|danger|note)\s*[:!]", 15),
            ],
            Bonus::TechnicalDensity,
            Some((NumberKind::Arabic, 10)),
        )?,
        SignatureTable::build(
            PageCategory::Appendix,
            Gate::Always,
            &[
                (r"(?im)^\s*(?:appendix|annex)\s+[a-z0-9]\b", 40),
                (r"(?i)\b(?:appendix|annex)\b", 20),
                (
                    r"(?i)\b(?:supplementary information|revision history|warranty information)\b",
                    15,
                ),
            ],
            Bonus::None,
            None,
        )?,
        SignatureTable::build(
            PageCategory::Glossary,
            Gate::Always,
            &[
                (r"(?im)^\s*(?:glossary|definitions|abbreviations|acronyms)\b", 40),
                (
                    r"(?i)\b(?:glossary|terms and definitions|list of abbreviations)\b",
                    20,
                ),
            ],
            Bonus::DefinitionList,
            None,
        )?,
    ])
}

static TECHNICAL_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:voltage|current|circuit|wiring|wire|ground(?:ing)?|terminal|breaker|fuse|motor|sensor|valve|pump|torque|pressure|temperature|install(?:ation)?|calibrat\w*|connector|cable|panel|switch|relay|power|battery|bolt|screw|assembly|component|signal|controller|firmware|configur\w*|parameter|maintenance|inspect\w*|replac\w*)\b",
    )
    .expect("static technical term pattern")
});

static UNIT_VALUES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d+(?:\.\d+)?\s?(?:vac|vdc|v|ma|a|kw|w|khz|hz|mm|cm|kg|lb|psi|bar|nm|rpm|°c|°f)\b",
    )
    .expect("static unit pattern")
});

static DOTTED_LEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{4,}\s*\d+").expect("static leader pattern"));

static NUMBER_TERMINATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S\s+\d{1,3}\s*$").expect("static line pattern"));

static DEFINITION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][\w /()-]{0,40}?\s*(?::|\s[-–—]\s)\s*\S").expect("static definition pattern")
});

/// Measurements of a page used by the bonuses.
#[derive(Debug, Clone)]
pub(crate) struct PageFeatures<'a> {
    pub text: &'a str,
    pub index: u32,
    pub char_count: usize,
    pub printed: Option<&'a PrintedNumber>,
    pub tokens: usize,
    pub numeric_tokens: usize,
    pub dotted_leaders: usize,
    pub number_terminated_lines: usize,
    pub definition_lines: usize,
    pub technical_terms: usize,
}

impl<'a> PageFeatures<'a> {
    pub(crate) fn measure(
        text: &'a str,
        index: u32,
        printed: Option<&'a PrintedNumber>,
        extra_terms: Option<&Regex>,
    ) -> Self {
        let mut tokens = 0;
        let mut numeric_tokens = 0;
        for token in text.split_whitespace() {
            tokens += 1;
            let digits = token.trim_matches(|c: char| !c.is_ascii_digit());
            if !digits.is_empty()
                && digits.len() <= 3
                && token.chars().all(|c| c.is_ascii_digit() || c == '.')
            {
                numeric_tokens += 1;
            }
        }

        let mut number_terminated_lines = 0;
        let mut definition_lines = 0;
        for line in text.lines().map(str::trim) {
            if NUMBER_TERMINATED.is_match(line) {
                number_terminated_lines += 1;
            }
            if DEFINITION_LINE.is_match(line) {
                definition_lines += 1;
            }
        }

        let mut technical_terms =
            TECHNICAL_TERMS.find_iter(text).count() + UNIT_VALUES.find_iter(text).count();
        if let Some(extra) = extra_terms {
            technical_terms += extra.find_iter(text).count();
        }

        Self {
            text,
            index,
            char_count: text.trim().chars().count(),
            printed,
            tokens,
            numeric_tokens,
            dotted_leaders: DOTTED_LEADER.find_iter(text).count(),
            number_terminated_lines,
            definition_lines,
            technical_terms,
        }
    }
}
