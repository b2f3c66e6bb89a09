//! Query parsing.

use super::SearchOptions;
use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};

/// A parsed query with its compiled matchers.
#[derive(Debug, Clone)]
pub struct Query {
    raw: String,
    phrase: Regex,
    tokens: Vec<(String, Regex)>,
    stem: Option<(String, Regex)>,
}

impl Query {
    /// Parse a query string.
    ///
    /// Whitespace inside the phrase matches any run of whitespace, so a
    /// phrase broken across lines in the extracted text still matches.
    pub fn parse(raw: &str, options: &SearchOptions) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyQuery);
        }

        let phrase_pattern = trimmed
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        let phrase = case_insensitive(&phrase_pattern)?;

        let tokens = tokenize(trimmed, options.min_token_len)
            .into_iter()
            .map(|t| {
                let re = case_insensitive(&regex::escape(&t))?;
                Ok((t, re))
            })
            .collect::<Result<Vec<_>>>()?;

        let stem = match partial_stem(trimmed, options.partial_trim, options.min_stem_len) {
            Some(stem) => {
                let re = case_insensitive(&regex::escape(&stem))?;
                Some((stem, re))
            }
            None => None,
        };

        Ok(Self {
            raw: trimmed.to_string(),
            phrase,
            tokens,
            stem,
        })
    }

    /// The query as given, trimmed.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Matcher for the full phrase.
    pub fn phrase(&self) -> &Regex {
        &self.phrase
    }

    /// Distinct tokens with their matchers, in query order.
    pub fn tokens(&self) -> &[(String, Regex)] {
        &self.tokens
    }

    /// Truncated stem of the longest word, if the word is long enough.
    pub fn stem(&self) -> Option<&(String, Regex)> {
        self.stem.as_ref()
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
}

/// Split a query into lower-case tokens of at least `min_len` characters.
///
/// Words mixing digits and letters ("240V") also contribute their digit and
/// letter runs ("240", "v"), since extracted text often separates them.
pub fn tokenize(text: &str, min_len: usize) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut push = |token: String| {
        if token.chars().count() >= min_len && !tokens.contains(&token) {
            tokens.push(token);
        }
    };

    for word in words(text) {
        let word = word.to_lowercase();
        let has_digit = word.chars().any(|c| c.is_numeric());
        let has_alpha = word.chars().any(|c| c.is_alphabetic());
        push(word.clone());
        if has_digit && has_alpha {
            for run in alnum_runs(&word) {
                push(run);
            }
        }
    }
    tokens
}

fn alnum_runs(word: &str) -> Vec<String> {
    let mut runs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_numeric = None;
    for c in word.chars() {
        let numeric = c.is_numeric();
        if current_numeric.is_some_and(|n| n != numeric) {
            runs.push(std::mem::take(&mut current));
        }
        current.push(c);
        current_numeric = Some(numeric);
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Stem of the longest word: up to `trim` trailing characters removed,
/// keeping at least `min_len`. Words shorter than `min_len` have no stem.
pub fn partial_stem(text: &str, trim: usize, min_len: usize) -> Option<String> {
    let longest = words(text).fold(None::<&str>, |best, w| match best {
        Some(b) if b.chars().count() >= w.chars().count() => Some(b),
        _ => Some(w),
    })?;

    let len = longest.chars().count();
    if len < min_len {
        return None;
    }
    let cut = trim.min(len - min_len);
    Some(longest.chars().take(len - cut).collect::<String>().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_filters_short_words() {
        assert_eq!(
            tokenize("How do I ground the inverter?", 3),
            vec!["how", "ground", "the", "inverter"]
        );
    }

    #[test]
    fn test_tokenize_splits_mixed_words() {
        assert_eq!(tokenize("240V supply", 3), vec!["240v", "240", "supply"]);
        assert_eq!(tokenize("M8 bolt", 3), vec!["bolt"]);
    }

    #[test]
    fn test_tokenize_dedups() {
        assert_eq!(tokenize("Fuse fuse FUSE", 3), vec!["fuse"]);
    }

    #[test]
    fn test_partial_stem() {
        assert_eq!(partial_stem("grounded wire", 2, 4), Some("ground".into()));
        assert_eq!(partial_stem("cables", 2, 4), Some("cabl".into()));
        assert_eq!(partial_stem("240V", 2, 4), Some("240v".into()));
        assert_eq!(partial_stem("fan", 2, 4), None);
    }

    #[test]
    fn test_longest_word_first_on_tie() {
        assert_eq!(partial_stem("relay fuses", 2, 4), Some("rela".into()));
    }

    #[test]
    fn test_parse_empty() {
        let options = SearchOptions::default();
        assert!(matches!(Query::parse("   ", &options), Err(Error::EmptyQuery)));
    }

    #[test]
    fn test_phrase_spans_line_breaks() {
        let query = Query::parse("ground  wire", &SearchOptions::default()).unwrap();
        assert!(query.phrase().is_match("Attach the Ground\nWire here"));
        assert!(!query.phrase().is_match("ground-wire"));
    }
}
