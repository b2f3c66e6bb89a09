//! Context snippets around matches.

/// Cut a snippet of `text` around the byte range `start..end`.
///
/// The window extends `radius` characters on each side, is widened to char
/// boundaries, and has its whitespace collapsed. Ellipses mark truncation.
pub fn snippet(text: &str, start: usize, end: usize, radius: usize) -> String {
    let start = floor_boundary(text, start.min(text.len()));
    let end = floor_boundary(text, end.min(text.len())).max(start);

    let from = text[..start]
        .char_indices()
        .rev()
        .nth(radius.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let from = if radius == 0 { start } else { from };

    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    let mut out = String::new();
    if from > 0 {
        out.push_str("...");
    }
    out.push_str(&collapse_whitespace(&text[from..to]));
    if to < text.len() {
        out.push_str("...");
    }
    out
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_text_when_short() {
        let text = "Connect the  ground\nwire.";
        assert_eq!(snippet(text, 12, 18, 60), "Connect the ground wire.");
    }

    #[test]
    fn test_truncates_both_sides() {
        let text = "aaaaaaaaaa MATCH bbbbbbbbbb";
        let start = text.find("MATCH").unwrap();
        assert_eq!(snippet(text, start, start + 5, 3), "...aa MATCH bb...");
    }

    #[test]
    fn test_multibyte_boundaries() {
        let text = "Überspannung → Schutzleiter prüfen";
        let start = text.find("Schutz").unwrap();
        let out = snippet(text, start, start + "Schutzleiter".len(), 4);
        assert_eq!(out, "...g → Schutzleiter prü...");
    }
}
