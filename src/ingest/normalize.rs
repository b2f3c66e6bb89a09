//! Page text normalization.

use unicode_normalization::UnicodeNormalization;

const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// Normalize extracted page text to NFC, fold typographic ligatures and
/// unify line endings.
///
/// Extractors often emit "ﬁ" for "fi", which would otherwise break both the
/// classifier's keyword signatures and query matching.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfc() {
        match LIGATURES.iter().find(|(lig, _)| *lig == c) {
            Some((_, replacement)) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    if out.contains('\r') {
        out = out.replace("\r\n", "\n").replace('\r', "\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ligatures() {
        assert_eq!(normalize_text("con\u{FB01}guration"), "configuration");
        assert_eq!(normalize_text("\u{FB02}ow \u{FB03}x"), "flow ffix");
    }

    #[test]
    fn test_nfc() {
        // e + combining acute
        assert_eq!(normalize_text("Re\u{0301}sume\u{0301}"), "Résumé");
    }

    #[test]
    fn test_line_endings() {
        assert_eq!(normalize_text("a\r\nb\rc"), "a\nb\nc");
    }
}
