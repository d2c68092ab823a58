//! Fixed suffix-stripping stemmer for Russian.
//!
//! A lightweight reduction table, not a full Snowball implementation: it
//! strips one inflectional suffix (longest match first) and keeps at least
//! [`MIN_STEM_CHARS`] characters of the stem. That is enough to collapse the
//! noun/adjective inflections that dominate catalog and taxonomy text
//! ("тормозные"/"тормозной" -> "тормозн", "системы"/"система" -> "систем").

/// Minimum number of characters a stem must keep after stripping.
pub const MIN_STEM_CHARS: usize = 3;

/// Inflectional suffixes, ordered longest first so that e.g. "ости" is
/// tried before "и".
const SUFFIXES: &[&str] = &[
    // 4 chars
    "иями", "ости", "ость",
    // 3 chars
    "ями", "ами", "ого", "его", "ому", "ему", "ыми", "ими", "иях", "иям",
    "ией", "ием",
    // 2 chars
    "ый", "ий", "ой", "ая", "яя", "ую", "юю", "ое", "ее", "ые", "ие", "ых",
    "их", "ом", "ем", "ам", "ям", "ах", "ях", "ов", "ев", "ей", "ия", "ью",
    // 1 char
    "а", "я", "о", "е", "и", "ы", "у", "ю", "ь", "й",
];

/// Reduce a lowercase word to its stem.
///
/// Strips the first (longest) matching suffix that leaves at least
/// [`MIN_STEM_CHARS`] characters; words with no such suffix are returned
/// unchanged.
pub fn stem(word: &str) -> String {
    let char_count = word.chars().count();
    for suffix in SUFFIXES {
        let suffix_chars = suffix.chars().count();
        if char_count >= suffix_chars + MIN_STEM_CHARS && word.ends_with(suffix) {
            return word[..word.len() - suffix.len()].to_string();
        }
    }
    word.to_string()
}
