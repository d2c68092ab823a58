//! Word tokenizer and stem normalizer.

use crate::stem::stem;
use crate::stopwords::is_stop_word;

/// Split text into maximal runs of letters and digits.
///
/// Letters are Unicode-aware (Cyrillic included); everything else is a
/// separator. Empty input yields an empty sequence.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() {
            current.push(c);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Reduce tokens to canonical stems.
///
/// Lowercases, stems, then drops single-character tokens and stopwords.
/// Order and duplicates are preserved so term frequencies stay meaningful.
pub fn normalize(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .map(|t| stem(&t.to_lowercase()))
        .filter(|s| s.chars().count() > 1)
        .filter(|s| !is_stop_word(s))
        .collect()
}

/// Convenience: tokenize and normalize in one pass.
pub fn normalize_text(text: &str) -> Vec<String> {
    normalize(&tokenize(text))
}
