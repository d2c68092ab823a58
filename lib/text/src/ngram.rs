//! Character n-gram generator for the sub-word similarity axis.

use std::ops::RangeInclusive;

/// Default n-gram lengths.
pub const DEFAULT_NGRAM_RANGE: RangeInclusive<usize> = 3..=5;

/// Emit every contiguous character substring of length `n` for each `n` in
/// `range`, as one flat, order- and duplicate-preserving sequence.
///
/// The input is lowercased, characters outside letters/digits/space are
/// stripped, and whitespace runs collapse to a single space before windows
/// are taken.
pub fn char_ngrams(text: &str, range: RangeInclusive<usize>) -> Vec<String> {
    let cleaned = clean(text);
    let chars: Vec<char> = cleaned.chars().collect();
    let mut grams = Vec::new();
    for n in range {
        if n == 0 || chars.len() < n {
            continue;
        }
        for window in chars.windows(n) {
            grams.push(window.iter().collect());
        }
    }
    grams
}

fn clean(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = true;
    for c in text.to_lowercase().chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else if c.is_alphanumeric() {
            out.push(c);
            last_was_space = false;
        }
        // anything else is stripped
    }
    if out.ends_with(' ') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigram_windows() {
        let grams = char_ngrams("abcd", 3..=3);
        assert_eq!(grams, vec!["abc", "bcd"]);
    }

    #[test]
    fn test_range_is_flattened_in_order() {
        let grams = char_ngrams("abcd", 3..=4);
        assert_eq!(grams, vec!["abc", "bcd", "abcd"]);
    }

    #[test]
    fn test_cleaning_lowercases_and_collapses() {
        let grams = char_ngrams("AB  -  cd", 3..=3);
        // cleaned form is "ab cd"
        assert_eq!(grams, vec!["ab ", "b c", " cd"]);
    }

    #[test]
    fn test_short_input_yields_nothing() {
        assert!(char_ngrams("ab", 3..=5).is_empty());
        assert!(char_ngrams("", DEFAULT_NGRAM_RANGE).is_empty());
    }

    #[test]
    fn test_duplicates_preserved() {
        let grams = char_ngrams("aaaa", 3..=3);
        assert_eq!(grams, vec!["aaa", "aaa"]);
    }
}
