//! # taxomatch Text
//!
//! Text normalization primitives for the taxomatch matching engine.
//!
//! This crate turns raw catalog text into the two token streams the
//! vector-space models consume:
//!
//! - [`tokenize`] + [`normalize`] - word tokens reduced to Russian stems,
//!   with stopwords and single-character tokens dropped
//! - [`char_ngrams`] - overlapping character n-grams that capture sub-word
//!   similarity (compound technical terms, near-typos) stemming misses
//!
//! Everything here is pure and deterministic: the same input always yields
//! the same token sequence, and both streams preserve order and duplicates
//! (duplicates matter for term frequency).

pub mod ngram;
pub mod stem;
pub mod stopwords;
pub mod tokenize;

pub use ngram::{char_ngrams, DEFAULT_NGRAM_RANGE};
pub use stem::stem;
pub use stopwords::is_stop_word;
pub use tokenize::{normalize, normalize_text, tokenize};
