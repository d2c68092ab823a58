//! Hybrid scorer: combines the word-stem and char-n-gram axes with
//! overlap/Jaccard signals into one ranked candidate list per product.

use std::ops::RangeInclusive;

use ahash::AHashSet;

use taxomatch_text::{char_ngrams, normalize_text, DEFAULT_NGRAM_RANGE};

use crate::error::{Error, Result};
use crate::types::{CandidateMatch, CategoryNode, ProductRecord};
use crate::vsm::VectorSpaceModel;

/// Weight of the word-stem cosine in the combined score.
pub const WORD_AXIS_WEIGHT: f32 = 0.6;
/// Weight of the char-n-gram cosine in the combined score.
pub const CHAR_AXIS_WEIGHT: f32 = 0.4;
/// Additive boost per legacy-category stem shared with the candidate.
/// Intentionally uncapped.
pub const LEGACY_OVERLAP_BOOST: f32 = 0.05;
/// Multiplier on the product/candidate Jaccard index.
pub const JACCARD_BOOST: f32 = 0.1;

/// Both vector space models plus precomputed per-category vectors and token
/// sets. Built once per run from the category corpus and then shared
/// read-only across products.
#[derive(Debug, Clone)]
pub struct HybridScorer {
    categories: Vec<CategoryNode>,
    word_model: VectorSpaceModel,
    char_model: VectorSpaceModel,
    word_vectors: Vec<Vec<f32>>,
    char_vectors: Vec<Vec<f32>>,
    stem_sets: Vec<AHashSet<String>>,
    ngram_range: RangeInclusive<usize>,
}

impl HybridScorer {
    /// Build the scorer from raw category paths with the default n-gram
    /// range. Duplicates in the corpus are legal and kept as-is.
    pub fn build(category_paths: &[String]) -> Result<Self> {
        Self::build_with_ngram_range(category_paths, DEFAULT_NGRAM_RANGE)
    }

    /// Build with an explicit char n-gram length range.
    pub fn build_with_ngram_range(
        category_paths: &[String],
        ngram_range: RangeInclusive<usize>,
    ) -> Result<Self> {
        if category_paths.is_empty() {
            return Err(Error::EmptyCategoryCorpus);
        }

        let categories: Vec<CategoryNode> = category_paths
            .iter()
            .enumerate()
            .map(|(id, path)| CategoryNode::from_path(id, path))
            .collect();

        let word_corpus: Vec<Vec<String>> =
            categories.iter().map(|c| c.stems.clone()).collect();
        let char_corpus: Vec<Vec<String>> = categories
            .iter()
            .map(|c| char_ngrams(&c.joined_text, ngram_range.clone()))
            .collect();

        let word_model = VectorSpaceModel::fit(&word_corpus);
        let char_model = VectorSpaceModel::fit(&char_corpus);

        let word_vectors = word_corpus
            .iter()
            .map(|doc| word_model.vectorize(doc))
            .collect();
        let char_vectors = char_corpus
            .iter()
            .map(|doc| char_model.vectorize(doc))
            .collect();
        let stem_sets = categories
            .iter()
            .map(|c| c.stems.iter().cloned().collect())
            .collect();

        Ok(Self {
            categories,
            word_model,
            char_model,
            word_vectors,
            char_vectors,
            stem_sets,
            ngram_range,
        })
    }

    pub fn categories(&self) -> &[CategoryNode] {
        &self.categories
    }

    /// Score the product against every category and return candidates sorted
    /// descending by combined score. The sort is stable, so equal scores
    /// keep original corpus order for reproducibility.
    pub fn score(&self, product: &ProductRecord) -> Vec<CandidateMatch> {
        let word_vector = self.word_model.vectorize(&product.stems);
        let product_ngrams = char_ngrams(&product.aggregated_text, self.ngram_range.clone());
        let char_vector = self.char_model.vectorize(&product_ngrams);

        let product_stems: AHashSet<&String> = product.stems.iter().collect();
        let legacy_stems: Option<AHashSet<String>> = product
            .legacy_category
            .as_deref()
            .map(|label| normalize_text(label).into_iter().collect::<AHashSet<_>>())
            .filter(|stems| !stems.is_empty());

        let mut candidates: Vec<CandidateMatch> = self
            .categories
            .iter()
            .enumerate()
            .map(|(index, category)| {
                let word_cos = VectorSpaceModel::similarity(&word_vector, &self.word_vectors[index]);
                let char_cos = VectorSpaceModel::similarity(&char_vector, &self.char_vectors[index]);
                let mut score = WORD_AXIS_WEIGHT * word_cos + CHAR_AXIS_WEIGHT * char_cos;

                let stem_set = &self.stem_sets[index];
                if let Some(legacy) = &legacy_stems {
                    let legacy_overlap = legacy
                        .iter()
                        .filter(|stem| stem_set.contains(*stem))
                        .count();
                    if legacy_overlap > 0 {
                        score += LEGACY_OVERLAP_BOOST * legacy_overlap as f32;
                    }
                }

                let token_overlap = product_stems
                    .iter()
                    .filter(|&&stem| stem_set.contains(stem))
                    .count();
                let union = product_stems.len() + stem_set.len() - token_overlap;
                let jaccard = if union == 0 {
                    0.0
                } else {
                    token_overlap as f32 / union as f32
                };
                score += JACCARD_BOOST * jaccard;

                CandidateMatch {
                    category_index: index,
                    category_path: category.raw_path.clone(),
                    score,
                    token_overlap,
                    jaccard,
                }
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|p| p.to_string()).collect()
    }

    fn product(text: &str, legacy: Option<&str>) -> ProductRecord {
        ProductRecord::new("p1", "test", legacy.map(|s| s.to_string()), text, None)
    }

    #[test]
    fn test_empty_corpus_is_fatal() {
        assert!(matches!(
            HybridScorer::build(&[]),
            Err(Error::EmptyCategoryCorpus)
        ));
    }

    #[test]
    fn test_one_candidate_per_category_sorted_descending() {
        let scorer = HybridScorer::build(&paths(&[
            "Насосы///Водяные насосы",
            "Тормозные системы///Пневматические тормоза",
            "Фильтры///Масляные фильтры",
        ]))
        .unwrap();
        let ranked = scorer.score(&product("пневматический тормозной клапан", None));
        assert_eq!(ranked.len(), 3);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(ranked[0].category_index, 1);
    }

    #[test]
    fn test_equal_scores_keep_corpus_order() {
        // Identical paths produce identical scores; the earlier one must win.
        let scorer = HybridScorer::build(&paths(&[
            "Тормоза///Пневматика",
            "Тормоза///Пневматика",
        ]))
        .unwrap();
        let ranked = scorer.score(&product("пневматический тормоз", None));
        assert_eq!(ranked[0].category_index, 0);
        assert_eq!(ranked[1].category_index, 1);
        assert!((ranked[0].score - ranked[1].score).abs() < 1e-6);
    }

    #[test]
    fn test_legacy_overlap_boost_raises_score() {
        let corpus = paths(&["Тормозные системы///Пневматические тормоза"]);
        let scorer = HybridScorer::build(&corpus).unwrap();
        let without = scorer.score(&product("тормозной клапан", None));
        let with = scorer.score(&product("тормозной клапан", Some("Тормоза пневматические")));
        assert!(with[0].score > without[0].score);
    }

    #[test]
    fn test_legacy_label_without_overlap_adds_nothing() {
        let corpus = paths(&["Тормозные системы///Пневматические тормоза"]);
        let scorer = HybridScorer::build(&corpus).unwrap();
        let without = scorer.score(&product("тормозной клапан", None));
        let with = scorer.score(&product("тормозной клапан", Some("Гидравлика")));
        assert!((with[0].score - without[0].score).abs() < 1e-6);
    }

    #[test]
    fn test_empty_product_text_scores_zero_everywhere() {
        let scorer = HybridScorer::build(&paths(&[
            "Насосы///Водяные насосы",
            "Фильтры///Масляные фильтры",
        ]))
        .unwrap();
        let ranked = scorer.score(&product("", None));
        assert!(ranked.iter().all(|c| c.score == 0.0));
        assert!(ranked.iter().all(|c| c.token_overlap == 0));
    }

    #[test]
    fn test_token_overlap_and_jaccard_reported() {
        let scorer =
            HybridScorer::build(&paths(&["Тормозные системы///Пневматические тормоза"])).unwrap();
        let ranked = scorer.score(&product("пневматический тормозной клапан", None));
        // product stems {пневматическ, тормозн, клапан} vs
        // category stems {тормозн, пневматическ, тормоз}
        assert_eq!(ranked[0].token_overlap, 2);
        assert!((ranked[0].jaccard - 0.5).abs() < 1e-6);
    }
}
