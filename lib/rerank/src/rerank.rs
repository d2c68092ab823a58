//! Upgrade-only semantic rerank of lexically rejected products.
//!
//! Takes the top lexical candidates of a not-mapped product, asks the
//! embedding service for one batch of `[product, candidate_1..K]` vectors,
//! rescales the candidates' scores with embedding cosine, merges them back
//! with the untouched remainder and re-gates under stricter thresholds. A
//! lexical mapped verdict is never revisited or downgraded.

use tracing::{debug, warn};

use taxomatch_core::{
    confidence_percent, CandidateMatch, CategoryNode, MappingOutcome, MatchConfig, MatchStatus,
    ProductRecord,
};

use crate::provider::EmbeddingProvider;

/// How many lexical candidates are sent for re-embedding.
pub const RERANK_TOP_K: usize = 6;
/// Minimum embedding score, regardless of the configured lexical threshold.
pub const RERANK_SCORE_FLOOR: f32 = 0.78;
/// Minimum gap, regardless of the configured lexical gap threshold.
pub const RERANK_MIN_GAP: f32 = 0.02;

/// One reranker per run, holding the injected embedding capability and the
/// run configuration.
#[derive(Debug)]
pub struct SemanticReranker<'a, P: EmbeddingProvider> {
    provider: &'a P,
    config: &'a MatchConfig,
}

impl<'a, P: EmbeddingProvider> SemanticReranker<'a, P> {
    pub fn new(provider: &'a P, config: &'a MatchConfig) -> Self {
        Self { provider, config }
    }

    /// Attempt to upgrade a not-mapped outcome. `ranked` is the product's
    /// full lexical candidate list (sorted descending); on any failure the
    /// outcome keeps its verdict and only gains a reason annotation.
    ///
    /// Returns the candidate ranking the outcome should display.
    pub async fn apply(
        &self,
        product: &ProductRecord,
        categories: &[CategoryNode],
        mut ranked: Vec<CandidateMatch>,
        outcome: &mut MappingOutcome,
    ) -> Vec<CandidateMatch> {
        if outcome.status == MatchStatus::Mapped {
            // Upgrade-only: a lexical accept is final.
            return ranked;
        }
        if product.aggregated_text.trim().is_empty() {
            outcome
                .reasons
                .push("semantic rerank skipped: product has no usable text".to_string());
            return ranked;
        }
        let k = ranked.len().min(RERANK_TOP_K);
        if k == 0 {
            return ranked;
        }

        let mut texts = Vec::with_capacity(k + 1);
        texts.push(product.aggregated_text.clone());
        for candidate in &ranked[..k] {
            texts.push(categories[candidate.category_index].joined_text.clone());
        }

        let mut embeddings = match self.provider.embed_batch(&texts).await {
            Ok(embeddings) => embeddings,
            Err(err) => {
                warn!(product = %product.id, error = %err, "semantic rerank failed");
                outcome.reasons.push(format!("semantic rerank failed: {err}"));
                return ranked;
            }
        };
        if embeddings.len() != k + 1 {
            outcome.reasons.push(format!(
                "semantic rerank failed: expected {} embeddings, got {}",
                k + 1,
                embeddings.len()
            ));
            return ranked;
        }

        for embedding in &mut embeddings {
            l2_normalize(embedding);
        }
        let product_embedding = &embeddings[0];

        // Replace the top-K scores, keep the remainder untouched, then
        // merge-sort the whole list; whatever lands second overall defines
        // the new gap.
        for (candidate, embedding) in ranked[..k].iter_mut().zip(&embeddings[1..]) {
            candidate.score = dot(product_embedding, embedding);
        }
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let best = &ranked[0];
        let second = ranked.get(1);
        let gap = match second {
            Some(s) => best.score - s.score,
            None => best.score,
        };

        let score_floor = self.config.similarity_threshold.max(RERANK_SCORE_FLOOR);
        let overlap_floor = self.config.token_overlap_threshold.saturating_sub(1);
        let gap_floor = (self.config.gap_threshold / 2.0).max(RERANK_MIN_GAP);

        let admitted = best.score >= score_floor
            && best.token_overlap >= overlap_floor
            && (second.is_none() || gap >= gap_floor);

        if admitted {
            debug!(product = %product.id, category = %best.category_path, score = best.score,
                "semantic rerank upgraded verdict");
            outcome.status = MatchStatus::Mapped;
            outcome.category_path = Some(best.category_path.clone());
            outcome.confidence_percent = confidence_percent(best.score);
            outcome.reasons.push(format!(
                "semantic rerank accepted: score {:.3}, gap {:.3}",
                best.score, gap
            ));
        } else {
            outcome.reasons.push(format!(
                "semantic rerank insufficient: score {:.3}, gap {:.3}",
                best.score, gap
            ));
        }

        ranked
    }
}

fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector {
            *value /= norm;
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{EmbedError, EmbedResult};
    use std::cell::RefCell;

    /// Deterministic stand-in returning queued embeddings (or a queued
    /// error) instead of calling any service.
    struct StubProvider {
        responses: RefCell<Vec<EmbedResult<Vec<Vec<f32>>>>>,
        calls: RefCell<usize>,
    }

    impl StubProvider {
        fn with(response: EmbedResult<Vec<Vec<f32>>>) -> Self {
            Self {
                responses: RefCell::new(vec![response]),
                calls: RefCell::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.borrow()
        }
    }

    impl EmbeddingProvider for StubProvider {
        async fn embed_batch(&self, _texts: &[String]) -> EmbedResult<Vec<Vec<f32>>> {
            *self.calls.borrow_mut() += 1;
            self.responses.borrow_mut().remove(0)
        }
    }

    fn category(id: usize, path: &str) -> CategoryNode {
        CategoryNode::from_path(id, path)
    }

    fn candidate(index: usize, path: &str, score: f32, overlap: usize) -> CandidateMatch {
        CandidateMatch {
            category_index: index,
            category_path: path.to_string(),
            score,
            token_overlap: overlap,
            jaccard: 0.2,
        }
    }

    fn rejected_outcome(product_id: &str) -> MappingOutcome {
        MappingOutcome {
            product_id: product_id.to_string(),
            category_path: None,
            confidence_percent: 45,
            status: MatchStatus::NotMapped,
            candidates: Vec::new(),
            reasons: vec!["rejected: score 0.450".to_string()],
        }
    }

    fn product(text: &str) -> ProductRecord {
        ProductRecord::new("p1", "test", None, text, None)
    }

    #[tokio::test]
    async fn test_mapped_outcome_is_never_touched() {
        let provider = StubProvider::with(Ok(vec![]));
        let config = MatchConfig::default();
        let reranker = SemanticReranker::new(&provider, &config);
        let categories = vec![category(0, "A///B")];
        let ranked = vec![candidate(0, "A///B", 0.9, 2)];

        let mut outcome = rejected_outcome("p1");
        outcome.status = MatchStatus::Mapped;
        outcome.category_path = Some("A///B".to_string());

        let out = reranker
            .apply(&product("text"), &categories, ranked.clone(), &mut outcome)
            .await;
        assert_eq!(out, ranked);
        assert_eq!(outcome.category_path.as_deref(), Some("A///B"));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_text_short_circuits_without_call() {
        let provider = StubProvider::with(Ok(vec![]));
        let config = MatchConfig::default();
        let reranker = SemanticReranker::new(&provider, &config);
        let categories = vec![category(0, "A///B")];
        let ranked = vec![candidate(0, "A///B", 0.4, 1)];

        let mut outcome = rejected_outcome("p1");
        reranker
            .apply(&product("   "), &categories, ranked, &mut outcome)
            .await;

        assert_eq!(outcome.status, MatchStatus::NotMapped);
        assert!(outcome.reasons.last().unwrap().contains("no usable text"));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_strong_embedding_agreement_upgrades() {
        // Product embedding aligned with candidate 0, orthogonal to 1.
        let provider = StubProvider::with(Ok(vec![
            vec![1.0, 0.0],
            vec![2.0, 0.0],
            vec![0.0, 3.0],
        ]));
        let config = MatchConfig::default();
        let reranker = SemanticReranker::new(&provider, &config);
        let categories = vec![category(0, "A///B"), category(1, "C///D")];
        let ranked = vec![candidate(0, "A///B", 0.45, 2), candidate(1, "C///D", 0.40, 1)];

        let mut outcome = rejected_outcome("p1");
        let out = reranker
            .apply(&product("клапан"), &categories, ranked, &mut outcome)
            .await;

        assert_eq!(outcome.status, MatchStatus::Mapped);
        assert_eq!(outcome.category_path.as_deref(), Some("A///B"));
        assert_eq!(outcome.confidence_percent, 100);
        assert!((out[0].score - 1.0).abs() < 1e-5);
        assert_eq!(out[1].score, 0.0);
    }

    #[tokio::test]
    async fn test_weak_embedding_agreement_stays_rejected() {
        // Cosine 45 degrees off both candidates: best rerank score ~0.707,
        // below the 0.78 floor.
        let provider = StubProvider::with(Ok(vec![
            vec![1.0, 1.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
        ]));
        let config = MatchConfig::default();
        let reranker = SemanticReranker::new(&provider, &config);
        let categories = vec![category(0, "A///B"), category(1, "C///D")];
        let ranked = vec![candidate(0, "A///B", 0.45, 2), candidate(1, "C///D", 0.40, 1)];

        let mut outcome = rejected_outcome("p1");
        reranker
            .apply(&product("клапан"), &categories, ranked, &mut outcome)
            .await;

        assert_eq!(outcome.status, MatchStatus::NotMapped);
        assert!(outcome
            .reasons
            .last()
            .unwrap()
            .starts_with("semantic rerank insufficient"));
    }

    #[tokio::test]
    async fn test_service_failure_is_absorbed_into_reasons() {
        let provider = StubProvider::with(Err(EmbedError::Service {
            status: 503,
            message: "overloaded".to_string(),
        }));
        let config = MatchConfig::default();
        let reranker = SemanticReranker::new(&provider, &config);
        let categories = vec![category(0, "A///B")];
        let ranked = vec![candidate(0, "A///B", 0.45, 2)];

        let mut outcome = rejected_outcome("p1");
        let out = reranker
            .apply(&product("клапан"), &categories, ranked.clone(), &mut outcome)
            .await;

        assert_eq!(outcome.status, MatchStatus::NotMapped);
        assert!(outcome.reasons.last().unwrap().contains("503"));
        // The lexical ranking survives untouched.
        assert_eq!(out, ranked);
    }

    #[tokio::test]
    async fn test_wrong_embedding_count_is_malformed() {
        let provider = StubProvider::with(Ok(vec![vec![1.0, 0.0]]));
        let config = MatchConfig::default();
        let reranker = SemanticReranker::new(&provider, &config);
        let categories = vec![category(0, "A///B"), category(1, "C///D")];
        let ranked = vec![candidate(0, "A///B", 0.45, 2), candidate(1, "C///D", 0.40, 1)];

        let mut outcome = rejected_outcome("p1");
        reranker
            .apply(&product("клапан"), &categories, ranked, &mut outcome)
            .await;

        assert_eq!(outcome.status, MatchStatus::NotMapped);
        assert!(outcome
            .reasons
            .last()
            .unwrap()
            .contains("expected 3 embeddings, got 1"));
    }

    #[tokio::test]
    async fn test_merge_resort_can_promote_a_lower_lexical_candidate() {
        // Candidate 1 (lexically second) gets the aligned embedding.
        let provider = StubProvider::with(Ok(vec![
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
        ]));
        let config = MatchConfig::default();
        let reranker = SemanticReranker::new(&provider, &config);
        let categories = vec![category(0, "A///B"), category(1, "C///D")];
        let ranked = vec![candidate(0, "A///B", 0.45, 2), candidate(1, "C///D", 0.40, 1)];

        let mut outcome = rejected_outcome("p1");
        let out = reranker
            .apply(&product("клапан"), &categories, ranked, &mut outcome)
            .await;

        assert_eq!(out[0].category_index, 1);
        assert_eq!(outcome.status, MatchStatus::Mapped);
        assert_eq!(outcome.category_path.as_deref(), Some("C///D"));
    }
}
