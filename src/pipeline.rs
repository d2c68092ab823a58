//! The per-run matching pipeline.
//!
//! A run is a pure function `(category corpus, product corpus, config) ->
//! outcomes`: both vector models are built once from the category corpus,
//! shared read-only, and every product is scored and gated in input order.
//! The only suspension point is the awaited embedding call inside the
//! optional rerank step, taken one product at a time.

use tracing::{debug, info, warn};

use taxomatch_core::{
    gate, CandidateMatch, HybridScorer, MappingOutcome, MatchConfig, MatchStatus, ProductRecord,
    Result, RunReport, RunStats,
};
use taxomatch_rerank::{EmbeddingProvider, HttpEmbeddingClient, SemanticReranker};

/// How many ranked candidates each outcome carries.
pub const TOP_CANDIDATES: usize = 5;

/// Lexical-only run: no external calls, fully deterministic. Two runs over
/// identical inputs produce identical reports.
pub fn run_lexical(
    category_paths: &[String],
    products: &[ProductRecord],
    config: &MatchConfig,
) -> Result<RunReport> {
    let scorer = HybridScorer::build(category_paths)?;
    let outcomes = products
        .iter()
        .map(|product| lexical_outcome(&scorer, product, config).0)
        .collect();
    Ok(finish_report(outcomes))
}

/// Full run with an injected embedding capability. Products the lexical
/// gate rejected (and whose confidence clears the configured floor) get one
/// semantic rerank attempt each, awaited sequentially.
pub async fn run_with_embedder<P: EmbeddingProvider>(
    category_paths: &[String],
    products: &[ProductRecord],
    config: &MatchConfig,
    provider: &P,
) -> Result<RunReport> {
    let scorer = HybridScorer::build(category_paths)?;
    let reranker = SemanticReranker::new(provider, config);

    let mut outcomes = Vec::with_capacity(products.len());
    for product in products {
        let (mut outcome, ranked) = lexical_outcome(&scorer, product, config);
        let eligible = config.rerank_enabled
            && outcome.status == MatchStatus::NotMapped
            && outcome.confidence_percent >= config.confidence_min_percent;
        if eligible {
            let reranked = reranker
                .apply(product, scorer.categories(), ranked, &mut outcome)
                .await;
            outcome.candidates = top_candidates(reranked);
        }
        outcomes.push(outcome);
    }
    Ok(finish_report(outcomes))
}

/// Convenience entry point: builds the HTTP embedding client when reranking
/// is enabled and a credential is configured, otherwise runs lexical-only.
/// A client that cannot be constructed degrades to the lexical pass - the
/// run itself never aborts over the embedding side.
pub async fn run(
    category_paths: &[String],
    products: &[ProductRecord],
    config: &MatchConfig,
) -> Result<RunReport> {
    if config.rerank_enabled {
        if let Some(api_key) = config.api_key.as_deref() {
            match HttpEmbeddingClient::from_api_key(api_key) {
                Ok(client) => {
                    return run_with_embedder(category_paths, products, config, &client).await
                }
                Err(err) => {
                    warn!(error = %err, "embedding client unavailable, running lexical-only");
                }
            }
        }
    }
    run_lexical(category_paths, products, config)
}

/// Score and gate one product. Returns the outcome plus the full ranked
/// list (the rerank step needs more candidates than the outcome keeps).
fn lexical_outcome(
    scorer: &HybridScorer,
    product: &ProductRecord,
    config: &MatchConfig,
) -> (MappingOutcome, Vec<CandidateMatch>) {
    let ranked = scorer.score(product);
    let decision = gate::evaluate(&ranked, config);
    debug!(
        product = %product.id,
        status = ?decision.status,
        confidence = decision.confidence_percent,
        "lexical verdict"
    );

    let category_path = match decision.status {
        MatchStatus::Mapped => ranked.first().map(|c| c.category_path.clone()),
        MatchStatus::NotMapped => None,
    };
    let outcome = MappingOutcome {
        product_id: product.id.clone(),
        category_path,
        confidence_percent: decision.confidence_percent,
        status: decision.status,
        candidates: top_candidates(ranked.clone()),
        reasons: decision.reasons,
    };
    (outcome, ranked)
}

fn top_candidates(mut ranked: Vec<CandidateMatch>) -> Vec<CandidateMatch> {
    ranked.truncate(TOP_CANDIDATES);
    ranked
}

fn finish_report(outcomes: Vec<MappingOutcome>) -> RunReport {
    let total = outcomes.len();
    let mapped = outcomes
        .iter()
        .filter(|o| o.status == MatchStatus::Mapped)
        .count();
    let distinct_categories = {
        let mut chosen: Vec<&str> = outcomes
            .iter()
            .filter_map(|o| o.category_path.as_deref())
            .collect();
        chosen.sort_unstable();
        chosen.dedup();
        chosen.len()
    };
    let success_rate_percent = if total == 0 {
        0.0
    } else {
        mapped as f32 * 100.0 / total as f32
    };

    let stats = RunStats {
        total,
        mapped,
        not_mapped: total - mapped,
        success_rate_percent,
        distinct_categories,
    };
    info!(
        total = stats.total,
        mapped = stats.mapped,
        not_mapped = stats.not_mapped,
        success_rate = stats.success_rate_percent,
        distinct_categories = stats.distinct_categories,
        "run finished"
    );

    RunReport { outcomes, stats }
}
