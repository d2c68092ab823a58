//! Data model for one matching run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use taxomatch_text::normalize_text;

/// Fixed delimiter between hierarchy levels in a raw category path.
pub const PATH_DELIMITER: &str = "///";

/// One leaf of the target taxonomy, built once per run from a raw path
/// string. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryNode {
    /// Position in the category corpus (also the tie-break order).
    pub id: usize,
    /// The raw hierarchical path, levels joined by [`PATH_DELIMITER`].
    pub raw_path: String,
    /// Ordered level labels.
    pub levels: Vec<String>,
    /// Normalized stem sequence over the joined text.
    pub stems: Vec<String>,
    /// Levels joined by a single space; input to the char n-gram axis.
    pub joined_text: String,
}

impl CategoryNode {
    pub fn from_path(id: usize, raw_path: &str) -> Self {
        let levels: Vec<String> = raw_path
            .split(PATH_DELIMITER)
            .map(|level| level.trim().to_string())
            .collect();
        let joined_text = levels.join(" ");
        let stems = normalize_text(&joined_text);
        Self {
            id,
            raw_path: raw_path.to_string(),
            levels,
            stems,
            joined_text,
        }
    }
}

/// One catalog row to classify. Immutable during matching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    /// Caller-supplied identity, echoed back on the outcome.
    pub id: String,
    /// Extracted product name.
    pub name: String,
    /// Previous category label from the source catalog, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_category: Option<String>,
    /// Concatenation of the row's textual fields; what gets matched.
    pub aggregated_text: String,
    /// Normalized stem sequence over `aggregated_text`.
    pub stems: Vec<String>,
    /// Raw field bag, preserved verbatim for later export. The engine never
    /// interprets it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ProductRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        legacy_category: Option<String>,
        aggregated_text: impl Into<String>,
        payload: Option<Value>,
    ) -> Self {
        let aggregated_text = aggregated_text.into();
        let stems = normalize_text(&aggregated_text);
        Self {
            id: id.into(),
            name: name.into(),
            legacy_category,
            aggregated_text,
            stems,
            payload,
        }
    }
}

/// One scored category candidate for one product. Ephemeral: recomputed
/// every run, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateMatch {
    /// Index of the category in the run's corpus.
    pub category_index: usize,
    /// The candidate's raw path, for display and for the chosen outcome.
    pub category_path: String,
    /// Combined hybrid score (word cosine, char cosine, boosts).
    pub score: f32,
    /// Distinct-stem overlap between product and candidate token sets.
    pub token_overlap: usize,
    /// Jaccard index over the same token sets.
    pub jaccard: f32,
}

/// Final verdict for one product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Mapped,
    NotMapped,
}

/// Mapping result for one product, including the ranked candidate list and
/// the human-readable trail of scores that drove the decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MappingOutcome {
    pub product_id: String,
    /// Chosen category path; `None` exactly when `status` is `NotMapped`.
    pub category_path: Option<String>,
    /// Best candidate's score scaled to 0-100 and rounded. Reporting value,
    /// not a gating rule.
    pub confidence_percent: u8,
    pub status: MatchStatus,
    /// Top-ranked candidates, sorted non-increasing by score.
    pub candidates: Vec<CandidateMatch>,
    /// Appendable decision trail.
    pub reasons: Vec<String>,
}

/// Run-level aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunStats {
    pub total: usize,
    pub mapped: usize,
    pub not_mapped: usize,
    pub success_rate_percent: f32,
    /// Distinct categories actually chosen across mapped outcomes.
    pub distinct_categories: usize,
}

/// Everything a run emits: per-product outcomes in input order plus
/// aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub outcomes: Vec<MappingOutcome>,
    pub stats: RunStats,
}

/// Scale a combined score to a confidence percent, clamped to [0, 100]
/// (boosted scores can exceed 1.0).
pub fn confidence_percent(score: f32) -> u8 {
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}
