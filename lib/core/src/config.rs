//! Run configuration.

use serde::{Deserialize, Serialize};

/// Thresholds and switches for one matching run.
///
/// The core assumes thresholds arrive sanitized by the caller; missing
/// fields default during deserialization, nothing is re-validated here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    /// Minimum combined score the best candidate must reach.
    pub similarity_threshold: f32,
    /// Minimum lead over the second-best candidate.
    pub gap_threshold: f32,
    /// Minimum distinct-stem overlap between product and candidate.
    pub token_overlap_threshold: usize,
    /// Confidence floor (percent). Annotates rejections and gates
    /// eligibility for the semantic rerank step; never an acceptance rule.
    pub confidence_min_percent: u8,
    /// Whether rejected products may be retried with the semantic reranker.
    pub rerank_enabled: bool,
    /// Access credential for the external embedding service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.55,
            gap_threshold: 0.05,
            token_overlap_threshold: 1,
            confidence_min_percent: 40,
            rerank_enabled: false,
            api_key: None,
        }
    }
}
