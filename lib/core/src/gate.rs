//! Acceptance gate: an ordered list of named admission rules.
//!
//! The gate is deliberately conservative - its whole purpose is to prevent
//! false-positive category assignments. A product maps only when at least
//! one rule admits the best candidate; everything else is an explicit
//! not-mapped verdict with the scores that drove it recorded in the reason
//! trail.

use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::types::{confidence_percent, CandidateMatch, MatchStatus};

/// Jaccard level at which the gap requirement may be relaxed.
pub const JACCARD_FLOOR: f32 = 0.3;
/// Extra score margin required by the high-score rule.
pub const HIGH_SCORE_MARGIN: f32 = 0.08;

/// Signals extracted from the ranked candidate list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateSignals {
    pub score: f32,
    pub overlap: usize,
    pub jaccard: f32,
    /// Lead over the runner-up, or the full score when there is no runner-up.
    pub gap: f32,
    pub has_second: bool,
}

impl GateSignals {
    /// Read best/second-best off a list already sorted descending by score.
    pub fn from_ranked(ranked: &[CandidateMatch]) -> Option<Self> {
        let best = ranked.first()?;
        let second = ranked.get(1);
        Some(Self {
            score: best.score,
            overlap: best.token_overlap,
            jaccard: best.jaccard,
            gap: match second {
                Some(s) => best.score - s.score,
                None => best.score,
            },
            has_second: second.is_some(),
        })
    }
}

/// The admission rules, in evaluation order. Each is an independent
/// predicate; the first one that admits decides the verdict.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GateRule {
    /// Score, overlap and gap all clear their thresholds.
    ScoreOverlapGap,
    /// Strong Jaccard agreement buys a relaxed gap requirement.
    JaccardEasedGap,
    /// Extra-deep stem overlap with near-waived gap.
    DeepOverlap,
    /// Score well above threshold plus strong Jaccard; no gap requirement.
    HighScore,
}

impl GateRule {
    pub const ORDERED: [GateRule; 4] = [
        GateRule::ScoreOverlapGap,
        GateRule::JaccardEasedGap,
        GateRule::DeepOverlap,
        GateRule::HighScore,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GateRule::ScoreOverlapGap => "score+overlap+gap",
            GateRule::JaccardEasedGap => "jaccard-eased gap",
            GateRule::DeepOverlap => "deep overlap",
            GateRule::HighScore => "high score",
        }
    }

    /// Does this rule admit the best candidate?
    pub fn admits(self, s: &GateSignals, cfg: &MatchConfig) -> bool {
        let score_ok = s.score >= cfg.similarity_threshold;
        match self {
            GateRule::ScoreOverlapGap => {
                score_ok
                    && s.overlap >= cfg.token_overlap_threshold
                    && s.gap >= cfg.gap_threshold
            }
            GateRule::JaccardEasedGap => {
                score_ok
                    && s.overlap >= cfg.token_overlap_threshold
                    && s.jaccard >= JACCARD_FLOOR
                    && s.gap >= 0.4 * cfg.gap_threshold
            }
            GateRule::DeepOverlap => {
                score_ok
                    && s.jaccard >= JACCARD_FLOOR
                    && s.overlap >= cfg.token_overlap_threshold + 1
                    && (!s.has_second || s.gap >= 0.2 * cfg.gap_threshold)
            }
            GateRule::HighScore => {
                score_ok
                    && s.jaccard >= JACCARD_FLOOR
                    && s.score >= cfg.similarity_threshold + HIGH_SCORE_MARGIN
            }
        }
    }
}

/// Verdict plus the trail explaining it.
#[derive(Debug, Clone, PartialEq)]
pub struct GateDecision {
    pub status: MatchStatus,
    /// The rule that admitted the match, when mapped.
    pub rule: Option<GateRule>,
    pub confidence_percent: u8,
    pub reasons: Vec<String>,
}

/// Evaluate the gate over a ranked candidate list.
pub fn evaluate(ranked: &[CandidateMatch], cfg: &MatchConfig) -> GateDecision {
    let Some(signals) = GateSignals::from_ranked(ranked) else {
        return GateDecision {
            status: MatchStatus::NotMapped,
            rule: None,
            confidence_percent: 0,
            reasons: vec!["no candidates".to_string()],
        };
    };

    let confidence = confidence_percent(signals.score);
    let summary = format!(
        "score {:.3}, overlap {}, gap {:.3}, jaccard {:.3}",
        signals.score, signals.overlap, signals.gap, signals.jaccard
    );

    for rule in GateRule::ORDERED {
        if rule.admits(&signals, cfg) {
            return GateDecision {
                status: MatchStatus::Mapped,
                rule: Some(rule),
                confidence_percent: confidence,
                reasons: vec![format!("accepted by {} rule: {}", rule.label(), summary)],
            };
        }
    }

    let mut reasons = vec![format!("rejected: {summary}")];
    if confidence >= cfg.confidence_min_percent {
        reasons.push(format!(
            "confidence {confidence}% met the floor of {}%, but no acceptance rule admitted the match",
            cfg.confidence_min_percent
        ));
    }

    GateDecision {
        status: MatchStatus::NotMapped,
        rule: None,
        confidence_percent: confidence,
        reasons,
    }
}
