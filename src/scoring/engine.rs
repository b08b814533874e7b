use crate::evaluation::{Criterion, EvaluationScores};
use tracing::debug;

use super::weights::WeightProfile;

pub const MIN_CRITERION_SCORE: f64 = 0.0;
pub const MAX_CRITERION_SCORE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CriterionContribution {
    pub criterion: Criterion,
    pub raw: f64,        // As submitted
    pub clamped: f64,    // After NaN -> 0 and clamping to 0..=100
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub profile: String,
    pub contributions: Vec<CriterionContribution>,
    pub total: f64,
}

/// Bring a raw criterion score into 0..=100. NaN counts as 0.
pub fn sanitize_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(MIN_CRITERION_SCORE, MAX_CRITERION_SCORE)
    }
}

/// Copy of `scores` with every criterion passed through [`sanitize_score`]
pub fn sanitize_scores(scores: &EvaluationScores) -> EvaluationScores {
    let mut out = *scores;
    for (criterion, value) in scores.iter() {
        out.set(criterion, sanitize_score(value));
    }
    out
}

/// Weighted sum of the criterion scores. Full precision, no rounding.
pub fn compute_total_score(scores: &EvaluationScores, weights: &WeightProfile) -> f64 {
    score_breakdown(scores, weights).total
}

/// Same sum as [`compute_total_score`], itemised per criterion.
pub fn score_breakdown(scores: &EvaluationScores, weights: &WeightProfile) -> ScoreBreakdown {
    let mut contributions = Vec::with_capacity(Criterion::ALL.len());
    let mut total = 0.0;

    for (criterion, raw) in scores.iter() {
        let weight = weights.weight(criterion);
        let weight = if weight.is_nan() { 0.0 } else { weight };
        let clamped = sanitize_score(raw);
        if clamped != raw {
            debug!(criterion = criterion.key(), raw, clamped, "criterion score clamped");
        }
        let contribution = clamped * weight;
        total += contribution;
        contributions.push(CriterionContribution {
            criterion,
            raw,
            clamped,
            weight,
            contribution,
        });
    }

    debug!(profile = %weights.name, total, "computed total score");

    ScoreBreakdown {
        profile: weights.name.clone(),
        contributions,
        total,
    }
}
