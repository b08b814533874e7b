pub mod baseline;
pub mod brand;
pub mod config;
pub mod engine;
pub mod factors;
pub mod popularity;
pub mod ranking;
pub mod validation;
pub mod weights;

pub use baseline::{estimate_baseline_score, BaselineEstimator};
pub use brand::{
    assess_brand_fit, compute_brand_match_score, BrandFit, BrandMatch, BrandMatcher,
    Recommendation, NOT_APPLICABLE_MESSAGE,
};
pub use config::*;
pub use engine::{compute_total_score, sanitize_scores, score_breakdown, ScoreBreakdown};
pub use factors::{Effect, RangeOp};
pub use popularity::{PopularityPolicy, PopularityScore};
pub use ranking::{rank_influencers, top_n, RankEntry};
pub use validation::{validate_scoring, weight_warnings};
pub use weights::{WeightProfile, WeightProfiles};

/// Every scoring policy resolved from one [`ScoringConfig`].
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    pub weights: WeightProfiles,
    pub baseline: BaselineEstimator,
    pub brand: BrandMatcher,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

impl ScoringEngine {
    pub fn from_config(config: &ScoringConfig) -> Self {
        let popularity = PopularityPolicy::from_config(&config.popularity());
        Self {
            weights: config.weight_profiles(),
            baseline: BaselineEstimator::new(popularity.clone(), config.baseline()),
            brand: BrandMatcher::new(popularity, config.brand_match()),
        }
    }
}
