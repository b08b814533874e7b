use crate::influencer::InfluencerProfile;
use crate::random::RandomSource;
use tracing::debug;

use super::config::BaselineConfig;
use super::popularity::PopularityPolicy;

/// True if an engagement string looks like a large figure: a number
/// followed by `k`, `K`, 萬 or 万 ("1.2k", "3 萬"), or at least three
/// consecutive digits.
pub fn has_strong_engagement(engagement: &str) -> bool {
    let mut run = 0;
    // A digit came last, ignoring '.' and whitespace
    let mut after_digit = false;
    for c in engagement.chars() {
        if c.is_ascii_digit() {
            run += 1;
            if run >= 3 {
                return true;
            }
            after_digit = true;
            continue;
        }
        run = 0;
        if matches!(c, 'k' | 'K' | '萬' | '万') && after_digit {
            return true;
        }
        if c != '.' && !c.is_whitespace() {
            after_digit = false;
        }
    }
    false
}

/// Profile-based score assigned before anyone has evaluated an influencer.
#[derive(Debug, Clone)]
pub struct BaselineEstimator {
    popularity: PopularityPolicy,
    config: BaselineConfig,
}

impl Default for BaselineEstimator {
    fn default() -> Self {
        Self::new(PopularityPolicy::default(), BaselineConfig::default())
    }
}

impl BaselineEstimator {
    pub fn new(popularity: PopularityPolicy, config: BaselineConfig) -> Self {
        Self { popularity, config }
    }

    pub fn config(&self) -> &BaselineConfig {
        &self.config
    }

    /// Sum of every bonus except jitter, before clamping
    pub fn unclamped(&self, profile: &InfluencerProfile) -> f64 {
        let cfg = &self.config;
        let mut score = cfg.base_score;

        score += self.popularity.score(profile).total();

        let bio_len = profile.bio_len();
        if bio_len > cfg.bio_threshold {
            score += cfg.bio_bonus;
        }
        if bio_len > cfg.long_bio_threshold {
            score += cfg.long_bio_bonus;
        }

        let posts = profile.recent_posts.len() as f64;
        score += (posts * cfg.post_bonus).min(cfg.post_bonus_cap);

        if profile
            .recent_posts
            .iter()
            .any(|post| has_strong_engagement(&post.engagement))
        {
            score += cfg.engagement_bonus;
        }

        score
    }

    pub fn estimate(&self, profile: &InfluencerProfile, rng: &mut dyn RandomSource) -> i32 {
        let cfg = &self.config;
        let jitter = if cfg.jitter {
            rng.jitter(cfg.jitter_min, cfg.jitter_max)
        } else {
            0
        };
        let raw = self.unclamped(profile) + jitter as f64;
        // Guard against an inverted range in a hand-edited config
        let (lo, hi) = (cfg.min_score.min(cfg.max_score), cfg.max_score.max(cfg.min_score));
        let score = (raw.round() as i32).clamp(lo, hi);
        debug!(name = %profile.name, raw, jitter, score, "baseline estimate");
        score
    }
}

/// Baseline estimate with the built-in policy
pub fn estimate_baseline_score(profile: &InfluencerProfile, rng: &mut dyn RandomSource) -> i32 {
    BaselineEstimator::default().estimate(profile, rng)
}
