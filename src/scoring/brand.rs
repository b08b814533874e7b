use crate::influencer::{BrandProfile, InfluencerProfile};
use std::fmt;
use tracing::debug;

use super::config::BrandMatchConfig;
use super::popularity::{PopularityPolicy, PopularityScore};

/// Shown in place of a brand match when the project has no brand profile
pub const NOT_APPLICABLE_MESSAGE: &str = "無品牌資料，無法評估適配性";

/// Recommendation bucket for a brand match score. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Recommendation {
    NotRecommended,
    NeedsReview,
    Consider,
    Recommend,
    StronglyRecommend,
}

impl Recommendation {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Recommendation::StronglyRecommend
        } else if score >= 80.0 {
            Recommendation::Recommend
        } else if score >= 70.0 {
            Recommendation::Consider
        } else if score >= 60.0 {
            Recommendation::NeedsReview
        } else {
            Recommendation::NotRecommended
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StronglyRecommend => "強烈推薦",
            Recommendation::Recommend => "推薦合作",
            Recommendation::Consider => "可以考慮",
            Recommendation::NeedsReview => "需要評估",
            Recommendation::NotRecommended => "不建議合作",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrandMatch {
    pub overall_score: f64,
    pub recommendation: Recommendation,
    pub popularity: f64,
    pub verified_bonus: f64,
    pub keyword_bonus: f64,
    pub industry_bonus: f64,
    pub matched_keywords: Vec<String>,
}

/// Result of asking for brand fit when a brand profile may be missing.
#[derive(Debug, Clone, PartialEq)]
pub enum BrandFit {
    Scored(BrandMatch),
    NotApplicable,
}

impl BrandFit {
    pub fn overall_score(&self) -> Option<f64> {
        match self {
            BrandFit::Scored(m) => Some(m.overall_score),
            BrandFit::NotApplicable => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            BrandFit::Scored(m) => format!("{:.1}% {}", m.overall_score, m.recommendation),
            BrandFit::NotApplicable => NOT_APPLICABLE_MESSAGE.to_string(),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Brand keywords found in the influencer's bio, category or keyword list.
/// Matching is case-insensitive substring matching; duplicates count once.
pub fn matched_keywords(influencer: &InfluencerProfile, brand: &BrandProfile) -> Vec<String> {
    let bio = normalize(&influencer.bio);
    let category = influencer.category.as_deref().map(normalize).unwrap_or_default();
    let own: Vec<String> = influencer.keywords.iter().map(|k| normalize(k)).collect();

    let mut matched: Vec<String> = Vec::new();
    for keyword in &brand.keywords {
        let needle = normalize(keyword);
        if needle.is_empty() || matched.contains(&needle) {
            continue;
        }
        let hit = bio.contains(&needle)
            || (!category.is_empty() && category.contains(&needle))
            || own.iter().any(|k| k.contains(&needle));
        if hit {
            matched.push(needle);
        }
    }
    matched
}

fn industry_matches(influencer: &InfluencerProfile, brand: &BrandProfile) -> bool {
    match (influencer.category.as_deref(), brand.industry.as_deref()) {
        (Some(category), Some(industry)) => {
            let (category, industry) = (normalize(category), normalize(industry));
            !category.is_empty()
                && !industry.is_empty()
                && (category.contains(&industry) || industry.contains(&category))
        }
        _ => false,
    }
}

/// Brand fit percentage for one influencer against one brand.
#[derive(Debug, Clone)]
pub struct BrandMatcher {
    popularity: PopularityPolicy,
    config: BrandMatchConfig,
}

impl Default for BrandMatcher {
    fn default() -> Self {
        Self::new(PopularityPolicy::default(), BrandMatchConfig::default())
    }
}

impl BrandMatcher {
    pub fn new(popularity: PopularityPolicy, config: BrandMatchConfig) -> Self {
        Self { popularity, config }
    }

    pub fn score(&self, influencer: &InfluencerProfile, brand: &BrandProfile) -> BrandMatch {
        let cfg = &self.config;
        let PopularityScore {
            follower_bonus,
            platform_bonus,
        } = self.popularity.score(influencer);
        let popularity = follower_bonus + platform_bonus;

        let verified_bonus = if influencer.verified { cfg.verified_bonus } else { 0.0 };

        let matched = matched_keywords(influencer, brand);
        let keyword_bonus = (matched.len() as f64 * cfg.keyword_bonus).min(cfg.keyword_bonus_cap);

        let industry_bonus = if industry_matches(influencer, brand) {
            cfg.industry_bonus
        } else {
            0.0
        };

        let raw = cfg.base_score + popularity + verified_bonus + keyword_bonus + industry_bonus;
        let overall_score = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 100.0) };
        let recommendation = Recommendation::from_score(overall_score);

        debug!(
            name = %influencer.name,
            brand = %brand.name,
            raw,
            overall_score,
            "brand match"
        );

        BrandMatch {
            overall_score,
            recommendation,
            popularity,
            verified_bonus,
            keyword_bonus,
            industry_bonus,
            matched_keywords: matched,
        }
    }

    /// Score when a brand is configured, otherwise [`BrandFit::NotApplicable`]
    pub fn assess(&self, influencer: &InfluencerProfile, brand: Option<&BrandProfile>) -> BrandFit {
        match brand {
            Some(brand) => BrandFit::Scored(self.score(influencer, brand)),
            None => BrandFit::NotApplicable,
        }
    }
}

/// Brand match with the built-in policy
pub fn compute_brand_match_score(influencer: &InfluencerProfile, brand: &BrandProfile) -> BrandMatch {
    BrandMatcher::default().score(influencer, brand)
}

pub fn assess_brand_fit(influencer: &InfluencerProfile, brand: Option<&BrandProfile>) -> BrandFit {
    BrandMatcher::default().assess(influencer, brand)
}
