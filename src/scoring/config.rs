use crate::evaluation::Criterion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::weights::{WeightProfile, WeightProfiles, BRAND_WEIGHTED, CANONICAL};

/// Main scoring configuration.
///
/// Every section is optional; anything left out falls back to the built-in
/// defaults.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   weights:
///     brand_weighted:
///       brandFit: 0.30
///       contentQuality: 0.20
///       engagementRate: 0.15
///       audienceProfile: 0.15
///       professionalism: 0.10
///       businessAbility: 0.05
///       brandSafety: 0.05
///   popularity:
///     follower_bands:
///       - { range: "10000-100000", effect: "+15" }
///       - { range: ">100000", effect: "+8" }
///   baseline:
///     jitter: false
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Override one or both named weight profiles
    #[serde(default)]
    pub weights: Option<WeightsConfig>,

    /// Follower band and platform bonuses shared by baseline and brand match
    #[serde(default)]
    pub popularity: Option<PopularityConfig>,

    #[serde(default)]
    pub baseline: Option<BaselineConfig>,

    #[serde(default)]
    pub brand_match: Option<BrandMatchConfig>,
}

impl ScoringConfig {
    pub fn weight_profiles(&self) -> WeightProfiles {
        let mut profiles = WeightProfiles::default();
        if let Some(ref weights) = self.weights {
            if let Some(ref canonical) = weights.canonical {
                profiles.canonical = WeightProfile::new(CANONICAL, canonical.clone());
            }
            if let Some(ref brand) = weights.brand_weighted {
                profiles.brand_weighted = WeightProfile::new(BRAND_WEIGHTED, brand.clone());
            }
        }
        profiles
    }

    pub fn popularity(&self) -> PopularityConfig {
        self.popularity.clone().unwrap_or_default()
    }

    pub fn baseline(&self) -> BaselineConfig {
        self.baseline.clone().unwrap_or_default()
    }

    pub fn brand_match(&self) -> BrandMatchConfig {
        self.brand_match.clone().unwrap_or_default()
    }
}

/// Per-criterion weight maps keyed by the camelCase criterion name.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeightsConfig {
    #[serde(default)]
    pub canonical: Option<BTreeMap<Criterion, f64>>,
    #[serde(default)]
    pub brand_weighted: Option<BTreeMap<Criterion, f64>>,
}

/// Follower band.
///
/// Bands are checked in order and only the first match applies.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FollowerBand {
    /// Range expression over follower count (e.g., "10000-100000", ">1000000")
    pub range: String,

    /// Effect on score (e.g., "+15")
    pub effect: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PopularityConfig {
    pub follower_bands: Vec<FollowerBand>,

    /// Flat bonus keyed by platform name (case-insensitive). Platforms not
    /// listed get nothing.
    pub platform_bonus: BTreeMap<String, f64>,
}

impl Default for PopularityConfig {
    fn default() -> Self {
        let band = |range: &str, effect: &str| FollowerBand {
            range: range.to_string(),
            effect: effect.to_string(),
        };
        Self {
            // Mid-tier accounts beat mega accounts on purpose
            follower_bands: vec![
                band("10000-100000", "+15"),
                band("100001-500000", "+12"),
                band("500001-1000000", "+8"),
                band(">1000000", "+5"),
            ],
            platform_bonus: [
                ("Instagram", 12.0),
                ("YouTube", 10.0),
                ("TikTok", 8.0),
                ("Facebook", 5.0),
                ("Twitter", 3.0),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        }
    }
}

/// Parameters of the profile-based baseline estimate.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BaselineConfig {
    pub base_score: f64,

    /// Bio longer than `bio_threshold` chars earns `bio_bonus`
    pub bio_threshold: usize,
    pub bio_bonus: f64,
    /// Bio longer than `long_bio_threshold` chars earns `long_bio_bonus` on top
    pub long_bio_threshold: usize,
    pub long_bio_bonus: f64,

    pub post_bonus: f64,
    pub post_bonus_cap: f64,

    /// Awarded once if any recent post shows a strong engagement figure
    pub engagement_bonus: f64,

    /// Whether to add random variance to the estimate
    pub jitter: bool,
    pub jitter_min: i32,
    pub jitter_max: i32,

    pub min_score: i32,
    pub max_score: i32,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            base_score: 60.0,
            bio_threshold: 50,
            bio_bonus: 8.0,
            long_bio_threshold: 100,
            long_bio_bonus: 4.0,
            post_bonus: 2.0,
            post_bonus_cap: 8.0,
            engagement_bonus: 6.0,
            jitter: true,
            jitter_min: -8,
            jitter_max: 8,
            min_score: 35,
            max_score: 92,
        }
    }
}

/// Parameters of the brand match percentage.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BrandMatchConfig {
    pub base_score: f64,
    pub verified_bonus: f64,
    /// Per brand keyword found in the influencer's bio, category or keywords
    pub keyword_bonus: f64,
    pub keyword_bonus_cap: f64,
    /// Influencer category matches the brand industry
    pub industry_bonus: f64,
}

impl Default for BrandMatchConfig {
    fn default() -> Self {
        Self {
            base_score: 40.0,
            verified_bonus: 10.0,
            keyword_bonus: 5.0,
            keyword_bonus_cap: 15.0,
            industry_bonus: 5.0,
        }
    }
}
