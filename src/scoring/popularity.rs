use crate::influencer::{InfluencerProfile, Platform};

use super::config::PopularityConfig;
use super::factors::{Effect, RangeOp};

/// Follower and platform contributions for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PopularityScore {
    pub follower_bonus: f64,
    pub platform_bonus: f64,
}

impl PopularityScore {
    pub fn total(&self) -> f64 {
        self.follower_bonus + self.platform_bonus
    }
}

/// Popularity policy shared by the baseline estimate and the brand match.
///
/// Built once from [`PopularityConfig`]. Bands or bonuses that fail to parse
/// are dropped here; `validate_scoring` reports them at startup.
#[derive(Debug, Clone)]
pub struct PopularityPolicy {
    bands: Vec<(RangeOp, Effect)>,
    platforms: Vec<(Platform, f64)>,
}

impl Default for PopularityPolicy {
    fn default() -> Self {
        Self::from_config(&PopularityConfig::default())
    }
}

impl PopularityPolicy {
    pub fn from_config(config: &PopularityConfig) -> Self {
        let bands = config
            .follower_bands
            .iter()
            .filter_map(|band| {
                let range = RangeOp::parse(&band.range).ok()?;
                let effect = Effect::parse(&band.effect).ok()?;
                Some((range, effect))
            })
            .collect();
        let platforms = config
            .platform_bonus
            .iter()
            .map(|(name, bonus)| (Platform::parse(name), *bonus))
            .collect();
        Self { bands, platforms }
    }

    /// Bonus from the first follower band that matches, or 0 if none does
    pub fn follower_bonus(&self, followers: u64) -> f64 {
        self.bands
            .iter()
            .find(|(range, _)| range.matches(followers))
            .map(|(_, effect)| effect.apply(0.0))
            .unwrap_or(0.0)
    }

    pub fn platform_bonus(&self, platform: &Platform) -> f64 {
        self.platforms
            .iter()
            .find(|(p, _)| p == platform)
            .map(|(_, bonus)| *bonus)
            .unwrap_or(0.0)
    }

    pub fn score(&self, profile: &InfluencerProfile) -> PopularityScore {
        PopularityScore {
            follower_bonus: self.follower_bonus(profile.follower_count()),
            platform_bonus: self.platform_bonus(&profile.platform),
        }
    }
}
