use crate::evaluation::Criterion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CANONICAL: &str = "canonical";
pub const BRAND_WEIGHTED: &str = "brand-weighted";

/// Named mapping from criterion to its share of the total score.
///
/// Criteria missing from the map contribute nothing. Weights are used as
/// given: a profile that drifts from a sum of 1.0 is not renormalised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile {
    pub name: String,
    pub weights: BTreeMap<Criterion, f64>,
}

impl WeightProfile {
    pub fn new(name: impl Into<String>, weights: impl IntoIterator<Item = (Criterion, f64)>) -> Self {
        Self {
            name: name.into(),
            weights: weights.into_iter().collect(),
        }
    }

    /// Eight criteria, used whenever brand-fit ranking is inactive
    pub fn canonical() -> Self {
        Self::new(
            CANONICAL,
            [
                (Criterion::BrandFit, 0.15),
                (Criterion::ContentQuality, 0.20),
                (Criterion::EngagementRate, 0.15),
                (Criterion::AudienceProfile, 0.10),
                (Criterion::Professionalism, 0.15),
                (Criterion::BusinessAbility, 0.10),
                (Criterion::BrandSafety, 0.10),
                (Criterion::Stability, 0.05),
            ],
        )
    }

    /// Seven criteria with brand fit emphasised; stability is excluded
    pub fn brand_weighted() -> Self {
        Self::new(
            BRAND_WEIGHTED,
            [
                (Criterion::BrandFit, 0.25),
                (Criterion::ContentQuality, 0.20),
                (Criterion::EngagementRate, 0.15),
                (Criterion::AudienceProfile, 0.15),
                (Criterion::Professionalism, 0.10),
                (Criterion::BusinessAbility, 0.10),
                (Criterion::BrandSafety, 0.05),
            ],
        )
    }

    pub fn weight(&self, criterion: Criterion) -> f64 {
        self.weights.get(&criterion).copied().unwrap_or(0.0)
    }

    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }

    /// True when the weights add up to 1.0 within floating point drift
    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-9
    }
}

/// The two named profiles the system switches between.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightProfiles {
    pub canonical: WeightProfile,
    pub brand_weighted: WeightProfile,
}

impl Default for WeightProfiles {
    fn default() -> Self {
        Self {
            canonical: WeightProfile::canonical(),
            brand_weighted: WeightProfile::brand_weighted(),
        }
    }
}

impl WeightProfiles {
    pub fn select(&self, brand_ranking_active: bool) -> &WeightProfile {
        if brand_ranking_active {
            &self.brand_weighted
        } else {
            &self.canonical
        }
    }

    pub fn by_name(&self, name: &str) -> Option<&WeightProfile> {
        [&self.canonical, &self.brand_weighted]
            .into_iter()
            .find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_sums_to_one() {
        let profile = WeightProfile::canonical();
        assert_eq!(profile.weights.len(), 8);
        assert!(profile.is_normalized());
    }

    #[test]
    fn test_brand_weighted_excludes_stability() {
        let profile = WeightProfile::brand_weighted();
        assert_eq!(profile.weights.len(), 7);
        assert_eq!(profile.weight(Criterion::Stability), 0.0);
        assert_eq!(profile.weight(Criterion::BrandFit), 0.25);
        assert!(profile.is_normalized());
    }

    #[test]
    fn test_select_by_brand_state() {
        let profiles = WeightProfiles::default();
        assert_eq!(profiles.select(false).name, CANONICAL);
        assert_eq!(profiles.select(true).name, BRAND_WEIGHTED);
    }

    #[test]
    fn test_by_name() {
        let profiles = WeightProfiles::default();
        assert!(profiles.by_name("canonical").is_some());
        assert!(profiles.by_name("brand-weighted").is_some());
        assert!(profiles.by_name("other").is_none());
    }

    #[test]
    fn test_unnormalized_detected() {
        let profile = WeightProfile::new("lopsided", [(Criterion::BrandFit, 0.7)]);
        assert!(!profile.is_normalized());
    }
}
