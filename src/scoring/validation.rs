use super::config::ScoringConfig;
use super::factors::{Effect, RangeOp};
use super::weights::WeightProfile;

fn check_profile(path: &str, profile: &WeightProfile, errors: &mut Vec<String>) {
    for (criterion, weight) in &profile.weights {
        if !weight.is_finite() || *weight < 0.0 || *weight > 1.0 {
            errors.push(format!(
                "{}.{}: weight {} must be between 0 and 1",
                path, criterion, weight
            ));
        }
    }
}

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let profiles = config.weight_profiles();
    check_profile("scoring.weights.canonical", &profiles.canonical, &mut errors);
    check_profile("scoring.weights.brand_weighted", &profiles.brand_weighted, &mut errors);

    if let Some(ref popularity) = config.popularity {
        for (i, band) in popularity.follower_bands.iter().enumerate() {
            if let Err(e) = RangeOp::parse(&band.range) {
                errors.push(format!(
                    "scoring.popularity.follower_bands[{}].range: invalid '{}' - {}",
                    i, band.range, e
                ));
            }
            match Effect::parse(&band.effect) {
                Ok(Effect::Add(_)) => {}
                Ok(Effect::Multiply(_)) => errors.push(format!(
                    "scoring.popularity.follower_bands[{}].effect: '{}' must be additive (+N)",
                    i, band.effect
                )),
                Err(e) => errors.push(format!(
                    "scoring.popularity.follower_bands[{}].effect: invalid '{}' - {}",
                    i, band.effect, e
                )),
            }
        }
        for (platform, bonus) in &popularity.platform_bonus {
            if !bonus.is_finite() {
                errors.push(format!(
                    "scoring.popularity.platform_bonus.{}: must be a finite number",
                    platform
                ));
            }
        }
    }

    if let Some(ref baseline) = config.baseline {
        if baseline.min_score > baseline.max_score {
            errors.push(format!(
                "scoring.baseline: min_score {} exceeds max_score {}",
                baseline.min_score, baseline.max_score
            ));
        }
        if baseline.jitter_min > baseline.jitter_max {
            errors.push(format!(
                "scoring.baseline: jitter_min {} exceeds jitter_max {}",
                baseline.jitter_min, baseline.jitter_max
            ));
        }
        if baseline.long_bio_threshold < baseline.bio_threshold {
            errors.push("scoring.baseline.long_bio_threshold: must not be below bio_threshold".to_string());
        }
        if baseline.post_bonus_cap < 0.0 {
            errors.push("scoring.baseline.post_bonus_cap: must be non-negative".to_string());
        }
    }

    if let Some(ref brand) = config.brand_match {
        if brand.keyword_bonus_cap < 0.0 {
            errors.push("scoring.brand_match.keyword_bonus_cap: must be non-negative".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Non-fatal findings: weight profiles that do not sum to 1.0.
/// The engine uses weights as given, so these are only reported.
pub fn weight_warnings(config: &ScoringConfig) -> Vec<String> {
    let profiles = config.weight_profiles();
    [&profiles.canonical, &profiles.brand_weighted]
        .into_iter()
        .filter(|p| !p.is_normalized())
        .map(|p| format!("weight profile '{}' sums to {:.4}, not 1.0", p.name, p.sum()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Criterion;
    use crate::scoring::config::{
        BaselineConfig, BrandMatchConfig, FollowerBand, PopularityConfig, WeightsConfig,
    };

    #[test]
    fn test_default_config_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
        assert!(weight_warnings(&ScoringConfig::default()).is_empty());
    }

    #[test]
    fn test_explicit_defaults_valid() {
        let config = ScoringConfig {
            weights: None,
            popularity: Some(PopularityConfig::default()),
            baseline: Some(BaselineConfig::default()),
            brand_match: Some(BrandMatchConfig::default()),
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_weight_out_of_range() {
        let config = ScoringConfig {
            weights: Some(WeightsConfig {
                canonical: Some([(Criterion::BrandFit, 1.5)].into_iter().collect()),
                brand_weighted: None,
            }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.weights.canonical.brandFit"));
    }

    #[test]
    fn test_invalid_band_range_and_effect() {
        let config = ScoringConfig {
            popularity: Some(PopularityConfig {
                follower_bands: vec![
                    FollowerBand { range: "many".to_string(), effect: "+5".to_string() },
                    FollowerBand { range: ">10".to_string(), effect: "bad".to_string() },
                ],
                platform_bonus: Default::default(),
            }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("follower_bands[0].range"));
        assert!(errors[1].contains("follower_bands[1].effect"));
    }

    #[test]
    fn test_multiplicative_band_rejected() {
        let config = ScoringConfig {
            popularity: Some(PopularityConfig {
                follower_bands: vec![FollowerBand {
                    range: ">10".to_string(),
                    effect: "x2".to_string(),
                }],
                platform_bonus: Default::default(),
            }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("must be additive"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            baseline: Some(BaselineConfig {
                min_score: 90,
                max_score: 10,    // Error 1
                jitter_min: 5,
                jitter_max: -5,   // Error 2
                ..BaselineConfig::default()
            }),
            brand_match: Some(BrandMatchConfig {
                keyword_bonus_cap: -1.0, // Error 3
                ..BrandMatchConfig::default()
            }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_weight_drift_is_warning_only() {
        let config = ScoringConfig {
            weights: Some(WeightsConfig {
                canonical: None,
                brand_weighted: Some(
                    [(Criterion::BrandFit, 0.5), (Criterion::ContentQuality, 0.2)]
                        .into_iter()
                        .collect(),
                ),
            }),
            ..ScoringConfig::default()
        };
        assert!(validate_scoring(&config).is_ok());
        let warnings = weight_warnings(&config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("brand-weighted"));
        assert!(warnings[0].contains("0.7000"));
    }
}
