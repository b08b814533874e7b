use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One of the eight evaluation criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Criterion {
    BrandFit,
    ContentQuality,
    EngagementRate,
    AudienceProfile,
    Professionalism,
    BusinessAbility,
    BrandSafety,
    Stability,
}

impl Criterion {
    pub const ALL: [Criterion; 8] = [
        Criterion::BrandFit,
        Criterion::ContentQuality,
        Criterion::EngagementRate,
        Criterion::AudienceProfile,
        Criterion::Professionalism,
        Criterion::BusinessAbility,
        Criterion::BrandSafety,
        Criterion::Stability,
    ];

    /// Field name as used in stored records and config files
    pub fn key(&self) -> &'static str {
        match self {
            Criterion::BrandFit => "brandFit",
            Criterion::ContentQuality => "contentQuality",
            Criterion::EngagementRate => "engagementRate",
            Criterion::AudienceProfile => "audienceProfile",
            Criterion::Professionalism => "professionalism",
            Criterion::BusinessAbility => "businessAbility",
            Criterion::BrandSafety => "brandSafety",
            Criterion::Stability => "stability",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Criterion::BrandFit => "Brand fit",
            Criterion::ContentQuality => "Content quality",
            Criterion::EngagementRate => "Engagement rate",
            Criterion::AudienceProfile => "Audience profile",
            Criterion::Professionalism => "Professionalism",
            Criterion::BusinessAbility => "Business ability",
            Criterion::BrandSafety => "Brand safety",
            Criterion::Stability => "Stability",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw per-criterion scores, nominally 0-100 each.
///
/// Values are stored as given. Clamping and NaN handling happen in the
/// scoring engine so that slider input is never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationScores {
    #[serde(default)]
    pub brand_fit: f64,
    #[serde(default)]
    pub content_quality: f64,
    #[serde(default)]
    pub engagement_rate: f64,
    #[serde(default)]
    pub audience_profile: f64,
    #[serde(default)]
    pub professionalism: f64,
    #[serde(default)]
    pub business_ability: f64,
    #[serde(default)]
    pub brand_safety: f64,
    #[serde(default)]
    pub stability: f64,
}

impl EvaluationScores {
    /// All eight criteria set to the same value
    pub fn uniform(value: f64) -> Self {
        Self {
            brand_fit: value,
            content_quality: value,
            engagement_rate: value,
            audience_profile: value,
            professionalism: value,
            business_ability: value,
            brand_safety: value,
            stability: value,
        }
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::BrandFit => self.brand_fit,
            Criterion::ContentQuality => self.content_quality,
            Criterion::EngagementRate => self.engagement_rate,
            Criterion::AudienceProfile => self.audience_profile,
            Criterion::Professionalism => self.professionalism,
            Criterion::BusinessAbility => self.business_ability,
            Criterion::BrandSafety => self.brand_safety,
            Criterion::Stability => self.stability,
        }
    }

    pub fn set(&mut self, criterion: Criterion, value: f64) {
        let slot = match criterion {
            Criterion::BrandFit => &mut self.brand_fit,
            Criterion::ContentQuality => &mut self.content_quality,
            Criterion::EngagementRate => &mut self.engagement_rate,
            Criterion::AudienceProfile => &mut self.audience_profile,
            Criterion::Professionalism => &mut self.professionalism,
            Criterion::BusinessAbility => &mut self.business_ability,
            Criterion::BrandSafety => &mut self.brand_safety,
            Criterion::Stability => &mut self.stability,
        };
        *slot = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        Criterion::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

/// What an evaluator submits. The total is computed on submission.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationDraft {
    pub scores: EvaluationScores,
    #[serde(default)]
    pub notes: String,
    pub evaluator: String,
}

/// A stored evaluation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub id: Uuid,
    pub project_id: Uuid,
    pub influencer_id: Uuid,
    pub scores: EvaluationScores,
    pub total_score: f64,
    /// Name of the weight profile the total was computed with
    pub weight_profile: String,
    #[serde(default)]
    pub notes: String,
    pub evaluator: String,
    pub created_at: DateTime<Utc>,
}

/// Round to 2 decimal places for storage
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
