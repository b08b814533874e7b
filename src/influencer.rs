use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Social platform an influencer publishes on.
///
/// Parsing is case-insensitive and never fails: names outside the known set
/// are kept verbatim as `Other` so they round-trip through storage and earn
/// no platform bonus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Instagram,
    YouTube,
    TikTok,
    Facebook,
    Twitter,
    Other(String),
}

impl Platform {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "instagram" | "ig" => Platform::Instagram,
            "youtube" | "yt" => Platform::YouTube,
            "tiktok" => Platform::TikTok,
            "facebook" | "fb" => Platform::Facebook,
            "twitter" | "x" => Platform::Twitter,
            _ => Platform::Other(s.trim().to_string()),
        }
    }

    /// Canonical display name, also the key used in platform bonus tables
    pub fn name(&self) -> &str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::YouTube => "YouTube",
            Platform::TikTok => "TikTok",
            Platform::Facebook => "Facebook",
            Platform::Twitter => "Twitter",
            Platform::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        Platform::parse(&value)
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.name().to_string()
    }
}

/// A recent post as reported by the profile source.
/// Engagement is free text ("1.2k likes", "3萬", "845").
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecentPost {
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub engagement: String,
}

/// Influencer metadata acquired when the influencer is added.
/// Read-only input to every scoring function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerProfile {
    pub name: String,
    pub platform: Platform,
    // Signed so that bad upstream data can be represented; scoring treats negatives as 0
    #[serde(default)]
    pub followers: i64,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub recent_posts: Vec<RecentPost>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl InfluencerProfile {
    pub fn new(name: impl Into<String>, platform: Platform, followers: i64) -> Self {
        Self {
            name: name.into(),
            platform,
            followers,
            verified: false,
            bio: String::new(),
            category: None,
            keywords: Vec::new(),
            recent_posts: Vec::new(),
            avatar_url: None,
        }
    }

    /// Follower count with negative values treated as zero
    pub fn follower_count(&self) -> u64 {
        self.followers.max(0) as u64
    }

    /// Bio length in characters (not bytes, bios are frequently CJK)
    pub fn bio_len(&self) -> usize {
        self.bio.chars().count()
    }
}

/// Brand configuration attached to a project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfile {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub target_audience: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub campaign_goals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub brand: Option<BrandProfile>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>, brand: Option<BrandProfile>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            brand,
            created_at: Utc::now(),
        }
    }

    /// Brand-fit ranking is active whenever the project carries a brand profile
    pub fn brand_ranking_active(&self) -> bool {
        self.brand.is_some()
    }
}

/// A tracked influencer. `latest_score` caches the newest evaluation total,
/// or the baseline estimate before anyone has evaluated them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Influencer {
    pub id: Uuid,
    pub project_id: Uuid,
    pub profile: InfluencerProfile,
    pub latest_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Influencer {
    pub fn new(project_id: Uuid, profile: InfluencerProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            profile,
            latest_score: None,
            created_at: Utc::now(),
        }
    }
}

/// Flat sample record used by demo data sets, without a nested profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoInfluencer {
    pub name: String,
    pub platform: Platform,
    pub followers: i64,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Either shape an influencer can arrive in. Callers read fields through the
/// accessors instead of matching on the shape themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KolRecord {
    Demo(DemoInfluencer),
    Tracked(Influencer),
}

impl KolRecord {
    pub fn name(&self) -> &str {
        match self {
            KolRecord::Demo(d) => &d.name,
            KolRecord::Tracked(i) => &i.profile.name,
        }
    }

    pub fn platform(&self) -> &Platform {
        match self {
            KolRecord::Demo(d) => &d.platform,
            KolRecord::Tracked(i) => &i.profile.platform,
        }
    }

    pub fn followers(&self) -> u64 {
        match self {
            KolRecord::Demo(d) => d.followers.max(0) as u64,
            KolRecord::Tracked(i) => i.profile.follower_count(),
        }
    }

    pub fn avatar(&self) -> Option<&str> {
        match self {
            KolRecord::Demo(d) => d.avatar.as_deref(),
            KolRecord::Tracked(i) => i.profile.avatar_url.as_deref(),
        }
    }

    pub fn latest_score(&self) -> Option<f64> {
        match self {
            KolRecord::Demo(d) => d.score,
            KolRecord::Tracked(i) => i.latest_score,
        }
    }

    /// Profile view for scoring. Demo records carry only the basics.
    pub fn profile(&self) -> InfluencerProfile {
        match self {
            KolRecord::Demo(d) => {
                let mut profile = InfluencerProfile::new(&d.name, d.platform.clone(), d.followers);
                profile.avatar_url = d.avatar.clone();
                profile
            }
            KolRecord::Tracked(i) => i.profile.clone(),
        }
    }
}

impl From<Influencer> for KolRecord {
    fn from(value: Influencer) -> Self {
        KolRecord::Tracked(value)
    }
}

impl From<DemoInfluencer> for KolRecord {
    fn from(value: DemoInfluencer) -> Self {
        KolRecord::Demo(value)
    }
}
