use crate::influencer::KolRecord;
use std::cmp::Ordering;

use super::brand::BrandMatch;

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub influencer: KolRecord,
    pub latest_score: Option<f64>,
    pub brand_match: Option<BrandMatch>,
}

impl RankEntry {
    pub fn new(influencer: KolRecord) -> Self {
        let latest_score = influencer.latest_score();
        Self {
            influencer,
            latest_score,
            brand_match: None,
        }
    }

    pub fn with_brand_match(mut self, brand_match: Option<BrandMatch>) -> Self {
        self.brand_match = brand_match;
        self
    }

    fn latest_key(&self) -> f64 {
        match self.latest_score {
            Some(score) if !score.is_nan() => score,
            _ => 0.0,
        }
    }

    fn brand_key(&self) -> Option<f64> {
        self.brand_match
            .as_ref()
            .map(|m| m.overall_score)
            .filter(|s| !s.is_nan())
    }
}

/// Rank order of two entries: `Less` means `a` belongs above `b`.
///
/// Brand match scores are compared only when both entries have one;
/// otherwise the latest score decides, with a missing score counting as 0.
pub fn compare_entries(a: &RankEntry, b: &RankEntry) -> Ordering {
    let (ka, kb) = match (a.brand_key(), b.brand_key()) {
        (Some(x), Some(y)) => (x, y),
        _ => (a.latest_key(), b.latest_key()),
    };
    kb.partial_cmp(&ka).unwrap_or(Ordering::Equal)
}

/// Sort entries best first, keeping input order among equal keys.
///
/// The pairwise rule above is not transitive when only some entries carry
/// a brand match, and `slice::sort_by` may panic on such comparators, so
/// this uses a plain stable insertion sort.
pub fn rank_influencers(mut entries: Vec<RankEntry>) -> Vec<RankEntry> {
    for i in 1..entries.len() {
        let mut j = i;
        while j > 0 && compare_entries(&entries[j - 1], &entries[j]) == Ordering::Greater {
            entries.swap(j - 1, j);
            j -= 1;
        }
    }
    entries
}

/// First `n` entries of the ranking (for top-N charts)
pub fn top_n(entries: Vec<RankEntry>, n: usize) -> Vec<RankEntry> {
    let mut ranked = rank_influencers(entries);
    ranked.truncate(n);
    ranked
}
