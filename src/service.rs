use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::evaluation::{round2, Evaluation, EvaluationDraft};
use crate::influencer::{BrandProfile, Influencer, InfluencerProfile, KolRecord, Project};
use crate::random::RandomSource;
use crate::scoring::{
    compute_total_score, rank_influencers, sanitize_scores, score_breakdown, top_n, BrandFit,
    RankEntry, ScoreBreakdown, ScoringEngine,
};
use crate::store::{RepositoryError, Store};

/// Project, influencer and evaluation workflows over any [`Store`].
pub struct ScoutService<S> {
    store: S,
    engine: ScoringEngine,
}

fn not_found(kind: &str, key: &str) -> anyhow::Error {
    RepositoryError::NotFound(format!("{} '{}'", kind, key)).into()
}

/// Match a user-supplied key against an id (full or unique prefix) or a name.
fn resolve<'a, T>(
    items: &'a [T],
    key: &str,
    id: impl Fn(&T) -> Uuid,
    name: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    let key = key.trim();
    if let Ok(uuid) = Uuid::parse_str(key) {
        return items.iter().find(|item| id(*item) == uuid);
    }
    let lowered = key.to_lowercase();
    let by_name: Vec<&T> = items
        .iter()
        .filter(|item| name(*item).to_lowercase() == lowered)
        .collect();
    if by_name.len() == 1 {
        return by_name.into_iter().next();
    }
    if key.len() < 4 {
        return None;
    }
    let by_prefix: Vec<&T> = items
        .iter()
        .filter(|item| id(*item).to_string().starts_with(&lowered))
        .collect();
    if by_prefix.len() == 1 {
        by_prefix.into_iter().next()
    } else {
        None
    }
}

impl<S: Store> ScoutService<S> {
    pub fn new(store: S, engine: ScoringEngine) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn create_project(&self, name: &str, brand: Option<BrandProfile>) -> Result<Project> {
        let project = self
            .store
            .insert_project(Project::new(name, brand))
            .context("Failed to create project")?;
        info!(project = %project.id, name, "project created");
        Ok(project)
    }

    pub fn projects(&self) -> Result<Vec<Project>> {
        Ok(self.store.projects()?)
    }

    /// Find a project by id, unique id prefix, or exact name
    pub fn find_project(&self, key: &str) -> Result<Project> {
        let projects = self.store.projects()?;
        resolve(&projects, key, |p| p.id, |p| p.name.as_str())
            .cloned()
            .ok_or_else(|| not_found("project", key))
    }

    /// Find an influencer across all projects by id, unique id prefix, or exact name
    pub fn find_influencer(&self, key: &str) -> Result<Influencer> {
        let mut all = Vec::new();
        for project in self.store.projects()? {
            all.extend(self.store.influencers_in_project(&project.id)?);
        }
        resolve(&all, key, |i| i.id, |i| i.profile.name.as_str())
            .cloned()
            .ok_or_else(|| not_found("influencer", key))
    }

    pub fn influencers(&self, project_id: &Uuid) -> Result<Vec<Influencer>> {
        Ok(self.store.influencers_in_project(project_id)?)
    }

    /// Add an influencer with a baseline estimate as its initial latest score
    pub fn add_influencer(
        &self,
        project_id: &Uuid,
        profile: InfluencerProfile,
        rng: &mut dyn RandomSource,
    ) -> Result<Influencer> {
        let baseline = self.engine.baseline.estimate(&profile, rng);
        let mut influencer = Influencer::new(*project_id, profile);
        influencer.latest_score = Some(baseline as f64);
        let influencer = self
            .store
            .insert_influencer(influencer)
            .context("Failed to add influencer")?;
        info!(
            influencer = %influencer.id,
            name = %influencer.profile.name,
            baseline,
            "influencer added"
        );
        Ok(influencer)
    }

    fn project_of(&self, influencer: &Influencer) -> Result<Project> {
        self.store
            .project(&influencer.project_id)?
            .ok_or_else(|| not_found("project", &influencer.project_id.to_string()))
    }

    /// Itemised total the draft would receive, without storing anything
    pub fn preview_evaluation(&self, influencer_id: &Uuid, draft: &EvaluationDraft) -> Result<ScoreBreakdown> {
        let influencer = self
            .store
            .influencer(influencer_id)?
            .ok_or_else(|| not_found("influencer", &influencer_id.to_string()))?;
        let project = self.project_of(&influencer)?;
        let weights = self.engine.weights.select(project.brand_ranking_active());
        Ok(score_breakdown(&draft.scores, weights))
    }

    /// Compute the total with the project's active weight profile, append the
    /// evaluation and refresh the influencer's latest score. Criterion scores
    /// are stored as they entered the total.
    pub fn submit_evaluation(&self, influencer_id: &Uuid, draft: EvaluationDraft) -> Result<Evaluation> {
        let influencer = self
            .store
            .influencer(influencer_id)?
            .ok_or_else(|| not_found("influencer", &influencer_id.to_string()))?;
        let project = self.project_of(&influencer)?;
        let weights = self.engine.weights.select(project.brand_ranking_active());
        let total = compute_total_score(&draft.scores, weights);

        let evaluation = Evaluation {
            id: Uuid::new_v4(),
            project_id: project.id,
            influencer_id: influencer.id,
            scores: sanitize_scores(&draft.scores),
            total_score: round2(total),
            weight_profile: weights.name.clone(),
            notes: draft.notes,
            evaluator: draft.evaluator,
            created_at: Utc::now(),
        };
        let evaluation = self
            .store
            .record_evaluation(evaluation)
            .context("Failed to save evaluation")?;
        info!(
            influencer = %influencer.id,
            total = evaluation.total_score,
            profile = %evaluation.weight_profile,
            "evaluation recorded"
        );
        Ok(evaluation)
    }

    /// Evaluations for one influencer, newest first
    pub fn history(&self, influencer_id: &Uuid) -> Result<Vec<Evaluation>> {
        Ok(self.store.evaluations_for(influencer_id)?)
    }

    pub fn brand_fit(&self, influencer: &Influencer) -> Result<BrandFit> {
        let project = self.project_of(influencer)?;
        Ok(self.engine.brand.assess(&influencer.profile, project.brand.as_ref()))
    }

    /// Project leaderboard, best first. Brand match scores are attached when
    /// the project has a brand profile.
    pub fn leaderboard(&self, project_id: &Uuid, top: Option<usize>) -> Result<Vec<RankEntry>> {
        let project = self
            .store
            .project(project_id)?
            .ok_or_else(|| not_found("project", &project_id.to_string()))?;

        let entries: Vec<RankEntry> = self
            .store
            .influencers_in_project(project_id)?
            .into_iter()
            .map(|influencer| {
                let brand_match = project
                    .brand
                    .as_ref()
                    .map(|brand| self.engine.brand.score(&influencer.profile, brand));
                RankEntry::new(KolRecord::Tracked(influencer)).with_brand_match(brand_match)
            })
            .collect();

        debug!(project = %project.id, entries = entries.len(), "ranking");
        Ok(match top {
            Some(n) => top_n(entries, n),
            None => rank_influencers(entries),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::EvaluationScores;
    use crate::influencer::Platform;
    use crate::random::FixedRandom;
    use crate::store::MemoryStore;

    fn service() -> ScoutService<MemoryStore> {
        ScoutService::new(MemoryStore::new(), ScoringEngine::default())
    }

    fn draft(scores: EvaluationScores) -> EvaluationDraft {
        EvaluationDraft {
            scores,
            notes: "ok".to_string(),
            evaluator: "mei".to_string(),
        }
    }

    #[test]
    fn test_add_influencer_sets_baseline() {
        let svc = service();
        let project = svc.create_project("spring", None).unwrap();
        let profile = InfluencerProfile::new("a", Platform::Facebook, 0);
        let influencer = svc
            .add_influencer(&project.id, profile, &mut FixedRandom(0))
            .unwrap();
        assert_eq!(influencer.latest_score, Some(65.0));
    }

    #[test]
    fn test_canonical_profile_without_brand() {
        let svc = service();
        let project = svc.create_project("p", None).unwrap();
        let influencer = svc
            .add_influencer(&project.id, InfluencerProfile::new("a", Platform::Instagram, 1), &mut FixedRandom(0))
            .unwrap();
        let scores = EvaluationScores {
            brand_fit: 80.0,
            content_quality: 90.0,
            engagement_rate: 70.0,
            audience_profile: 60.0,
            professionalism: 100.0,
            business_ability: 50.0,
            brand_safety: 90.0,
            stability: 80.0,
        };
        let evaluation = svc.submit_evaluation(&influencer.id, draft(scores)).unwrap();
        assert_eq!(evaluation.total_score, 79.5);
        assert_eq!(evaluation.weight_profile, "canonical");
        let stored = svc.find_influencer(&influencer.id.to_string()).unwrap();
        assert_eq!(stored.latest_score, Some(79.5));
    }

    #[test]
    fn test_brand_weighted_profile_with_brand() {
        let svc = service();
        let project = svc
            .create_project("p", Some(BrandProfile { name: "b".to_string(), ..Default::default() }))
            .unwrap();
        let influencer = svc
            .add_influencer(&project.id, InfluencerProfile::new("a", Platform::Instagram, 1), &mut FixedRandom(0))
            .unwrap();
        let mut scores = EvaluationScores::uniform(50.0);
        scores.brand_fit = 100.0;
        scores.stability = 0.0;
        let evaluation = svc.submit_evaluation(&influencer.id, draft(scores)).unwrap();
        // 25 + 50 * 0.75
        assert_eq!(evaluation.total_score, 62.5);
        assert_eq!(evaluation.weight_profile, "brand-weighted");
    }

    #[test]
    fn test_latest_score_tracks_newest_evaluation() {
        let svc = service();
        let project = svc.create_project("p", None).unwrap();
        let influencer = svc
            .add_influencer(&project.id, InfluencerProfile::new("a", Platform::YouTube, 1), &mut FixedRandom(0))
            .unwrap();
        for value in [40.0, 90.0, 65.0] {
            svc.submit_evaluation(&influencer.id, draft(EvaluationScores::uniform(value)))
                .unwrap();
        }
        let history = svc.history(&influencer.id).unwrap();
        assert_eq!(history.len(), 3);
        let stored = svc.find_influencer(&influencer.id.to_string()).unwrap();
        assert_eq!(stored.latest_score, Some(history[0].total_score));
        assert_eq!(history[0].total_score, 65.0);
    }

    #[test]
    fn test_submit_for_unknown_influencer() {
        let svc = service();
        let result = svc.submit_evaluation(&Uuid::new_v4(), draft(EvaluationScores::default()));
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RepositoryError>(),
            Some(RepositoryError::NotFound(_))
        ));
    }

    #[test]
    fn test_find_project_by_name_and_prefix() {
        let svc = service();
        let project = svc.create_project("Summer Launch", None).unwrap();
        assert_eq!(svc.find_project("summer launch").unwrap().id, project.id);
        let prefix = &project.id.to_string()[..8];
        assert_eq!(svc.find_project(prefix).unwrap().id, project.id);
        assert!(svc.find_project("winter").is_err());
    }

    #[test]
    fn test_leaderboard_without_brand_uses_latest() {
        let svc = service();
        let project = svc.create_project("p", None).unwrap();
        let low = svc
            .add_influencer(&project.id, InfluencerProfile::new("low", Platform::parse("none"), 0), &mut FixedRandom(0))
            .unwrap();
        svc
            .add_influencer(&project.id, InfluencerProfile::new("high", Platform::Instagram, 50_000), &mut FixedRandom(0))
            .unwrap();
        let board = svc.leaderboard(&project.id, None).unwrap();
        assert_eq!(board[0].influencer.name(), "high");
        assert!(board.iter().all(|e| e.brand_match.is_none()));

        svc.submit_evaluation(&low.id, draft(EvaluationScores::uniform(100.0))).unwrap();
        let board = svc.leaderboard(&project.id, Some(1)).unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].influencer.name(), "low");
    }

    #[test]
    fn test_leaderboard_with_brand_uses_match() {
        let svc = service();
        let brand = BrandProfile {
            name: "b".to_string(),
            ..Default::default()
        };
        let project = svc.create_project("p", Some(brand)).unwrap();
        let mut verified = InfluencerProfile::new("verified", Platform::Instagram, 50_000);
        verified.verified = true;
        let plain = InfluencerProfile::new("plain", Platform::Twitter, 5_000_000);
        let plain = svc.add_influencer(&project.id, plain, &mut FixedRandom(0)).unwrap();
        svc.add_influencer(&project.id, verified, &mut FixedRandom(0)).unwrap();
        // A perfect evaluation does not outrank a better brand match
        svc.submit_evaluation(&plain.id, draft(EvaluationScores::uniform(100.0))).unwrap();

        let board = svc.leaderboard(&project.id, None).unwrap();
        assert_eq!(board[0].influencer.name(), "verified");
        assert_eq!(board[0].brand_match.as_ref().unwrap().overall_score, 77.0);
        assert_eq!(board[1].brand_match.as_ref().unwrap().overall_score, 48.0);
    }

    #[test]
    fn test_brand_fit_not_applicable() {
        let svc = service();
        let project = svc.create_project("p", None).unwrap();
        let influencer = svc
            .add_influencer(&project.id, InfluencerProfile::new("a", Platform::Instagram, 1), &mut FixedRandom(0))
            .unwrap();
        assert_eq!(svc.brand_fit(&influencer).unwrap(), BrandFit::NotApplicable);
    }

    #[test]
    fn test_preview_does_not_store() {
        let svc = service();
        let project = svc.create_project("p", None).unwrap();
        let influencer = svc
            .add_influencer(&project.id, InfluencerProfile::new("a", Platform::Instagram, 1), &mut FixedRandom(0))
            .unwrap();
        let breakdown = svc
            .preview_evaluation(&influencer.id, &draft(EvaluationScores::uniform(80.0)))
            .unwrap();
        assert!((breakdown.total - 80.0).abs() < 1e-9);
        assert!(svc.history(&influencer.id).unwrap().is_empty());
    }
}
