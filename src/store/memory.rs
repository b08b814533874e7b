use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{
    EvaluationRepository, InfluencerRepository, ProjectRepository, RepositoryError, StoreData,
};
use crate::evaluation::Evaluation;
use crate::influencer::{Influencer, Project};

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: StoreData) -> Self {
        Self {
            inner: Mutex::new(data),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreData>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Result<StoreData, RepositoryError> {
        Ok(self.lock()?.clone())
    }
}

impl ProjectRepository for MemoryStore {
    fn insert_project(&self, project: Project) -> Result<Project, RepositoryError> {
        self.lock()?.insert_project(project)
    }

    fn project(&self, id: &Uuid) -> Result<Option<Project>, RepositoryError> {
        Ok(self.lock()?.project(id))
    }

    fn projects(&self) -> Result<Vec<Project>, RepositoryError> {
        Ok(self.lock()?.projects.clone())
    }
}

impl InfluencerRepository for MemoryStore {
    fn insert_influencer(&self, influencer: Influencer) -> Result<Influencer, RepositoryError> {
        self.lock()?.insert_influencer(influencer)
    }

    fn influencer(&self, id: &Uuid) -> Result<Option<Influencer>, RepositoryError> {
        Ok(self.lock()?.influencer(id))
    }

    fn influencers_in_project(&self, project_id: &Uuid) -> Result<Vec<Influencer>, RepositoryError> {
        Ok(self.lock()?.influencers_in_project(project_id))
    }
}

impl EvaluationRepository for MemoryStore {
    fn record_evaluation(&self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError> {
        self.lock()?.record_evaluation(evaluation)
    }

    fn evaluations_for(&self, influencer_id: &Uuid) -> Result<Vec<Evaluation>, RepositoryError> {
        Ok(self.lock()?.evaluations_for(influencer_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::influencer::{InfluencerProfile, Platform};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_projects_listed_in_insertion_order() {
        let store = MemoryStore::new();
        store.insert_project(Project::new("first", None)).unwrap();
        store.insert_project(Project::new("second", None)).unwrap();
        let names: Vec<String> = store.projects().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_influencers_scoped_to_project() {
        let store = MemoryStore::new();
        let a = store.insert_project(Project::new("a", None)).unwrap();
        let b = store.insert_project(Project::new("b", None)).unwrap();
        store
            .insert_influencer(Influencer::new(a.id, InfluencerProfile::new("x", Platform::Instagram, 1)))
            .unwrap();
        store
            .insert_influencer(Influencer::new(b.id, InfluencerProfile::new("y", Platform::TikTok, 1)))
            .unwrap();
        let in_a = store.influencers_in_project(&a.id).unwrap();
        assert_eq!(in_a.len(), 1);
        assert_eq!(in_a[0].profile.name, "x");
    }

    #[test]
    fn test_concurrent_inserts() {
        let store = Arc::new(MemoryStore::new());
        let project_id = store.insert_project(Project::new("p", None)).unwrap().id;
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let profile = InfluencerProfile::new(format!("k{}", i), Platform::YouTube, i);
                    store.insert_influencer(Influencer::new(project_id, profile)).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.influencers_in_project(&project_id).unwrap().len(), 8);
    }

    #[test]
    fn test_missing_lookups_return_none() {
        let store = MemoryStore::new();
        assert!(store.project(&Uuid::new_v4()).unwrap().is_none());
        assert!(store.influencer(&Uuid::new_v4()).unwrap().is_none());
        assert!(store.evaluations_for(&Uuid::new_v4()).unwrap().is_empty());
    }
}
