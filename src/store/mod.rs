pub mod file;
pub mod memory;

pub use file::{default_data_path, JsonFileStore};
pub use memory::MemoryStore;

use crate::evaluation::Evaluation;
use crate::influencer::{Influencer, Project};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const STORE_VERSION: u32 = 1;

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("{0} not found")]
    NotFound(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("unsupported data file version: {0}")]
    UnsupportedVersion(u32),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub trait ProjectRepository: Send + Sync {
    fn insert_project(&self, project: Project) -> Result<Project, RepositoryError>;
    fn project(&self, id: &Uuid) -> Result<Option<Project>, RepositoryError>;
    fn projects(&self) -> Result<Vec<Project>, RepositoryError>;
}

pub trait InfluencerRepository: Send + Sync {
    fn insert_influencer(&self, influencer: Influencer) -> Result<Influencer, RepositoryError>;
    fn influencer(&self, id: &Uuid) -> Result<Option<Influencer>, RepositoryError>;
    /// In insertion order
    fn influencers_in_project(&self, project_id: &Uuid) -> Result<Vec<Influencer>, RepositoryError>;
}

pub trait EvaluationRepository: Send + Sync {
    /// Append the evaluation and set the influencer's `latest_score` to its
    /// total in one step. Fails with `NotFound` if the influencer is unknown.
    fn record_evaluation(&self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError>;
    /// Newest first
    fn evaluations_for(&self, influencer_id: &Uuid) -> Result<Vec<Evaluation>, RepositoryError>;
}

/// Everything the service layer needs from storage.
pub trait Store: ProjectRepository + InfluencerRepository + EvaluationRepository {}

impl<T> Store for T where T: ProjectRepository + InfluencerRepository + EvaluationRepository {}

/// Whole-store document shared by the in-memory and file-backed stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    pub version: u32,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub influencers: Vec<Influencer>,
    #[serde(default)]
    pub evaluations: Vec<Evaluation>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreData {
    pub fn new() -> Self {
        Self {
            version: STORE_VERSION,
            projects: Vec::new(),
            influencers: Vec::new(),
            evaluations: Vec::new(),
        }
    }

    pub fn insert_project(&mut self, project: Project) -> Result<Project, RepositoryError> {
        if self.projects.iter().any(|p| p.id == project.id) {
            return Err(RepositoryError::Conflict);
        }
        self.projects.push(project.clone());
        Ok(project)
    }

    pub fn project(&self, id: &Uuid) -> Option<Project> {
        self.projects.iter().find(|p| &p.id == id).cloned()
    }

    pub fn insert_influencer(&mut self, influencer: Influencer) -> Result<Influencer, RepositoryError> {
        if !self.projects.iter().any(|p| p.id == influencer.project_id) {
            return Err(RepositoryError::NotFound(format!(
                "project {}",
                influencer.project_id
            )));
        }
        if self.influencers.iter().any(|i| i.id == influencer.id) {
            return Err(RepositoryError::Conflict);
        }
        self.influencers.push(influencer.clone());
        Ok(influencer)
    }

    pub fn influencer(&self, id: &Uuid) -> Option<Influencer> {
        self.influencers.iter().find(|i| &i.id == id).cloned()
    }

    pub fn influencers_in_project(&self, project_id: &Uuid) -> Vec<Influencer> {
        self.influencers
            .iter()
            .filter(|i| &i.project_id == project_id)
            .cloned()
            .collect()
    }

    pub fn record_evaluation(&mut self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError> {
        if self.evaluations.iter().any(|e| e.id == evaluation.id) {
            return Err(RepositoryError::Conflict);
        }
        let influencer_id = evaluation.influencer_id;
        let idx = self
            .influencers
            .iter()
            .position(|i| i.id == influencer_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("influencer {}", influencer_id)))?;
        self.evaluations.push(evaluation.clone());

        // Newest by timestamp, later append on ties, same order as evaluations_for
        let newest = self
            .evaluations
            .iter()
            .filter(|e| e.influencer_id == influencer_id)
            .fold(None::<&Evaluation>, |best, e| match best {
                Some(b) if b.created_at > e.created_at => Some(b),
                _ => Some(e),
            });
        self.influencers[idx].latest_score = newest.map(|e| e.total_score);
        Ok(evaluation)
    }

    pub fn evaluations_for(&self, influencer_id: &Uuid) -> Vec<Evaluation> {
        // Reverse first so that equal timestamps still list the later append first
        let mut list: Vec<Evaluation> = self
            .evaluations
            .iter()
            .rev()
            .filter(|e| &e.influencer_id == influencer_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }
}
