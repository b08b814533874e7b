use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    EvaluationRepository, InfluencerRepository, ProjectRepository, RepositoryError, StoreData,
    STORE_VERSION,
};
use crate::evaluation::Evaluation;
use crate::influencer::{Influencer, Project};

/// Get the default data file path (~/.config/kol-scout/data.json)
pub fn default_data_path() -> PathBuf {
    crate::config::get_config_dir().join("data.json")
}

/// Load store data from a JSON file
///
/// If the file doesn't exist, returns a new empty store.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_store_data(path: &Path) -> Result<StoreData, RepositoryError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreData::new()),
        Err(e) => return Err(e.into()),
    };

    let data: StoreData = serde_json::from_reader(file)?;
    if data.version != STORE_VERSION {
        return Err(RepositoryError::UnsupportedVersion(data.version));
    }
    Ok(data)
}

/// Save store data atomically, creating the parent directory if needed.
/// The file is never left half-written.
pub fn save_store_data(path: &Path, data: &StoreData) -> Result<(), RepositoryError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = AtomicWriteFile::open(path)?;
    serde_json::to_writer_pretty(&mut file, data)?;
    file.commit()?;
    debug!(path = %path.display(), "data file written");
    Ok(())
}

/// Store persisted to a single JSON document.
///
/// Every mutation is written through before it becomes visible; a failed
/// write leaves both the file and the in-memory copy unchanged.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: Mutex<StoreData>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let data = load_store_data(&path)?;
        info!(
            path = %path.display(),
            projects = data.projects.len(),
            influencers = data.influencers.len(),
            evaluations = data.evaluations.len(),
            "opened data file"
        );
        Ok(Self {
            path,
            inner: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreData>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }

    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut StoreData) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut current = self.lock()?;
        let mut next = current.clone();
        let result = op(&mut next)?;
        save_store_data(&self.path, &next)?;
        *current = next;
        Ok(result)
    }
}

impl ProjectRepository for JsonFileStore {
    fn insert_project(&self, project: Project) -> Result<Project, RepositoryError> {
        self.mutate(|data| data.insert_project(project))
    }

    fn project(&self, id: &Uuid) -> Result<Option<Project>, RepositoryError> {
        Ok(self.lock()?.project(id))
    }

    fn projects(&self) -> Result<Vec<Project>, RepositoryError> {
        Ok(self.lock()?.projects.clone())
    }
}

impl InfluencerRepository for JsonFileStore {
    fn insert_influencer(&self, influencer: Influencer) -> Result<Influencer, RepositoryError> {
        self.mutate(|data| data.insert_influencer(influencer))
    }

    fn influencer(&self, id: &Uuid) -> Result<Option<Influencer>, RepositoryError> {
        Ok(self.lock()?.influencer(id))
    }

    fn influencers_in_project(&self, project_id: &Uuid) -> Result<Vec<Influencer>, RepositoryError> {
        Ok(self.lock()?.influencers_in_project(project_id))
    }
}

impl EvaluationRepository for JsonFileStore {
    fn record_evaluation(&self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError> {
        self.mutate(|data| data.record_evaluation(evaluation))
    }

    fn evaluations_for(&self, influencer_id: &Uuid) -> Result<Vec<Evaluation>, RepositoryError> {
        Ok(self.lock()?.evaluations_for(influencer_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::influencer::{BrandProfile, InfluencerProfile, Platform};

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let data = load_store_data(&dir.path().join("missing.json")).unwrap();
        assert_eq!(data.version, 1);
        assert!(data.projects.is_empty());
    }

    #[test]
    fn test_save_and_reopen_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");

        let brand = BrandProfile {
            name: "Acme".to_string(),
            keywords: vec!["coffee".to_string()],
            ..BrandProfile::default()
        };
        let project_id = {
            let store = JsonFileStore::open(&path).unwrap();
            let project = store.insert_project(Project::new("launch", Some(brand.clone()))).unwrap();
            store
                .insert_influencer(Influencer::new(
                    project.id,
                    InfluencerProfile::new("barista", Platform::Instagram, 42_000),
                ))
                .unwrap();
            project.id
        };

        let reopened = JsonFileStore::open(&path).unwrap();
        let project = reopened.project(&project_id).unwrap().unwrap();
        assert_eq!(project.brand, Some(brand));
        let influencers = reopened.influencers_in_project(&project_id).unwrap();
        assert_eq!(influencers.len(), 1);
        assert_eq!(influencers[0].profile.platform, Platform::Instagram);
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"version": 9}"#).unwrap();
        let result = load_store_data(&path);
        assert!(matches!(result, Err(RepositoryError::UnsupportedVersion(9))));
    }

    #[test]
    fn test_corrupt_file_is_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_store_data(&path), Err(RepositoryError::Serde(_))));
    }

    #[test]
    fn test_failed_operation_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileStore::open(&path).unwrap();
        let orphan = Influencer::new(Uuid::new_v4(), InfluencerProfile::new("a", Platform::TikTok, 1));
        assert!(store.insert_influencer(orphan).is_err());
        assert!(!path.exists());
    }
}
