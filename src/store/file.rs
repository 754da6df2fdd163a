use crate::content::Profile;
use crate::error::StoreError;
use crate::registry::LessonKey;
use crate::store::{LessonProgress, ProfileStore, ProgressStore, ProgressUpdate};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

// Map<"track:lessonId", Progress>
type ProgressFile = BTreeMap<String, LessonProgress>;

async fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_creating_dirs(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    Ok(())
}

/// Progress for every lesson in a single JSON document.
pub struct JsonProgressStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl JsonProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<ProgressFile, StoreError> {
        match read_optional(&self.path).await? {
            Some(text) if !text.trim().is_empty() => Ok(serde_json::from_str(&text)?),
            _ => Ok(ProgressFile::new()),
        }
    }

    async fn save(&self, progress: &ProgressFile) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(progress)?;
        write_creating_dirs(&self.path, &json).await
    }
}

#[async_trait]
impl ProgressStore for JsonProgressStore {
    async fn get(&self, key: &LessonKey) -> Result<LessonProgress, StoreError> {
        let _guard = self.lock.lock().await;
        let progress = self.load().await?;
        Ok(progress.get(&key.to_string()).cloned().unwrap_or_default())
    }

    async fn update(&self, key: &LessonKey, update: ProgressUpdate) -> Result<LessonProgress, StoreError> {
        let _guard = self.lock.lock().await;
        let mut progress = self.load().await?;
        let record = progress.entry(key.to_string()).or_default();
        record.apply(&update);
        let record = record.clone();
        self.save(&progress).await?;
        debug!(key = %key, completed_step = record.completed_step, "Saved progress");
        Ok(record)
    }
}

/// Selected profile as a one-word text file.
pub struct FileProfileStore {
    path: PathBuf,
    fallback: Profile,
}

impl FileProfileStore {
    /// `fallback` is reported while nothing has been stored.
    pub fn new(path: impl Into<PathBuf>, fallback: Profile) -> Self {
        Self {
            path: path.into(),
            fallback,
        }
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    async fn get(&self) -> Result<Profile, StoreError> {
        let Some(text) = read_optional(&self.path).await? else {
            return Ok(self.fallback);
        };
        if text.trim().is_empty() {
            return Ok(self.fallback);
        }
        match text.parse::<Profile>() {
            Ok(profile) => Ok(profile),
            Err(e) => {
                warn!("Ignoring stored profile in {}: {}", self.path.display(), e);
                Ok(self.fallback)
            }
        }
    }

    async fn set(&self, profile: Profile) -> Result<(), StoreError> {
        write_creating_dirs(&self.path, format!("{}\n", profile).as_bytes()).await
    }
}
