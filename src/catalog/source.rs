use crate::content::loader::{is_yaml, parse_lesson};
use crate::content::{normalize_track, Lesson};
use crate::error::ContentError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// --- Interfaces ---

/// Where base lessons come from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Known track names, sorted.
    async fn tracks(&self) -> Result<Vec<String>, ContentError>;
    /// `Ok(None)` when the track does not exist at all.
    async fn load_track(&self, track: &str) -> Result<Option<Vec<Lesson>>, ContentError>;
}

// --- In-Memory Implementation ---

#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    tracks: BTreeMap<String, Vec<Lesson>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lesson(mut self, lesson: Lesson) -> Self {
        self.add(lesson);
        self
    }

    pub fn add(&mut self, lesson: Lesson) {
        let track = normalize_track(&lesson.track).into_owned();
        self.tracks.entry(track).or_default().push(lesson);
    }
}

impl FromIterator<Lesson> for InMemorySource {
    fn from_iter<I: IntoIterator<Item = Lesson>>(iter: I) -> Self {
        let mut source = Self::new();
        for lesson in iter {
            source.add(lesson);
        }
        source
    }
}

#[async_trait]
impl ContentSource for InMemorySource {
    async fn tracks(&self) -> Result<Vec<String>, ContentError> {
        Ok(self.tracks.keys().cloned().collect())
    }

    async fn load_track(&self, track: &str) -> Result<Option<Vec<Lesson>>, ContentError> {
        Ok(self.tracks.get(track).cloned())
    }
}

// --- Directory Implementation ---

/// Reads `<root>/lessons/<track>/*.yaml`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    lessons_dir: PathBuf,
}

impl DirectorySource {
    pub fn new(content_dir: impl AsRef<Path>) -> Self {
        Self {
            lessons_dir: content_dir.as_ref().join("lessons"),
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ContentError + '_ {
    move |source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Track names are single path components; anything that could leave
/// `lessons/` names no track.
fn is_track_name(track: &str) -> bool {
    !track.is_empty() && track != "." && track != ".." && !track.contains(['/', '\\'])
}

impl DirectorySource {
    /// Track directories keyed by normalized name. Authors may capitalize
    /// folder names (`lessons/JavaScript/`).
    async fn track_dirs(&self) -> Result<BTreeMap<String, PathBuf>, ContentError> {
        let mut dirs = BTreeMap::new();
        if !tokio::fs::try_exists(&self.lessons_dir)
            .await
            .map_err(io_error(&self.lessons_dir))?
        {
            return Ok(dirs);
        }

        let mut entries = tokio::fs::read_dir(&self.lessons_dir)
            .await
            .map_err(io_error(&self.lessons_dir))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(io_error(&self.lessons_dir))?
        {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                let track = normalize_track(name).into_owned();
                if let Some(previous) = dirs.get(&track) {
                    warn!(
                        track = %track,
                        kept = %previous.display(),
                        skipped = %path.display(),
                        "Two lesson folders differ only by case"
                    );
                    continue;
                }
                dirs.insert(track, path);
            }
        }
        Ok(dirs)
    }
}

#[async_trait]
impl ContentSource for DirectorySource {
    async fn tracks(&self) -> Result<Vec<String>, ContentError> {
        Ok(self.track_dirs().await?.into_keys().collect())
    }

    async fn load_track(&self, track: &str) -> Result<Option<Vec<Lesson>>, ContentError> {
        let track = normalize_track(track);
        if !is_track_name(&track) {
            warn!(track = %track, "Rejected track name outside the lessons folder");
            return Ok(None);
        }
        let Some(dir) = self.track_dirs().await?.remove(track.as_ref()) else {
            return Ok(None);
        };

        let mut entries = tokio::fs::read_dir(&dir).await.map_err(io_error(&dir))?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error(&dir))? {
            let path = entry.path();
            if path.is_file() && is_yaml(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut lessons = Vec::with_capacity(paths.len());
        for path in paths {
            let yaml = tokio::fs::read_to_string(&path)
                .await
                .map_err(io_error(&path))?;
            let lesson = parse_lesson(&path, &yaml)?;
            if normalize_track(&lesson.track) != track {
                return Err(ContentError::TrackMismatch {
                    path,
                    expected: track.into_owned(),
                    found: lesson.track,
                });
            }
            debug!("Loaded lesson {}:{} from {}", track, lesson.lesson_id, path.display());
            lessons.push(lesson);
        }
        Ok(Some(lessons))
    }
}
