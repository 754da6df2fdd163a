pub mod source;

use crate::content::{normalize_track, Lesson};
use crate::error::{ContentError, ResolveError};
use dashmap::DashMap;
use serde::Serialize;
use source::ContentSource;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

pub use source::{DirectorySource, InMemorySource};

type Track = Arc<Vec<Arc<Lesson>>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub lesson_id: u32,
    pub title: String,
    pub steps: usize,
}

/// Base lessons grouped by track, loaded lazily and cached per track.
pub struct LessonCatalog {
    source: Arc<dyn ContentSource>,
    // Map<Track, Lessons sorted by id>
    tracks: DashMap<String, Track>,
}

impl LessonCatalog {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            tracks: DashMap::new(),
        }
    }

    pub async fn tracks(&self) -> Result<Vec<String>, ContentError> {
        self.source.tracks().await
    }

    async fn fetch_track(&self, track: &str) -> Result<Track, ContentError> {
        let track = normalize_track(track);
        if let Some(cached) = self.tracks.get(track.as_ref()) {
            return Ok(Arc::clone(cached.value()));
        }

        let lessons = match self.source.load_track(&track).await? {
            Some(lessons) => lessons,
            None => {
                warn!(track = %track, "No lessons found for track");
                Vec::new()
            }
        };
        let lessons = index_track(&track, lessons)?;
        info!(track = %track, count = lessons.len(), "Loaded track");

        // A concurrent loader may have won the race; keep whichever landed first.
        let entry = self
            .tracks
            .entry(track.into_owned())
            .or_insert(lessons);
        Ok(Arc::clone(entry.value()))
    }

    pub async fn lessons(&self, track: &str) -> Result<Vec<LessonSummary>, ContentError> {
        let lessons = self.fetch_track(track).await?;
        Ok(lessons
            .iter()
            .map(|l| LessonSummary {
                lesson_id: l.lesson_id,
                title: l.title.clone(),
                steps: l.steps.len(),
            })
            .collect())
    }

    pub async fn total_lessons(&self, track: &str) -> Result<usize, ContentError> {
        Ok(self.fetch_track(track).await?.len())
    }

    pub async fn lesson(&self, track: &str, lesson_id: u32) -> Result<Arc<Lesson>, ResolveError> {
        let lessons = self.fetch_track(track).await?;
        lessons
            .iter()
            .find(|l| l.lesson_id == lesson_id)
            .cloned()
            .ok_or_else(|| ResolveError::LessonNotFound {
                track: normalize_track(track).into_owned(),
                lesson_id,
            })
    }
}

fn index_track(track: &str, mut lessons: Vec<Lesson>) -> Result<Track, ContentError> {
    let mut seen = BTreeSet::new();
    for lesson in &lessons {
        if !seen.insert(lesson.lesson_id) {
            return Err(ContentError::DuplicateLesson {
                track: track.to_string(),
                lesson_id: lesson.lesson_id,
            });
        }
    }
    lessons.sort_by_key(|l| l.lesson_id);
    Ok(Arc::new(lessons.into_iter().map(Arc::new).collect()))
}
