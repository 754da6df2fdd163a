pub mod file;

use crate::content::Profile;
use crate::error::StoreError;
use crate::registry::LessonKey;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

pub use file::{FileProfileStore, JsonProgressStore};

/// Per-lesson progress record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonProgress {
    #[serde(rename = "completedStep", default)]
    pub completed_step: usize,
    #[serde(rename = "bestWPM", default, skip_serializing_if = "Option::is_none")]
    pub best_wpm: Option<f64>,
    #[serde(rename = "bestAcc", default, skip_serializing_if = "Option::is_none")]
    pub best_acc: Option<f64>,
}

/// Fields to overwrite; unset fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressUpdate {
    pub completed_step: Option<usize>,
    pub best_wpm: Option<f64>,
    pub best_acc: Option<f64>,
}

impl LessonProgress {
    pub fn apply(&mut self, update: &ProgressUpdate) {
        if let Some(step) = update.completed_step {
            self.completed_step = step;
        }
        if let Some(wpm) = update.best_wpm {
            self.best_wpm = Some(wpm);
        }
        if let Some(acc) = update.best_acc {
            self.best_acc = Some(acc);
        }
    }

    /// Update carrying only the typing results that beat the stored bests.
    pub fn improvements(&self, wpm: f64, accuracy: f64) -> ProgressUpdate {
        let beats = |best: Option<f64>, value: f64| best.is_none_or(|best| value > best);
        ProgressUpdate {
            completed_step: None,
            best_wpm: beats(self.best_wpm, wpm).then_some(wpm),
            best_acc: beats(self.best_acc, accuracy).then_some(accuracy),
        }
    }
}

// --- Interfaces ---

#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Missing records read as a fresh [`LessonProgress`].
    async fn get(&self, key: &LessonKey) -> Result<LessonProgress, StoreError>;
    /// Returns the record after the update.
    async fn update(&self, key: &LessonKey, update: ProgressUpdate) -> Result<LessonProgress, StoreError>;
}

/// The learner's selected profile, persisted outside the resolver.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self) -> Result<Profile, StoreError>;
    async fn set(&self, profile: Profile) -> Result<(), StoreError>;
}

// --- In-Memory Implementations ---

#[derive(Debug, Default)]
pub struct InMemoryProgressStore {
    records: DashMap<LessonKey, LessonProgress>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn get(&self, key: &LessonKey) -> Result<LessonProgress, StoreError> {
        Ok(self
            .records
            .get(key)
            .map(|r| r.value().clone())
            .unwrap_or_default())
    }

    async fn update(&self, key: &LessonKey, update: ProgressUpdate) -> Result<LessonProgress, StoreError> {
        let mut record = self.records.entry(key.clone()).or_default();
        record.apply(&update);
        Ok(record.value().clone())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profile: RwLock<Profile>,
}

impl InMemoryProfileStore {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile: RwLock::new(profile),
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self) -> Result<Profile, StoreError> {
        Ok(*self.profile.read().unwrap_or_else(|e| e.into_inner()))
    }

    async fn set(&self, profile: Profile) -> Result<(), StoreError> {
        *self.profile.write().unwrap_or_else(|e| e.into_inner()) = profile;
        Ok(())
    }
}
