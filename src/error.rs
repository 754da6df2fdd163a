use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading or indexing authored content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("malformed override key `{key}`: {reason}")]
    MalformedKey { key: String, reason: &'static str },

    #[error("override key `{0}` is registered twice")]
    DuplicateKey(String),

    #[error("lesson id {lesson_id} appears twice in track `{track}`")]
    DuplicateLesson { track: String, lesson_id: u32 },

    #[error("{} declares track `{found}` but lives under `{expected}`", .path.display())]
    TrackMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("unknown profile `{0}`")]
    UnknownProfile(String),
}

/// Errors surfaced to a lesson view. Missing overrides are never errors.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("lesson {track}:{lesson_id} not found")]
    LessonNotFound { track: String, lesson_id: u32 },

    #[error("step {position} not found, lesson has {total} steps")]
    StepNotFound { position: usize, total: usize },

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Persistence failures of the progress and profile stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
