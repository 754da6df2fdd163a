use crate::content::{Lesson, ProfileBundles};
use crate::error::ContentError;
use crate::registry::OverrideRegistry;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

pub const OVERRIDES_FILE: &str = "overrides.yaml";

pub fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

pub fn parse_lesson(path: &Path, yaml: &str) -> Result<Lesson, ContentError> {
    serde_yaml::from_str(yaml).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_lesson_from_yaml(path: impl AsRef<Path>) -> Result<Lesson, ContentError> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_lesson(path, &yaml)
}

/// Parses a registry file: a map of `"track:lessonId"` to per-profile bundles.
pub fn parse_registry(path: &Path, yaml: &str) -> Result<OverrideRegistry, ContentError> {
    let raw: BTreeMap<String, ProfileBundles> =
        serde_yaml::from_str(yaml).map_err(|source| ContentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    OverrideRegistry::from_keyed(raw)
}

pub fn load_registry_from_yaml(path: impl AsRef<Path>) -> Result<OverrideRegistry, ContentError> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_registry(path, &yaml)
}

/// Loads `<content_dir>/overrides.yaml`; no file means no overrides.
pub fn load_registry_dir(content_dir: impl AsRef<Path>) -> Result<OverrideRegistry, ContentError> {
    let path = content_dir.as_ref().join(OVERRIDES_FILE);
    if !path.exists() {
        info!("No override registry at {}, using base lessons only", path.display());
        return Ok(OverrideRegistry::new());
    }
    let registry = load_registry_from_yaml(&path)?;
    info!("Loaded {} override entries from {}", registry.len(), path.display());
    Ok(registry)
}
