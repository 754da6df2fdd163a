use crate::content::Profile;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

pub const DEFAULT_CONFIG_FILE: &str = "syntaxtyper.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct Config {
    /// Root holding `lessons/`, `snippets/` and `overrides.yaml`
    pub content_dir: PathBuf,
    /// Where progress and the selected profile are kept
    pub state_dir: PathBuf,
    /// Profile used until the learner picks one
    pub profile: Profile,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            state_dir: PathBuf::from(".syntaxtyper"),
            profile: Profile::General,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// An explicit path must exist; otherwise `syntaxtyper.yaml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&yaml)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn log_level(&self) -> Result<Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid log level `{}`", self.log_level))
    }

    pub fn progress_path(&self) -> PathBuf {
        self.state_dir.join("progress.json")
    }

    pub fn profile_path(&self) -> PathBuf {
        self.state_dir.join("profile")
    }
}
