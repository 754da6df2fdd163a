//! Standalone typing snippets, grouped by language.

use crate::content::loader::is_yaml;
use crate::content::normalize_track;
use crate::error::ContentError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetKind {
    Lesson,
    Challenge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snippet {
    pub id: u32,
    pub language: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: SnippetKind,
    /// Derived from `text` when not authored
    #[serde(default)]
    pub lines: usize,
    #[serde(default)]
    pub characters: usize,
}

impl Snippet {
    fn fill_counts(mut self) -> Self {
        if self.lines == 0 {
            self.lines = self.text.lines().count();
        }
        if self.characters == 0 {
            self.characters = self.text.chars().count();
        }
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SnippetLibrary {
    snippets: Vec<Snippet>,
}

impl SnippetLibrary {
    pub fn new(snippets: Vec<Snippet>) -> Self {
        Self {
            snippets: snippets.into_iter().map(Snippet::fill_counts).collect(),
        }
    }

    /// Loads `<content_dir>/snippets/<language>/*.yaml`. A missing directory
    /// yields an empty library.
    pub fn load_dir(content_dir: impl AsRef<Path>) -> Result<Self, ContentError> {
        let root = content_dir.as_ref().join("snippets");
        if !root.is_dir() {
            info!("No snippets directory at {}", root.display());
            return Ok(Self::default());
        }

        let mut paths = Vec::new();
        for language_dir in read_dir_sorted(&root)? {
            if language_dir.is_dir() {
                paths.extend(read_dir_sorted(&language_dir)?.into_iter().filter(|p| is_yaml(p)));
            }
        }

        let mut snippets = Vec::with_capacity(paths.len());
        for path in paths {
            let yaml = fs::read_to_string(&path).map_err(|source| ContentError::Io {
                path: path.clone(),
                source,
            })?;
            let snippet: Snippet = serde_yaml::from_str(&yaml)
                .map_err(|source| ContentError::Parse { path: path.clone(), source })?;
            debug!("Loaded snippet {} ({}) from {}", snippet.id, snippet.language, path.display());
            snippets.push(snippet);
        }
        info!("Loaded {} snippets", snippets.len());
        Ok(Self::new(snippets))
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self
            .snippets
            .iter()
            .map(|s| normalize_track(&s.language).into_owned())
            .collect();
        languages.sort();
        languages.dedup();
        languages
    }

    /// Uniformly random snippet, optionally restricted to one language.
    pub fn pick<R: Rng + ?Sized>(&self, language: Option<&str>, rng: &mut R) -> Option<&Snippet> {
        let wanted = language.map(normalize_track);
        let candidates: Vec<&Snippet> = self
            .snippets
            .iter()
            .filter(|s| match &wanted {
                Some(lang) => normalize_track(&s.language) == *lang,
                None => true,
            })
            .collect();
        candidates.choose(rng).copied()
    }
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>, ContentError> {
    let io_error = |source| ContentError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = fs::read_dir(dir)
        .map_err(io_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)?;
    paths.sort();
    Ok(paths)
}
