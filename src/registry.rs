use crate::content::{normalize_track, OverrideBundle, Profile, ProfileBundles};
use crate::error::ContentError;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Structured form of the authored `"{track}:{lessonId}"` address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LessonKey {
    pub track: String,
    pub lesson_id: u32,
}

impl LessonKey {
    pub fn new(track: &str, lesson_id: u32) -> Self {
        Self {
            track: normalize_track(track).into_owned(),
            lesson_id,
        }
    }
}

impl fmt::Display for LessonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.track, self.lesson_id)
    }
}

impl FromStr for LessonKey {
    type Err = ContentError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| ContentError::MalformedKey {
            key: key.to_string(),
            reason,
        };

        let (track, id) = key
            .split_once(':')
            .ok_or_else(|| malformed("expected `track:lessonId`"))?;
        let track = track.trim();
        if track.is_empty() {
            return Err(malformed("track is empty"));
        }
        if track.chars().any(|c| c.is_whitespace() || c == ':') {
            return Err(malformed("track contains whitespace or `:`"));
        }
        let lesson_id = id
            .trim()
            .parse::<u32>()
            .map_err(|_| malformed("lesson id is not a non-negative integer"))?;

        Ok(LessonKey::new(track, lesson_id))
    }
}

/// Process-wide index of override bundles, built once at startup.
///
/// Keys are validated on insertion, so lookups never parse strings.
#[derive(Debug, Clone, Default)]
pub struct OverrideRegistry {
    tracks: HashMap<String, HashMap<u32, ProfileBundles>>,
}

impl OverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from authored string keys, failing on the first
    /// malformed or repeated key.
    pub fn from_keyed<I, K>(entries: I) -> Result<Self, ContentError>
    where
        I: IntoIterator<Item = (K, ProfileBundles)>,
        K: AsRef<str>,
    {
        let mut registry = Self::new();
        for (key, bundles) in entries {
            let key: LessonKey = key.as_ref().parse()?;
            registry.insert(key, bundles)?;
        }
        Ok(registry)
    }

    pub fn insert(&mut self, key: LessonKey, bundles: ProfileBundles) -> Result<(), ContentError> {
        let lessons = self.tracks.entry(key.track.clone()).or_default();
        if lessons.contains_key(&key.lesson_id) {
            return Err(ContentError::DuplicateKey(key.to_string()));
        }
        lessons.insert(key.lesson_id, bundles);
        Ok(())
    }

    pub fn bundles(&self, track: &str, lesson_id: u32) -> Option<&ProfileBundles> {
        self.tracks
            .get(normalize_track(track).as_ref())
            .and_then(|lessons| lessons.get(&lesson_id))
    }

    /// Bundle authored for exactly `profile`. Never borrows another
    /// profile's bundle; a missing `general` entry means the base lesson.
    pub fn select_bundle(&self, track: &str, lesson_id: u32, profile: Profile) -> Option<&OverrideBundle> {
        self.bundles(track, lesson_id)
            .and_then(|bundles| bundles.get(&profile))
    }

    /// Every registered key, sorted.
    pub fn keys(&self) -> Vec<LessonKey> {
        let mut keys: Vec<LessonKey> = self
            .tracks
            .iter()
            .flat_map(|(track, lessons)| {
                lessons.keys().map(move |id| LessonKey {
                    track: track.clone(),
                    lesson_id: *id,
                })
            })
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.tracks.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
