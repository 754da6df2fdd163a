pub mod builder;
pub mod loader;

use crate::error::ContentError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Audience the learner picked; selects flavored content.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    General,
    Finance,
    Construction,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::General, Profile::Finance, Profile::Construction];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Finance => "finance",
            Self::Construction => "construction",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Profile::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ContentError::UnknownProfile(wanted.to_string()))
    }
}

/// Per-profile variants of a field. Never required to be exhaustive.
pub type ByProfile<T> = BTreeMap<Profile, T>;

/// Which widget renders a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    /// Intro / summary text block
    #[default]
    Plain,
    TypingChallenge,
    Explanation,
    Quiz,
    TypingChallengeWithBlanks,
}

impl StepKind {
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

/// One page of authored lesson content.
///
/// Fields are loose on purpose: authored steps are patched field by field
/// before they are narrowed into [`crate::render::EffectiveStep`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Step {
    pub title: String,
    #[serde(rename = "type", default, skip_serializing_if = "StepKind::is_plain")]
    pub kind: StepKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_by_profile: Option<ByProfile<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets_by_profile: Option<ByProfile<Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuizQuestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_by_profile: Option<ByProfile<Vec<QuizQuestion>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet_by_profile: Option<ByProfile<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_lines: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_lines_by_profile: Option<ByProfile<Vec<String>>>,

    /// 0-based indices into `code_lines`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blank_lines: Option<BTreeSet<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_key: Option<String>,
}

/// Partial [`Step`]. Every field that is set replaces the base field wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StepPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<StepKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_by_profile: Option<ByProfile<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets_by_profile: Option<ByProfile<Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuizQuestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_by_profile: Option<ByProfile<Vec<QuizQuestion>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet_by_profile: Option<ByProfile<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_lines: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_lines_by_profile: Option<ByProfile<Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blank_lines: Option<BTreeSet<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_key: Option<String>,
}

/// Patches for one profile, keyed by 1-based step position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideBundle {
    #[serde(default)]
    pub steps: BTreeMap<usize, StepPatch>,
}

impl OverrideBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patch(mut self, position: usize, patch: StepPatch) -> Self {
        self.steps.insert(position, patch);
        self
    }
}

/// All bundles authored for a single lesson.
pub type ProfileBundles = BTreeMap<Profile, OverrideBundle>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Lesson {
    pub lesson_id: u32,
    #[serde(alias = "language")]
    pub track: String,
    pub title: String,
    pub steps: Vec<Step>,
}

/// Track names are matched case-insensitively.
pub fn normalize_track(track: &str) -> Cow<'_, str> {
    let track = track.trim();
    if track.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(track.to_ascii_lowercase())
    } else {
        Cow::Borrowed(track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_parses_case_insensitively() {
        assert_eq!("Finance".parse::<Profile>().unwrap(), Profile::Finance);
        assert_eq!(" construction ".parse::<Profile>().unwrap(), Profile::Construction);
        assert!(matches!(
            "retail".parse::<Profile>(),
            Err(ContentError::UnknownProfile(p)) if p == "retail"
        ));
    }

    #[test]
    fn step_kind_defaults_to_plain_when_type_is_absent() {
        let step: Step = serde_yaml::from_str("title: Intro\ndescription: hi\n").unwrap();
        assert_eq!(step.kind, StepKind::Plain);

        let step: Step =
            serde_yaml::from_str("title: Fill\ntype: typingChallengeWithBlanks\nblankLines: [2, 0]\n")
                .unwrap();
        assert_eq!(step.kind, StepKind::TypingChallengeWithBlanks);
        assert_eq!(step.blank_lines, Some(BTreeSet::from([0, 2])));
    }

    #[test]
    fn normalize_track_only_allocates_for_uppercase() {
        assert!(matches!(normalize_track("react"), Cow::Borrowed("react")));
        assert_eq!(normalize_track("JavaScript"), "javascript");
    }
}
