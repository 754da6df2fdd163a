pub mod text;
pub mod widgets;

use crate::content::{QuizQuestion, Step, StepKind};
use serde::Serialize;
use std::collections::BTreeSet;

pub use text::render_text;
pub use widgets::{BlankFill, QuizAttempt, TypingAttempt, TypingScore};

/// Fully resolved step, narrowed to what its widget needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EffectiveStep {
    Plain {
        title: String,
        description: Option<String>,
        bullets: Vec<String>,
        outro: Option<String>,
    },
    TypingChallenge {
        title: String,
        description: Option<String>,
        code_snippet: String,
        example_key: Option<String>,
    },
    Explanation {
        title: String,
        description: Option<String>,
        code_snippet: Option<String>,
        example_key: Option<String>,
    },
    Quiz {
        title: String,
        description: Option<String>,
        questions: Vec<QuizQuestion>,
    },
    TypingChallengeWithBlanks {
        title: String,
        description: Option<String>,
        code_lines: Vec<String>,
        blank_lines: BTreeSet<usize>,
    },
}

impl EffectiveStep {
    pub fn kind(&self) -> StepKind {
        match self {
            Self::Plain { .. } => StepKind::Plain,
            Self::TypingChallenge { .. } => StepKind::TypingChallenge,
            Self::Explanation { .. } => StepKind::Explanation,
            Self::Quiz { .. } => StepKind::Quiz,
            Self::TypingChallengeWithBlanks { .. } => StepKind::TypingChallengeWithBlanks,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Plain { title, .. }
            | Self::TypingChallenge { title, .. }
            | Self::Explanation { title, .. }
            | Self::Quiz { title, .. }
            | Self::TypingChallengeWithBlanks { title, .. } => title,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Plain { description, .. }
            | Self::TypingChallenge { description, .. }
            | Self::Explanation { description, .. }
            | Self::Quiz { description, .. }
            | Self::TypingChallengeWithBlanks { description, .. } => description.as_deref(),
        }
    }
}

/// Absent sequences become empty; fields the kind does not use are dropped.
impl From<Step> for EffectiveStep {
    fn from(step: Step) -> Self {
        let Step {
            title,
            kind,
            description,
            bullets,
            questions,
            code_snippet,
            code_lines,
            blank_lines,
            outro,
            example_key,
            ..
        } = step;

        match kind {
            StepKind::Plain => Self::Plain {
                title,
                description,
                bullets: bullets.unwrap_or_default(),
                outro,
            },
            StepKind::TypingChallenge => Self::TypingChallenge {
                title,
                description,
                code_snippet: code_snippet.unwrap_or_default(),
                example_key,
            },
            StepKind::Explanation => Self::Explanation {
                title,
                description,
                code_snippet,
                example_key,
            },
            StepKind::Quiz => Self::Quiz {
                title,
                description,
                questions: questions.unwrap_or_default(),
            },
            StepKind::TypingChallengeWithBlanks => Self::TypingChallengeWithBlanks {
                title,
                description,
                code_lines: code_lines.unwrap_or_default(),
                blank_lines: blank_lines.unwrap_or_default(),
            },
        }
    }
}
