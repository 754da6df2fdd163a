use crate::catalog::LessonCatalog;
use crate::content::{ByProfile, Lesson, Profile, ProfileBundles, Step, StepKind, StepPatch};
use crate::error::{ContentError, ResolveError};
use crate::registry::OverrideRegistry;
use crate::resolver::{resolve, resolve_field, resolve_step};
use std::collections::BTreeMap;
use std::fmt;

/// An authoring defect. Linting never changes content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    pub track: String,
    pub lesson_id: u32,
    /// `None` when the issue shows up for every profile
    pub profile: Option<Profile>,
    pub position: Option<usize>,
    pub message: String,
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.track, self.lesson_id)?;
        if let Some(position) = self.position {
            write!(f, " step {}", position)?;
        }
        if let Some(profile) = self.profile {
            write!(f, " [{}]", profile)?;
        }
        write!(f, ": {}", self.message)
    }
}

pub fn lint_lesson(lesson: &Lesson, bundles: Option<&ProfileBundles>) -> Vec<LintIssue> {
    let issue = |profile, position, message: String| LintIssue {
        track: lesson.track.clone(),
        lesson_id: lesson.lesson_id,
        profile,
        position,
        message,
    };

    // (position, message) -> profiles that see it
    let mut effective: BTreeMap<(usize, String), Vec<Profile>> = BTreeMap::new();
    for profile in Profile::ALL {
        let bundle = bundles.and_then(|b| b.get(&profile));
        let merged = resolve(lesson, bundle);
        for (idx, step) in merged.steps.iter().enumerate() {
            for message in check_effective(&resolve_step(step, profile)) {
                effective.entry((idx + 1, message)).or_default().push(profile);
            }
        }
    }

    let mut issues = Vec::new();
    for ((position, message), profiles) in effective {
        if profiles.len() == Profile::ALL.len() {
            issues.push(issue(None, Some(position), message));
        } else {
            for profile in profiles {
                issues.push(issue(Some(profile), Some(position), message.clone()));
            }
        }
    }

    for (profile, bundle) in bundles.into_iter().flatten() {
        for (position, patch) in &bundle.steps {
            match position.checked_sub(1).and_then(|idx| lesson.steps.get(idx)) {
                None => issues.push(issue(
                    Some(*profile),
                    Some(*position),
                    format!(
                        "override targets a step outside 1..={} and is ignored",
                        lesson.steps.len()
                    ),
                )),
                Some(base) => {
                    for field in shadowed_fields(base, patch, *profile) {
                        issues.push(issue(
                            Some(*profile),
                            Some(*position),
                            format!(
                                "patch sets `{field}` but the step's `{field}ByProfile` takes precedence"
                            ),
                        ));
                    }
                }
            }
        }
    }

    issues
}

fn check_effective(step: &Step) -> Vec<String> {
    let mut messages = Vec::new();
    let line_count = step.code_lines.as_ref().map_or(0, Vec::len);

    if let Some(blanks) = &step.blank_lines {
        for idx in blanks.iter().filter(|idx| **idx >= line_count) {
            messages.push(format!(
                "blank line {} has no matching code line ({} lines)",
                idx, line_count
            ));
        }
    }

    for (qi, q) in step.questions.iter().flatten().enumerate() {
        if q.correct_index >= q.options.len() {
            messages.push(format!(
                "question {} has correctIndex {} but only {} options",
                qi + 1,
                q.correct_index,
                q.options.len()
            ));
        }
    }

    match step.kind {
        StepKind::TypingChallenge if step.code_snippet.as_deref().is_none_or(str::is_empty) => {
            messages.push("typing challenge has no code snippet".to_string());
        }
        StepKind::TypingChallengeWithBlanks if line_count == 0 => {
            messages.push("fill-in-the-blanks step has no code lines".to_string());
        }
        StepKind::Quiz if step.questions.as_ref().is_none_or(Vec::is_empty) => {
            messages.push("quiz has no questions".to_string());
        }
        _ => {}
    }

    messages
}

/// Plain fields a patch sets that a surviving variant map will override.
fn shadowed_fields(base: &Step, patch: &StepPatch, profile: Profile) -> Vec<&'static str> {
    fn shadows<T>(
        set: bool,
        patched_map: bool,
        map: Option<&ByProfile<T>>,
        profile: Profile,
    ) -> bool {
        set && !patched_map && resolve_field(None, map, profile).is_some()
    }

    let mut fields = Vec::new();
    if shadows(
        patch.description.is_some(),
        patch.description_by_profile.is_some(),
        base.description_by_profile.as_ref(),
        profile,
    ) {
        fields.push("description");
    }
    if shadows(
        patch.bullets.is_some(),
        patch.bullets_by_profile.is_some(),
        base.bullets_by_profile.as_ref(),
        profile,
    ) {
        fields.push("bullets");
    }
    if shadows(
        patch.questions.is_some(),
        patch.questions_by_profile.is_some(),
        base.questions_by_profile.as_ref(),
        profile,
    ) {
        fields.push("questions");
    }
    if shadows(
        patch.code_snippet.is_some(),
        patch.code_snippet_by_profile.is_some(),
        base.code_snippet_by_profile.as_ref(),
        profile,
    ) {
        fields.push("codeSnippet");
    }
    if shadows(
        patch.code_lines.is_some(),
        patch.code_lines_by_profile.is_some(),
        base.code_lines_by_profile.as_ref(),
        profile,
    ) {
        fields.push("codeLines");
    }
    fields
}

/// Lints every lesson of every track, plus registry entries whose lesson
/// does not exist.
pub async fn lint_all(
    catalog: &LessonCatalog,
    registry: &OverrideRegistry,
) -> Result<Vec<LintIssue>, ContentError> {
    let mut issues = Vec::new();

    for track in catalog.tracks().await? {
        for summary in catalog.lessons(&track).await? {
            let lesson = match catalog.lesson(&track, summary.lesson_id).await {
                Ok(lesson) => lesson,
                Err(ResolveError::Content(e)) => return Err(e),
                Err(_) => continue,
            };
            issues.extend(lint_lesson(
                &lesson,
                registry.bundles(&track, summary.lesson_id),
            ));
        }
    }

    for key in registry.keys() {
        match catalog.lesson(&key.track, key.lesson_id).await {
            Ok(_) => {}
            Err(ResolveError::Content(e)) => return Err(e),
            Err(_) => issues.push(LintIssue {
                track: key.track.clone(),
                lesson_id: key.lesson_id,
                profile: None,
                position: None,
                message: "overrides are registered for a lesson that does not exist".to_string(),
            }),
        }
    }

    Ok(issues)
}
