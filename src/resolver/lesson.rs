use crate::content::{Lesson, OverrideBundle, Profile, Step, StepPatch};
use crate::registry::OverrideRegistry;
use std::borrow::Cow;

/// Applies a profile's bundle over a base lesson.
///
/// Without a bundle the base is handed back borrowed. Patches whose position
/// falls outside the lesson are ignored.
pub fn resolve<'a>(base: &'a Lesson, bundle: Option<&OverrideBundle>) -> Cow<'a, Lesson> {
    let Some(bundle) = bundle else {
        return Cow::Borrowed(base);
    };

    let steps = base
        .steps
        .iter()
        .enumerate()
        .map(|(idx, step)| match bundle.steps.get(&(idx + 1)) {
            Some(patch) => merge_step(step, patch),
            None => step.clone(),
        })
        .collect();

    Cow::Owned(Lesson {
        lesson_id: base.lesson_id,
        track: base.track.clone(),
        title: base.title.clone(),
        steps,
    })
}

/// Shallow merge: a field set on the patch replaces the base field as a whole.
pub fn merge_step(base: &Step, patch: &StepPatch) -> Step {
    let mut step = base.clone();

    if let Some(title) = &patch.title {
        step.title = title.clone();
    }
    if let Some(kind) = patch.kind {
        step.kind = kind;
    }

    macro_rules! overlay {
        ($($field:ident),* $(,)?) => {
            $(
                if let Some(value) = &patch.$field {
                    step.$field = Some(value.clone());
                }
            )*
        };
    }

    overlay!(
        description,
        description_by_profile,
        bullets,
        bullets_by_profile,
        questions,
        questions_by_profile,
        code_snippet,
        code_snippet_by_profile,
        code_lines,
        code_lines_by_profile,
        blank_lines,
        outro,
        example_key,
    );

    step
}

pub fn select_bundle<'r>(
    registry: &'r OverrideRegistry,
    track: &str,
    lesson_id: u32,
    profile: Profile,
) -> Option<&'r OverrideBundle> {
    registry.select_bundle(track, lesson_id, profile)
}
