use crate::content::{ByProfile, Profile, Step};

/// Picks a field value for `profile`: its own variant, then the `general`
/// variant, then the plain base value.
pub fn resolve_field<'a, T>(
    base: Option<&'a T>,
    by_profile: Option<&'a ByProfile<T>>,
    profile: Profile,
) -> Option<&'a T> {
    by_profile
        .and_then(|variants| {
            variants
                .get(&profile)
                .or_else(|| variants.get(&Profile::General))
        })
        .or(base)
}

/// Collapses every variant map of a lesson-level merged step.
///
/// The returned step carries no `*_by_profile` maps; all other fields pass
/// through untouched.
pub fn resolve_step(step: &Step, profile: Profile) -> Step {
    Step {
        title: step.title.clone(),
        kind: step.kind,
        description: resolve_field(
            step.description.as_ref(),
            step.description_by_profile.as_ref(),
            profile,
        )
        .cloned(),
        description_by_profile: None,
        bullets: resolve_field(step.bullets.as_ref(), step.bullets_by_profile.as_ref(), profile)
            .cloned(),
        bullets_by_profile: None,
        questions: resolve_field(
            step.questions.as_ref(),
            step.questions_by_profile.as_ref(),
            profile,
        )
        .cloned(),
        questions_by_profile: None,
        code_snippet: resolve_field(
            step.code_snippet.as_ref(),
            step.code_snippet_by_profile.as_ref(),
            profile,
        )
        .cloned(),
        code_snippet_by_profile: None,
        code_lines: resolve_field(
            step.code_lines.as_ref(),
            step.code_lines_by_profile.as_ref(),
            profile,
        )
        .cloned(),
        code_lines_by_profile: None,
        blank_lines: step.blank_lines.clone(),
        outro: step.outro.clone(),
        example_key: step.example_key.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variants(entries: &[(Profile, &'static str)]) -> ByProfile<&'static str> {
        entries.iter().copied().collect()
    }

    #[test]
    fn fallback_order_covers_every_combination() {
        let base = "base";
        let none = None;
        let general_only = variants(&[(Profile::General, "general")]);
        let profile_only = variants(&[(Profile::Finance, "finance")]);
        let both = variants(&[(Profile::General, "general"), (Profile::Finance, "finance")]);

        let cases: [(Option<&&str>, Option<&ByProfile<&str>>, Option<&str>); 8] = [
            (Some(&base), none, Some("base")),
            (None, none, None),
            (Some(&base), Some(&general_only), Some("general")),
            (None, Some(&general_only), Some("general")),
            (Some(&base), Some(&profile_only), Some("finance")),
            (None, Some(&profile_only), Some("finance")),
            (Some(&base), Some(&both), Some("finance")),
            (None, Some(&both), Some("finance")),
        ];

        for (base, by_profile, expected) in cases {
            assert_eq!(
                resolve_field(base, by_profile, Profile::Finance).copied(),
                expected
            );
        }
    }

    #[test]
    fn other_profiles_variant_is_never_used() {
        let only_finance = variants(&[(Profile::Finance, "finance")]);
        assert_eq!(
            resolve_field(Some(&"base"), Some(&only_finance), Profile::Construction),
            Some(&"base")
        );
        assert_eq!(resolve_field(None, Some(&only_finance), Profile::Construction), None);
    }
}
