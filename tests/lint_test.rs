use std::sync::Arc;
use syntaxtyper::catalog::{InMemorySource, LessonCatalog};
use syntaxtyper::content::builder::LessonBuilder;
use syntaxtyper::content::{OverrideBundle, Profile, ProfileBundles, StepPatch};
use syntaxtyper::lint::{lint_all, lint_lesson};
use syntaxtyper::registry::OverrideRegistry;

#[test]
fn test_clean_lesson_has_no_issues() {
    let lesson = LessonBuilder::new("javascript", 1)
        .typing_challenge("Type")
            .code_snippet("let x = 1;")
            .build()
        .quiz("Quiz")
            .question("Pick", &["a", "b"], 0)
            .build()
        .build();
    assert!(lint_lesson(&lesson, None).is_empty());
}

#[test]
fn test_reports_broken_blanks_and_answers_for_all_profiles_once() {
    let lesson = LessonBuilder::new("javascript", 2)
        .blanks("Fill")
            .code_lines(&["a", "b"])
            .blank_lines(&[1, 4])
            .build()
        .quiz("Quiz")
            .question("Pick", &["a", "b"], 2)
            .build()
        .build();

    let issues = lint_lesson(&lesson, None);
    assert_eq!(issues.len(), 2, "{:#?}", issues);
    assert!(issues.iter().all(|i| i.profile.is_none()));
    assert_eq!(issues[0].position, Some(1));
    assert!(issues[0].message.contains("blank line 4"));
    assert_eq!(
        issues[1].to_string(),
        "javascript:2 step 2: question 1 has correctIndex 2 but only 2 options"
    );
}

#[test]
fn test_reports_profile_specific_and_bundle_issues() {
    let lesson = LessonBuilder::new("react", 1)
        .step("Intro")
            .description("base")
            .description_for(Profile::General, "general")
            .build()
        .blanks("Fill")
            .code_lines(&["a", "b", "c"])
            .blank_lines(&[2])
            .build()
        .build();

    let bundles: ProfileBundles = [(
        Profile::Finance,
        OverrideBundle::new()
            .patch(1, StepPatch { description: Some("finance".into()), ..StepPatch::default() })
            .patch(2, StepPatch { code_lines: Some(vec!["x".into()]), ..StepPatch::default() })
            .patch(7, StepPatch { title: Some("ghost".into()), ..StepPatch::default() }),
    )]
    .into_iter()
    .collect();

    let issues = lint_lesson(&lesson, Some(&bundles));
    let rendered: Vec<String> = issues.iter().map(ToString::to_string).collect();

    assert!(rendered.contains(
        &"react:1 step 2 [finance]: blank line 2 has no matching code line (1 lines)".to_string()
    ));
    assert!(rendered.contains(
        &"react:1 step 7 [finance]: override targets a step outside 1..=2 and is ignored".to_string()
    ));
    assert!(rendered.contains(
        &"react:1 step 1 [finance]: patch sets `description` but the step's `descriptionByProfile` takes precedence"
            .to_string()
    ));
    assert_eq!(issues.len(), 3, "{:#?}", rendered);
}

#[tokio::test]
async fn test_lint_all_flags_orphan_overrides() {
    let source = InMemorySource::new().with_lesson(
        LessonBuilder::new("react", 1)
            .step("Intro")
                .description("hi")
                .build()
            .build(),
    );
    let catalog = LessonCatalog::new(Arc::new(source));
    let registry =
        OverrideRegistry::from_keyed([("react:2", ProfileBundles::new())]).unwrap();

    let issues = lint_all(&catalog, &registry).await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].lesson_id, 2);
    assert!(issues[0].message.contains("does not exist"));
}
