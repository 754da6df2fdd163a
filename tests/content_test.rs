use std::path::{Path, PathBuf};
use std::sync::Arc;
use syntaxtyper::catalog::{DirectorySource, LessonCatalog};
use syntaxtyper::content::loader::load_registry_dir;
use syntaxtyper::content::Profile;
use syntaxtyper::lint::lint_all;
use syntaxtyper::render::{render_text, BlankFill, EffectiveStep, QuizAttempt};
use syntaxtyper::resolver::LessonPipeline;
use syntaxtyper::snippets::SnippetLibrary;

fn content_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("content")
}

fn bundled_pipeline() -> LessonPipeline {
    let dir = content_dir();
    let registry = load_registry_dir(&dir).expect("Failed to load bundled overrides");
    let catalog = LessonCatalog::new(Arc::new(DirectorySource::new(&dir)));
    LessonPipeline::new(Arc::new(catalog), Arc::new(registry))
}

fn snippet_of(step: EffectiveStep) -> String {
    match step {
        EffectiveStep::TypingChallenge { code_snippet, .. } => code_snippet,
        other => panic!("expected a typing challenge, got {:?}", other),
    }
}

#[tokio::test]
async fn test_bundled_tracks_and_lessons() {
    let pipeline = bundled_pipeline();
    let tracks = pipeline.catalog().tracks().await.unwrap();
    assert_eq!(tracks, vec!["javascript", "react"]);

    let lessons = pipeline.catalog().lessons("javascript").await.unwrap();
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].title, "Print & Strings (Hello, Name!)");
    assert_eq!(lessons[0].steps, 6);
}

#[tokio::test]
async fn test_bundled_react_snippet_per_profile() {
    let pipeline = bundled_pipeline();

    let general = snippet_of(pipeline.effective_step("react", 1, Profile::General, 2).await.unwrap());
    let construction =
        snippet_of(pipeline.effective_step("react", 1, Profile::Construction, 2).await.unwrap());
    let finance = snippet_of(pipeline.effective_step("react", 1, Profile::Finance, 2).await.unwrap());

    assert_eq!(
        general,
        "import React from \"react\";\n\nfunction Welcome() {\n    return <h1>Welcome to React!</h1>;\n}\n\nexport default Welcome;"
    );
    assert_eq!(
        construction,
        "import React from \"react\";\n\nfunction SiteWelcome() {\n    return <h1>Welcome to the Site!</h1>;\n}\n\nexport default SiteWelcome;"
    );
    assert!(finance.contains("function PortfolioWelcome()"));
}

#[tokio::test]
async fn test_bundled_react_blanks_follow_profile() {
    let pipeline = bundled_pipeline();
    let step = pipeline
        .effective_step("react", 1, Profile::Finance, 5)
        .await
        .unwrap();

    let EffectiveStep::TypingChallengeWithBlanks { code_lines, blank_lines, .. } = &step else {
        panic!("expected blanks, got {:?}", step);
    };
    assert_eq!(code_lines[2], "function PortfolioWelcome() {");

    let mut fill = BlankFill::new(code_lines, blank_lines);
    assert_eq!(fill.blanks().collect::<Vec<_>>(), vec![0, 2, 6]);
    fill.fill(0, "import React from \"react\";");
    fill.fill(2, "function PortfolioWelcome() {");
    fill.fill(6, "export default PortfolioWelcome;");
    assert!(fill.is_complete());
    assert_eq!(fill.assemble(), code_lines.join("\n"));

    let text = render_text(&step);
    assert!(text.contains("  3 | ____"));
    assert!(text.contains("  4 |     return <h1>Welcome to the Portfolio Dashboard</h1>;"));
}

#[tokio::test]
async fn test_bundled_javascript_quiz() {
    let pipeline = bundled_pipeline();
    let step = pipeline
        .effective_step("javascript", 1, Profile::Construction, 4)
        .await
        .unwrap();

    let EffectiveStep::Quiz { questions, .. } = &step else {
        panic!("expected a quiz, got {:?}", step);
    };
    let mut attempt = QuizAttempt::new(questions);
    attempt.answer(0, 1);
    attempt.answer(1, 2);
    assert_eq!(attempt.score(), 1);
    assert_eq!(attempt.total(), 2);
}

#[tokio::test]
async fn test_bundled_content_is_clean() {
    let pipeline = bundled_pipeline();
    let issues = lint_all(pipeline.catalog(), pipeline.registry()).await.unwrap();
    assert!(issues.is_empty(), "unexpected lint issues: {:#?}", issues);
}

#[test]
fn test_bundled_snippets() {
    let library = SnippetLibrary::load_dir(content_dir()).unwrap();
    assert_eq!(library.len(), 4);
    assert_eq!(library.languages(), vec!["java", "javascript", "python", "react"]);

    let mut rng = rand::thread_rng();
    let python = library.pick(Some("python"), &mut rng).unwrap();
    assert_eq!(python.lines, 2);
    assert_eq!(python.text, "def greet(name):\n    return f\"Hello, {name}!\"");
}
