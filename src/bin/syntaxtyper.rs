use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use syntaxtyper::catalog::{DirectorySource, LessonCatalog};
use syntaxtyper::config::Config;
use syntaxtyper::content::loader::load_registry_dir;
use syntaxtyper::content::{normalize_track, Profile};
use syntaxtyper::error::ResolveError;
use syntaxtyper::lint::lint_all;
use syntaxtyper::registry::LessonKey;
use syntaxtyper::render::{
    render_text, BlankFill, EffectiveStep, QuizAttempt, TypingAttempt, TypingScore,
};
use syntaxtyper::resolver::LessonPipeline;
use syntaxtyper::session::{LessonSession, Navigation};
use syntaxtyper::snippets::SnippetLibrary;
use syntaxtyper::store::{
    FileProfileStore, JsonProgressStore, ProfileStore, ProgressStore, ProgressUpdate,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ./syntaxtyper.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Content root holding lessons/, snippets/ and overrides.yaml
    #[arg(long, global = true)]
    content_dir: Option<PathBuf>,

    /// Directory for progress and profile state
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available tracks
    Tracks,

    /// List the lessons of a track
    Lessons { track: String },

    /// Print one step as the given profile sees it
    Show {
        track: String,
        lesson: u32,

        /// 1-based step position
        #[arg(long, short, default_value_t = 1)]
        step: usize,

        /// Overrides the stored profile for this call
        #[arg(long, short, value_parser = parse_profile)]
        profile: Option<Profile>,
    },

    /// Walk through a lesson interactively, recording progress
    Walk {
        track: String,
        lesson: u32,

        #[arg(long, short, value_parser = parse_profile)]
        profile: Option<Profile>,

        /// Start from the first step instead of the last completed one
        #[arg(long)]
        restart: bool,
    },

    /// Show stored progress for a lesson
    Progress { track: String, lesson: u32 },

    /// Read or change the selected profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Check authored content for defects
    Lint,

    /// Print a random typing snippet
    Snippet {
        #[arg(long, short)]
        language: Option<String>,

        /// Type the snippet and report speed and accuracy
        #[arg(long)]
        practice: bool,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    Get,
    Set {
        #[arg(value_parser = parse_profile)]
        profile: Profile,
    },
}

fn parse_profile(s: &str) -> Result<Profile, String> {
    s.parse().map_err(|e| format!("{e}; expected one of general, finance, construction"))
}

struct App {
    config: Config,
    pipeline: LessonPipeline,
    progress: JsonProgressStore,
    profile: FileProfileStore,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        let registry = load_registry_dir(&config.content_dir)
            .context("Failed to load override registry")?;
        let catalog = LessonCatalog::new(Arc::new(DirectorySource::new(&config.content_dir)));
        let pipeline = LessonPipeline::new(Arc::new(catalog), Arc::new(registry));
        let progress = JsonProgressStore::new(config.progress_path());
        let profile = FileProfileStore::new(config.profile_path(), config.profile);
        Ok(Self {
            config,
            pipeline,
            progress,
            profile,
        })
    }

    async fn profile_or_stored(&self, profile: Option<Profile>) -> Result<Profile> {
        match profile {
            Some(p) => Ok(p),
            None => Ok(self.profile.get().await?),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.content_dir {
        config.content_dir = dir;
    }
    if let Some(dir) = cli.state_dir {
        config.state_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    tracing_subscriber::fmt()
        .with_max_level(config.log_level()?)
        .with_writer(std::io::stderr)
        .init();

    let app = App::new(config)?;

    match cli.command {
        Commands::Tracks => {
            for track in app.pipeline.catalog().tracks().await? {
                println!("{}", track);
            }
        }

        Commands::Lessons { track } => {
            let lessons = app.pipeline.catalog().lessons(&track).await?;
            if lessons.is_empty() {
                println!("No lessons found.");
            }
            for lesson in lessons {
                println!("{:>3}  {} ({} steps)", lesson.lesson_id, lesson.title, lesson.steps);
            }
        }

        Commands::Show {
            track,
            lesson,
            step,
            profile,
        } => {
            let profile = app.profile_or_stored(profile).await?;
            let effective = app
                .pipeline
                .effective_step(&track, lesson, profile, step)
                .await
                .map_err(|e| match e {
                    e @ ResolveError::StepNotFound { .. } => {
                        anyhow::anyhow!("Step not found for this lesson ({e})")
                    }
                    e @ ResolveError::Content(_) => anyhow::Error::new(e).context("Failed to load lesson"),
                    e => anyhow::Error::new(e),
                })?;
            print!("{}", render_text(&effective));
        }

        Commands::Walk {
            track,
            lesson,
            profile,
            restart,
        } => {
            let profile = app.profile_or_stored(profile).await?;
            walk(&app, &track, lesson, profile, restart).await?;
        }

        Commands::Progress { track, lesson } => {
            let key = LessonKey::new(&track, lesson);
            let record = app.progress.get(&key).await?;
            println!("{}: completed step {}", key, record.completed_step);
            if let Some(wpm) = record.best_wpm {
                println!("best WPM: {:.1}", wpm);
            }
            if let Some(acc) = record.best_acc {
                println!("best accuracy: {:.1}%", acc);
            }
        }

        Commands::Profile { action } => match action {
            ProfileAction::Get => println!("{}", app.profile.get().await?),
            ProfileAction::Set { profile } => {
                app.profile.set(profile).await?;
                info!("Profile set to {}", profile);
                println!("{}", profile);
            }
        },

        Commands::Lint => {
            let issues = lint_all(app.pipeline.catalog(), app.pipeline.registry()).await?;
            for issue in &issues {
                println!("{}", issue);
            }
            if issues.is_empty() {
                println!("No issues found.");
            } else {
                anyhow::bail!("{} content issue(s) found", issues.len());
            }
        }

        Commands::Snippet { language, practice } => {
            let library = SnippetLibrary::load_dir(&app.config.content_dir)?;
            let language = language.as_deref().map(normalize_track);
            match library.pick(language.as_deref(), &mut rand::thread_rng()) {
                Some(snippet) => {
                    println!(
                        "# {} snippet {} ({} lines, {} characters)\n{}",
                        snippet.language, snippet.id, snippet.lines, snippet.characters, snippet.text
                    );
                    if practice {
                        let mut input = BufReader::new(tokio::io::stdin()).lines();
                        type_snippet(&mut input, &snippet.text).await?;
                    }
                }
                None => warn!("No snippet available for {:?}", language),
            }
        }
    }

    Ok(())
}

type Input = Lines<BufReader<Stdin>>;

async fn prompt(input: &mut Input, message: &str) -> Result<Option<String>> {
    eprint!("{}", message);
    Ok(input.next_line().await?)
}

async fn walk(app: &App, track: &str, lesson_id: u32, profile: Profile, restart: bool) -> Result<()> {
    let lesson = app
        .pipeline
        .merged_lesson(track, lesson_id, profile)
        .await
        .context("Failed to load lesson")?;
    if lesson.steps.is_empty() {
        println!("No lesson data available.");
        return Ok(());
    }

    let key = LessonKey::new(track, lesson_id);
    let stored = app.progress.get(&key).await?;
    let mut session = LessonSession::new(&key.track, lesson_id, lesson.steps.len());
    if !restart && stored.completed_step > 0 {
        session = session.resume_at(stored.completed_step.saturating_add(1));
    }
    info!(key = %key, %profile, start = session.position(), "Starting lesson");

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    println!("{} ({} profile)", lesson.title, profile);

    loop {
        let effective = app
            .pipeline
            .effective_step(track, lesson_id, profile, session.position())
            .await?;
        println!("\nStep {} of {}", session.position(), session.total());
        print!("{}", render_text(&effective));
        if let Some(score) = exercise(&mut input, &effective).await? {
            let best = app.progress.get(&key).await?;
            let update = best.improvements(score.wpm, score.accuracy);
            if update.best_wpm.is_some() || update.best_acc.is_some() {
                app.progress.update(&key, update).await?;
                println!("New personal best!");
            }
        }

        let choice = prompt(&mut input, "\n[n]ext, [p]rev, [q]uit > ").await?;
        match choice.as_deref().map(str::trim) {
            None | Some("q") => break,
            Some("p") => {
                if !session.prev() {
                    println!("Already on the first step.");
                }
            }
            _ => {
                let completed = session.position().max(stored.completed_step);
                app.progress
                    .update(
                        &key,
                        ProgressUpdate {
                            completed_step: Some(completed),
                            ..ProgressUpdate::default()
                        },
                    )
                    .await?;
                if session.next() == Navigation::Finished {
                    let total = app.pipeline.catalog().total_lessons(track).await?;
                    println!("\nLesson {} of {} complete. Congratulations!", lesson_id, total);
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Has the learner type `snippet` line by line. `None` when input ends first.
async fn type_snippet(input: &mut Input, snippet: &str) -> Result<Option<TypingScore>> {
    let mut attempt = TypingAttempt::new(snippet);
    if attempt.is_finished() {
        return Ok(None);
    }
    eprintln!("Type the snippet above, line by line.");
    let started = Instant::now();
    while !attempt.is_finished() {
        let Some(line) = prompt(input, "> ").await? else {
            return Ok(None);
        };
        attempt.push_line(&line);
    }
    let score = attempt.score(started.elapsed());
    println!("{:.1} WPM, {:.1}% accuracy", score.wpm, score.accuracy);
    Ok(Some(score))
}

/// Lets the learner type, answer quizzes and fill blanks before moving on.
/// Returns the typing score of a typing challenge.
async fn exercise(input: &mut Input, step: &EffectiveStep) -> Result<Option<TypingScore>> {
    match step {
        EffectiveStep::TypingChallenge { code_snippet, .. } => {
            return type_snippet(input, code_snippet).await;
        }
        EffectiveStep::Quiz { questions, .. } if !questions.is_empty() => {
            let mut attempt = QuizAttempt::new(questions);
            for (qi, q) in questions.iter().enumerate() {
                let Some(answer) = prompt(input, &format!("Answer {} > ", qi + 1)).await? else {
                    break;
                };
                let recorded = answer
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .is_some_and(|option| attempt.answer(qi, option));
                if !recorded {
                    println!("Skipped.");
                }
                if let Some(correct) = q.options.get(q.correct_index) {
                    println!("Correct answer: {}", correct);
                }
            }
            println!("Score: {} / {}", attempt.score(), attempt.total());
        }
        EffectiveStep::TypingChallengeWithBlanks {
            code_lines,
            blank_lines,
            ..
        } => {
            let mut fill = BlankFill::new(code_lines, blank_lines);
            let blanks: Vec<usize> = fill.blanks().collect();
            for idx in blanks {
                let Some(line) = prompt(input, &format!("Line {} > ", idx + 1)).await? else {
                    break;
                };
                fill.fill(idx, &line);
                if !fill.is_correct(idx) {
                    println!("Expected: {}", code_lines[idx]);
                }
            }
            println!("\n{}", fill.assemble());
            if fill.is_complete() {
                println!("All blanks filled correctly.");
            }
        }
        _ => {}
    }
    Ok(None)
}
