use crate::render::EffectiveStep;
use std::fmt::Write;

const BLANK: &str = "____";

/// Plain-text rendering of a step for terminals.
pub fn render_text(step: &EffectiveStep) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## {}", step.title());
    if let Some(description) = step.description() {
        let _ = writeln!(out, "\n{}", description);
    }

    match step {
        EffectiveStep::Plain { bullets, outro, .. } => {
            if !bullets.is_empty() {
                out.push('\n');
                for item in bullets {
                    let _ = writeln!(out, "- {}", item);
                }
            }
            if let Some(outro) = outro {
                let _ = writeln!(out, "\n{}", outro);
            }
        }
        EffectiveStep::TypingChallenge { code_snippet, .. } => {
            let _ = writeln!(out, "\n{}", code_block(code_snippet.lines()));
        }
        EffectiveStep::Explanation {
            code_snippet,
            example_key,
            ..
        } => {
            if let Some(code) = code_snippet {
                let _ = writeln!(out, "\n{}", code_block(code.lines()));
            }
            if let Some(key) = example_key {
                let _ = writeln!(out, "\n(example: {})", key);
            }
        }
        EffectiveStep::Quiz { questions, .. } => {
            for (qi, q) in questions.iter().enumerate() {
                let _ = writeln!(out, "\n{}. {}", qi + 1, q.question);
                for (oi, option) in q.options.iter().enumerate() {
                    let _ = writeln!(out, "   {}) {}", oi + 1, option);
                }
            }
        }
        EffectiveStep::TypingChallengeWithBlanks {
            code_lines,
            blank_lines,
            ..
        } => {
            let shown = code_lines.iter().enumerate().map(|(idx, line)| {
                if blank_lines.contains(&idx) {
                    BLANK
                } else {
                    line.as_str()
                }
            });
            let _ = writeln!(out, "\n{}", code_block(shown));
        }
    }

    out
}

fn code_block<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    let mut block = String::new();
    for (idx, line) in lines.enumerate() {
        let _ = writeln!(block, "{:>3} | {}", idx + 1, line);
    }
    block.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn blanks_are_masked_and_numbered() {
        let step = EffectiveStep::TypingChallengeWithBlanks {
            title: "Fill".into(),
            description: None,
            code_lines: vec!["a".into(), "b".into()],
            blank_lines: BTreeSet::from([1]),
        };
        let text = render_text(&step);
        assert!(text.starts_with("## Fill\n"));
        assert!(text.contains("  1 | a"));
        assert!(text.contains("  2 | ____"));
        assert!(!text.contains("| b"));
    }

    #[test]
    fn plain_step_lists_bullets_and_outro() {
        let step = EffectiveStep::Plain {
            title: "Summary".into(),
            description: Some("Done".into()),
            bullets: vec!["one".into(), "two".into()],
            outro: Some("Bye".into()),
        };
        assert_eq!(render_text(&step), "## Summary\n\nDone\n\n- one\n- two\n\nBye\n");
    }
}
