use crate::content::QuizQuestion;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// A learner's answers to a quiz step.
#[derive(Debug, Clone)]
pub struct QuizAttempt<'a> {
    questions: &'a [QuizQuestion],
    answers: Vec<Option<usize>>,
}

impl<'a> QuizAttempt<'a> {
    pub fn new(questions: &'a [QuizQuestion]) -> Self {
        Self {
            questions,
            answers: vec![None; questions.len()],
        }
    }

    /// Records an answer; out-of-range question or option indices are ignored.
    pub fn answer(&mut self, question: usize, option: usize) -> bool {
        match (self.questions.get(question), self.answers.get_mut(question)) {
            (Some(q), Some(slot)) if option < q.options.len() => {
                *slot = Some(option);
                true
            }
            _ => false,
        }
    }

    pub fn answered(&self, question: usize) -> Option<usize> {
        self.answers.get(question).copied().flatten()
    }

    pub fn score(&self) -> usize {
        self.questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| **a == Some(q.correct_index))
            .count()
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }
}

/// Typed lines for a fill-in-the-blanks step.
#[derive(Debug, Clone)]
pub struct BlankFill<'a> {
    code_lines: &'a [String],
    blank_lines: &'a BTreeSet<usize>,
    fills: BTreeMap<usize, String>,
}

impl<'a> BlankFill<'a> {
    pub fn new(code_lines: &'a [String], blank_lines: &'a BTreeSet<usize>) -> Self {
        Self {
            code_lines,
            blank_lines,
            fills: BTreeMap::new(),
        }
    }

    /// Blanks that have a backing code line, in order.
    pub fn blanks(&self) -> impl Iterator<Item = usize> + '_ {
        self.blank_lines
            .iter()
            .copied()
            .filter(|idx| *idx < self.code_lines.len())
    }

    pub fn fill(&mut self, line: usize, text: &str) -> bool {
        if !self.blank_lines.contains(&line) || line >= self.code_lines.len() {
            return false;
        }
        self.fills.insert(line, text.to_string());
        true
    }

    /// Source with typed text in place of blanks; unfilled blanks are empty.
    pub fn assemble(&self) -> String {
        self.code_lines
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                if self.blank_lines.contains(&idx) {
                    self.fills.get(&idx).map(String::as_str).unwrap_or("")
                } else {
                    line.as_str()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_correct(&self, line: usize) -> bool {
        match (self.code_lines.get(line), self.fills.get(&line)) {
            (Some(expected), Some(typed)) => expected.trim() == typed.trim(),
            _ => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.blanks().all(|idx| self.is_correct(idx))
    }
}

/// Speed and accuracy of one typing attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypingScore {
    pub wpm: f64,
    /// Percentage of typed characters that match the snippet.
    pub accuracy: f64,
}

/// Text typed against a snippet, line by line.
#[derive(Debug, Clone)]
pub struct TypingAttempt<'a> {
    target: &'a str,
    typed: String,
    lines: usize,
}

impl<'a> TypingAttempt<'a> {
    pub fn new(target: &'a str) -> Self {
        Self {
            target,
            typed: String::new(),
            lines: 0,
        }
    }

    pub fn push_line(&mut self, line: &str) {
        if self.lines > 0 {
            self.typed.push('\n');
        }
        self.typed.push_str(line);
        self.lines += 1;
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn lines_expected(&self) -> usize {
        self.target.lines().count()
    }

    pub fn is_finished(&self) -> bool {
        self.lines >= self.lines_expected()
    }

    /// Characters matching the snippet at the same position.
    pub fn correct_chars(&self) -> usize {
        self.typed
            .chars()
            .zip(self.target.chars())
            .filter(|(typed, expected)| typed == expected)
            .count()
    }

    /// Zero until something is typed. Characters past the end of the snippet
    /// count as mistakes.
    pub fn accuracy(&self) -> f64 {
        let typed = self.typed.chars().count();
        if typed == 0 {
            return 0.0;
        }
        self.correct_chars() as f64 * 100.0 / typed as f64
    }

    /// Five typed characters make a word. Zero when no time has passed.
    pub fn wpm(&self, elapsed: Duration) -> f64 {
        let minutes = elapsed.as_secs_f64() / 60.0;
        if minutes <= 0.0 {
            return 0.0;
        }
        self.typed.chars().count() as f64 / 5.0 / minutes
    }

    pub fn score(&self, elapsed: Duration) -> TypingScore {
        TypingScore {
            wpm: self.wpm(elapsed),
            accuracy: self.accuracy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<QuizQuestion> {
        vec![
            QuizQuestion {
                question: "Which is a string?".into(),
                options: vec!["42".into(), "'42'".into(), "name".into()],
                correct_index: 1,
            },
            QuizQuestion {
                question: "What does console.log do?".into(),
                options: vec!["Declares".into(), "Prints".into()],
                correct_index: 1,
            },
        ]
    }

    #[test]
    fn quiz_scores_only_correct_answers() {
        let qs = questions();
        let mut attempt = QuizAttempt::new(&qs);
        assert_eq!(attempt.score(), 0);
        assert!(attempt.answer(0, 1));
        assert!(attempt.answer(1, 0));
        assert!(!attempt.answer(1, 7));
        assert!(!attempt.answer(5, 0));
        assert_eq!(attempt.score(), 1);
        assert_eq!(attempt.total(), 2);
        assert_eq!(attempt.answered(1), Some(0));
    }

    #[test]
    fn empty_quiz_has_zero_questions() {
        let attempt = QuizAttempt::new(&[]);
        assert_eq!(attempt.total(), 0);
        assert_eq!(attempt.score(), 0);
    }

    #[test]
    fn blanks_assemble_and_complete() {
        let lines: Vec<String> = vec![
            "const name = 'Ada';".into(),
            "const greeting = 'Hello, ' + name + '!';".into(),
            "console.log(greeting);".into(),
        ];
        let blanks = BTreeSet::from([1, 9]);
        let mut fill = BlankFill::new(&lines, &blanks);

        assert_eq!(fill.blanks().collect::<Vec<_>>(), vec![1]);
        assert_eq!(
            fill.assemble(),
            "const name = 'Ada';\n\nconsole.log(greeting);"
        );
        assert!(!fill.is_complete());

        assert!(fill.fill(1, "  const greeting = 'Hello, ' + name + '!';"));
        assert!(!fill.fill(0, "nope"));
        assert!(fill.is_complete());
    }

    #[test]
    fn typing_accuracy_counts_mismatches_and_overtyping() {
        let mut attempt = TypingAttempt::new("let x = 1;");
        assert_eq!(attempt.accuracy(), 0.0);

        attempt.push_line("let y");
        assert_eq!(attempt.correct_chars(), 4);
        assert_eq!(attempt.accuracy(), 80.0);
        assert!(attempt.is_finished());

        let mut over = TypingAttempt::new("ab");
        over.push_line("abcd");
        assert_eq!(over.accuracy(), 50.0);
    }

    #[test]
    fn typing_joins_lines_like_the_snippet() {
        let snippet = "fn main() {\n\n}";
        let mut attempt = TypingAttempt::new(snippet);
        assert_eq!(attempt.lines_expected(), 3);

        attempt.push_line("fn main() {");
        attempt.push_line("");
        assert!(!attempt.is_finished());
        attempt.push_line("}");
        assert!(attempt.is_finished());
        assert_eq!(attempt.typed(), snippet);
        assert_eq!(attempt.accuracy(), 100.0);
    }

    #[test]
    fn typing_wpm_uses_five_character_words() {
        let mut attempt = TypingAttempt::new("");
        attempt.push_line(&"a".repeat(50));

        assert_eq!(attempt.wpm(Duration::from_secs(60)), 10.0);
        assert_eq!(attempt.wpm(Duration::from_secs(30)), 20.0);
        assert_eq!(attempt.wpm(Duration::ZERO), 0.0);

        let score = attempt.score(Duration::ZERO);
        assert_eq!(score, TypingScore { wpm: 0.0, accuracy: 0.0 });
    }
}
