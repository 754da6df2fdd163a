use crate::content::{Lesson, Profile, QuizQuestion, Step, StepKind};

pub struct LessonBuilder {
    lesson_id: u32,
    track: String,
    title: String,
    pub steps: Vec<Step>, // public so tests can tweak a step in place
}

impl LessonBuilder {
    pub fn new(track: &str, lesson_id: u32) -> Self {
        Self {
            lesson_id,
            track: track.to_string(),
            title: format!("{} {}", track, lesson_id),
            steps: Vec::new(),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn step(self, title: &str) -> StepBuilder {
        self.step_of(title, StepKind::Plain)
    }

    pub fn typing_challenge(self, title: &str) -> StepBuilder {
        self.step_of(title, StepKind::TypingChallenge)
    }

    pub fn explanation(self, title: &str) -> StepBuilder {
        self.step_of(title, StepKind::Explanation)
    }

    pub fn quiz(self, title: &str) -> StepBuilder {
        self.step_of(title, StepKind::Quiz)
    }

    pub fn blanks(self, title: &str) -> StepBuilder {
        self.step_of(title, StepKind::TypingChallengeWithBlanks)
    }

    fn step_of(self, title: &str, kind: StepKind) -> StepBuilder {
        StepBuilder {
            lesson_builder: self,
            step: Step {
                title: title.to_string(),
                kind,
                ..Step::default()
            },
        }
    }

    pub fn build(self) -> Lesson {
        Lesson {
            lesson_id: self.lesson_id,
            track: self.track,
            title: self.title,
            steps: self.steps,
        }
    }
}

pub struct StepBuilder {
    lesson_builder: LessonBuilder,
    step: Step,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl StepBuilder {
    pub fn description(mut self, text: &str) -> Self {
        self.step.description = Some(text.to_string());
        self
    }

    pub fn description_for(mut self, profile: Profile, text: &str) -> Self {
        self.step
            .description_by_profile
            .get_or_insert_with(Default::default)
            .insert(profile, text.to_string());
        self
    }

    pub fn bullets(mut self, items: &[&str]) -> Self {
        self.step.bullets = Some(strings(items));
        self
    }

    pub fn bullets_for(mut self, profile: Profile, items: &[&str]) -> Self {
        self.step
            .bullets_by_profile
            .get_or_insert_with(Default::default)
            .insert(profile, strings(items));
        self
    }

    pub fn question(mut self, question: &str, options: &[&str], correct_index: usize) -> Self {
        self.step.questions.get_or_insert_with(Vec::new).push(QuizQuestion {
            question: question.to_string(),
            options: strings(options),
            correct_index,
        });
        self
    }

    pub fn questions_for(mut self, profile: Profile, questions: Vec<QuizQuestion>) -> Self {
        self.step
            .questions_by_profile
            .get_or_insert_with(Default::default)
            .insert(profile, questions);
        self
    }

    pub fn code_snippet(mut self, code: &str) -> Self {
        self.step.code_snippet = Some(code.to_string());
        self
    }

    pub fn code_snippet_for(mut self, profile: Profile, code: &str) -> Self {
        self.step
            .code_snippet_by_profile
            .get_or_insert_with(Default::default)
            .insert(profile, code.to_string());
        self
    }

    pub fn code_lines(mut self, lines: &[&str]) -> Self {
        self.step.code_lines = Some(strings(lines));
        self
    }

    pub fn code_lines_for(mut self, profile: Profile, lines: &[&str]) -> Self {
        self.step
            .code_lines_by_profile
            .get_or_insert_with(Default::default)
            .insert(profile, strings(lines));
        self
    }

    pub fn blank_lines(mut self, indices: &[usize]) -> Self {
        self.step.blank_lines = Some(indices.iter().copied().collect());
        self
    }

    pub fn outro(mut self, text: &str) -> Self {
        self.step.outro = Some(text.to_string());
        self
    }

    pub fn example_key(mut self, key: &str) -> Self {
        self.step.example_key = Some(key.to_string());
        self
    }

    pub fn build(mut self) -> LessonBuilder {
        self.lesson_builder.steps.push(self.step);
        self.lesson_builder
    }
}
