/// Result of moving forward in a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Advanced(usize),
    Finished,
}

/// Step cursor of one lesson view. Positions are 1-based.
#[derive(Debug, Clone)]
pub struct LessonSession {
    track: String,
    lesson_id: u32,
    total: usize,
    current: usize,
}

impl LessonSession {
    pub fn new(track: &str, lesson_id: u32, total: usize) -> Self {
        Self {
            track: track.to_string(),
            lesson_id,
            total,
            current: 1,
        }
    }

    /// Resume at `position`, clamped into the lesson.
    pub fn resume_at(mut self, position: usize) -> Self {
        self.current = position.clamp(1, self.total.max(1));
        self
    }

    pub fn track(&self) -> &str {
        &self.track
    }

    pub fn lesson_id(&self) -> u32 {
        self.lesson_id
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_last(&self) -> bool {
        self.current >= self.total
    }

    pub fn next(&mut self) -> Navigation {
        if self.current < self.total {
            self.current += 1;
            Navigation::Advanced(self.current)
        } else {
            Navigation::Finished
        }
    }

    /// Returns false when already on the first step.
    pub fn prev(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_forward_and_finishes() {
        let mut session = LessonSession::new("react", 1, 3);
        assert_eq!(session.position(), 1);
        assert!(!session.prev());
        assert_eq!(session.next(), Navigation::Advanced(2));
        assert_eq!(session.next(), Navigation::Advanced(3));
        assert!(session.is_last());
        assert_eq!(session.next(), Navigation::Finished);
        assert_eq!(session.position(), 3);
        assert!(session.prev());
        assert_eq!(session.position(), 2);
    }

    #[test]
    fn resume_is_clamped() {
        assert_eq!(LessonSession::new("js", 1, 6).resume_at(9).position(), 6);
        assert_eq!(LessonSession::new("js", 1, 6).resume_at(0).position(), 1);
        assert_eq!(LessonSession::new("js", 1, 0).resume_at(4).position(), 1);
    }
}
