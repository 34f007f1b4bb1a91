//! The quiz session entity and its guarded answer transition.

use std::time::Duration;

use chrono::{DateTime, Utc};
use kitobxon_core::error::DomainError;
use kitobxon_core::model::{
    AnswerOutcome, AnswerRecord, Bracket, OptionTag, QUESTIONS_PER_QUIZ, Question,
    QuestionDispatch, UserId, UserProfile,
};
use kitobxon_core::time::Clock;
use serde::Serialize;
use uuid::Uuid;

/// Lifecycle state of a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Questions are still being asked.
    InProgress,
    /// Every question is resolved and the result is waiting to be saved.
    Completing,
}

/// An event that tries to resolve the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The reader tapped an option.
    Answered(OptionTag),
    /// The question's deadline expired.
    TimedOut,
}

/// Effect of a winning resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// 0-based number of the resolved question.
    pub number: usize,
    /// Record appended for the question.
    pub record: AnswerRecord,
    /// The question's correct option.
    pub correct_option: OptionTag,
}

impl Resolved {
    /// Feedback for the reader. A timeout reveals the correct option like a
    /// wrong answer does.
    #[must_use]
    pub fn outcome(&self) -> AnswerOutcome {
        if self.record.correct {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect {
                correct_option: self.correct_option,
            }
        }
    }
}

/// Read-only view of a live session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    /// Session identifier.
    pub session_id: Uuid,
    /// Owner of the session.
    pub user_id: UserId,
    /// Bracket the questions were drawn from.
    pub bracket: Bracket,
    /// 0-based number of the current question.
    pub cursor: usize,
    /// Number of questions in the session.
    pub total: usize,
    /// Records of the questions resolved so far.
    pub answers: Vec<AnswerRecord>,
    /// Lifecycle state.
    pub state: SessionState,
    /// When the quiz started.
    pub started_at: DateTime<Utc>,
}

/// One reader's quiz: the drawn questions, a cursor into them and one
/// answer record per resolved question.
///
/// Invariant: `answers.len() == cursor`.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    profile: UserProfile,
    bracket: Bracket,
    questions: Vec<Question>,
    cursor: usize,
    answers: Vec<AnswerRecord>,
    started_at: DateTime<Utc>,
    state: SessionState,
}

impl QuizSession {
    /// Starts a session over `questions` for `profile`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless exactly
    /// `QUESTIONS_PER_QUIZ` questions are given.
    pub fn start(
        profile: UserProfile,
        questions: Vec<Question>,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        if questions.len() != QUESTIONS_PER_QUIZ {
            return Err(DomainError::Validation(format!(
                "a quiz needs {QUESTIONS_PER_QUIZ} questions, got {}",
                questions.len()
            )));
        }
        let bracket = profile.bracket();
        let answers = Vec::with_capacity(questions.len());
        Ok(Self {
            id: Uuid::new_v4(),
            profile,
            bracket,
            questions,
            cursor: 0,
            answers,
            started_at: clock.now(),
            state: SessionState::InProgress,
        })
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owner of the session.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.profile.user_id
    }

    /// The reader's profile as of the quiz start.
    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Bracket the questions were drawn from.
    #[must_use]
    pub fn bracket(&self) -> Bracket {
        self.bracket
    }

    /// 0-based number of the current question.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of questions in the session.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Records of the questions resolved so far, in question order.
    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// When the quiz started.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns `true` once every question is resolved.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor == self.questions.len()
    }

    /// Returns `true` if the question at `cursor` is still awaiting a tap or
    /// its deadline.
    #[must_use]
    pub fn is_pending(&self, cursor: usize) -> bool {
        self.state == SessionState::InProgress
            && cursor == self.cursor
            && cursor < self.questions.len()
    }

    /// The question at the cursor, if any is left.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    /// Builds the message for the current question.
    #[must_use]
    pub fn dispatch(&self, time_limit: Duration) -> Option<QuestionDispatch> {
        if self.state != SessionState::InProgress {
            return None;
        }
        let question = self.current_question()?;
        Some(QuestionDispatch {
            session_id: self.id,
            user_id: self.user_id(),
            number: self.cursor,
            total: self.questions.len(),
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            time_limit_secs: time_limit.as_secs(),
        })
    }

    /// Resolves the question at `cursor` with `resolution`.
    ///
    /// Both guards (the question is still pending, and `cursor` is the
    /// session's current cursor) and the effects are applied under one
    /// `&mut self` borrow. Returns `None` for an event that lost: the
    /// session is left untouched.
    pub fn resolve(&mut self, cursor: usize, resolution: Resolution) -> Option<Resolved> {
        if !self.is_pending(cursor) {
            return None;
        }
        let question = &self.questions[cursor];
        let correct_option = question.correct;

        let record = match resolution {
            Resolution::Answered(option) => AnswerRecord::answered(option, question.is_correct(option)),
            Resolution::TimedOut => AnswerRecord::timed_out(),
        };

        self.answers.push(record);
        self.cursor += 1;

        Some(Resolved {
            number: cursor,
            record,
            correct_option,
        })
    }

    /// Marks a finished session as waiting for its result to be saved.
    /// Does nothing while questions remain.
    pub fn begin_completing(&mut self) {
        if self.is_finished() {
            self.state = SessionState::Completing;
        }
    }

    /// Snapshot for progress queries.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            user_id: self.user_id(),
            bracket: self.bracket,
            cursor: self.cursor,
            total: self.questions.len(),
            answers: self.answers.clone(),
            state: self.state,
            started_at: self.started_at,
        }
    }
}
