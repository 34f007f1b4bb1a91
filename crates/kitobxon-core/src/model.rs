//! Quiz data model shared by the engine, the stores and the chat adapters.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::time::format_elapsed;

/// Number of questions in every quiz.
pub const QUESTIONS_PER_QUIZ: usize = 25;

/// Points awarded for each correct answer (25 × 4 = 100).
pub const POINTS_PER_CORRECT_ANSWER: u32 = 4;

/// Chat-platform user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Age-based partition of the question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bracket {
    /// Readers aged 7 to 10.
    #[serde(rename = "7-10")]
    Ages7To10,
    /// Readers aged 11 to 14.
    #[serde(rename = "11-14")]
    Ages11To14,
}

impl Bracket {
    /// Every bracket, youngest first.
    pub const ALL: [Bracket; 2] = [Bracket::Ages7To10, Bracket::Ages11To14];

    /// Returns the bracket a reader of the given age takes quizzes in.
    #[must_use]
    pub fn for_age(age: u8) -> Self {
        if age <= 10 {
            Self::Ages7To10
        } else {
            Self::Ages11To14
        }
    }

    /// Stable label, also used as the storage key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ages7To10 => "7-10",
            Self::Ages11To14 => "11-14",
        }
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bracket {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7-10" => Ok(Self::Ages7To10),
            "11-14" => Ok(Self::Ages11To14),
            other => Err(DomainError::Validation(format!("unknown bracket: {other}"))),
        }
    }
}

/// One of the four answer options of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionTag {
    /// First option.
    A,
    /// Second option.
    B,
    /// Third option.
    C,
    /// Fourth option.
    D,
}

impl OptionTag {
    /// All tags in display order.
    pub const ALL: [OptionTag; 4] = [OptionTag::A, OptionTag::B, OptionTag::C, OptionTag::D];

    /// Position of the option within [`Question::options`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    /// Inverse of [`OptionTag::index`].
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Upper-case letter of the tag.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

impl fmt::Display for OptionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for OptionTag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(Self::A),
            "b" => Ok(Self::B),
            "c" => Ok(Self::C),
            "d" => Ok(Self::D),
            other => Err(DomainError::Validation(format!("unknown option: {other}"))),
        }
    }
}

/// A multiple-choice question with exactly four options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question identifier.
    pub id: Uuid,
    /// Prompt shown to the reader.
    pub prompt: String,
    /// Option texts, indexed by [`OptionTag::index`].
    pub options: [String; 4],
    /// The correct option.
    pub correct: OptionTag,
}

impl Question {
    /// Returns the text of the given option.
    #[must_use]
    pub fn option_text(&self, tag: OptionTag) -> &str {
        &self.options[tag.index()]
    }

    /// Returns `true` if `tag` is the correct option.
    #[must_use]
    pub fn is_correct(&self, tag: OptionTag) -> bool {
        self.correct == tag
    }
}

/// A registered reader as known to the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Chat-platform identifier.
    pub user_id: UserId,
    /// The child's name as entered at registration.
    pub display_name: String,
    /// Chat-platform handle, if the user has one.
    pub username: Option<String>,
    /// Age in years at registration.
    pub age: u8,
}

impl UserProfile {
    /// The bracket this reader takes quizzes in.
    #[must_use]
    pub fn bracket(&self) -> Bracket {
        Bracket::for_age(self.age)
    }
}

/// Outcome recorded for one question of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// The option the reader picked; `None` when the deadline expired.
    pub selected: Option<OptionTag>,
    /// Whether the pick was correct. Always `false` for a timeout.
    pub correct: bool,
}

impl AnswerRecord {
    /// Record for a question the reader answered.
    #[must_use]
    pub fn answered(selected: OptionTag, correct: bool) -> Self {
        Self {
            selected: Some(selected),
            correct,
        }
    }

    /// Record for a question whose deadline expired.
    #[must_use]
    pub fn timed_out() -> Self {
        Self {
            selected: None,
            correct: false,
        }
    }
}

/// A question as delivered to the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDispatch {
    /// Session the question belongs to.
    pub session_id: Uuid,
    /// Recipient.
    pub user_id: UserId,
    /// 0-based position of the question; answers must echo it back.
    pub number: usize,
    /// Number of questions in the session.
    pub total: usize,
    /// Prompt text.
    pub prompt: String,
    /// Option texts in [`OptionTag`] order.
    pub options: [String; 4],
    /// Seconds the reader has before the question times out.
    pub time_limit_secs: u64,
}

impl QuestionDispatch {
    /// 1-based question number for display.
    #[must_use]
    pub fn display_number(&self) -> usize {
        self.number + 1
    }
}

/// Immediate feedback for an accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnswerOutcome {
    /// The picked option was correct.
    Correct,
    /// The picked option was wrong; the correct one is revealed.
    Incorrect {
        /// The option that would have been correct.
        correct_option: OptionTag,
    },
}

impl AnswerOutcome {
    /// Returns `true` for [`AnswerOutcome::Correct`].
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// Final, persisted result of a completed quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Result identifier; stable across persistence retries.
    pub result_id: Uuid,
    /// Owner of the session.
    pub user_id: UserId,
    /// The child's name at the time of the quiz.
    pub display_name: String,
    /// Chat-platform handle, if any.
    pub username: Option<String>,
    /// Bracket the questions were drawn from.
    pub bracket: Bracket,
    /// Points scored, 0 to 100.
    pub score: u32,
    /// Number of correctly answered questions.
    pub correct_count: u32,
    /// Number of questions in the quiz.
    pub total_questions: u32,
    /// Share of correct answers, rounded to two decimals.
    pub percentage: f64,
    /// Whole seconds between start and completion.
    pub elapsed_secs: i64,
    /// When the first question was dispatched.
    pub started_at: DateTime<Utc>,
    /// When the last question was resolved.
    pub completed_at: DateTime<Utc>,
    /// One record per question, in question order.
    pub answers: Vec<AnswerRecord>,
}

impl QuizResult {
    /// Elapsed time as a duration.
    #[must_use]
    pub fn elapsed(&self) -> TimeDelta {
        TimeDelta::seconds(self.elapsed_secs)
    }

    /// Elapsed time rendered as `H:MM:SS`.
    #[must_use]
    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.elapsed())
    }
}
