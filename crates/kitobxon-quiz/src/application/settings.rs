//! Engine settings.

use std::time::Duration;

/// Default time a reader has to answer one question.
pub const DEFAULT_QUESTION_TIME_LIMIT: Duration = Duration::from_secs(60);

/// Tunables of the quiz engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    /// Time a reader has to answer one question before it times out.
    pub question_time_limit: Duration,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_time_limit: DEFAULT_QUESTION_TIME_LIMIT,
        }
    }
}
