//! Commands for the quiz context.

use kitobxon_core::command::Command;
use kitobxon_core::model::{OptionTag, UserId};
use uuid::Uuid;

/// Command to start a quiz for a registered reader.
#[derive(Debug, Clone)]
pub struct StartQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The reader starting the quiz.
    pub user_id: UserId,
}

impl Command for StartQuiz {
    fn command_type(&self) -> &'static str {
        "quiz.start"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Command carrying a reader's tap on one of the four options.
#[derive(Debug, Clone)]
pub struct SubmitAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The reader who tapped.
    pub user_id: UserId,
    /// 0-based number of the question the tap was raised for.
    pub cursor: usize,
    /// The tapped option.
    pub option: OptionTag,
}

impl Command for SubmitAnswer {
    fn command_type(&self) -> &'static str {
        "quiz.submit_answer"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Command to retry saving a finished quiz whose result could not be
/// persisted.
#[derive(Debug, Clone)]
pub struct RetryCompletion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Owner of the finished quiz.
    pub user_id: UserId,
}

impl Command for RetryCompletion {
    fn command_type(&self) -> &'static str {
        "quiz.retry_completion"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn user_id(&self) -> UserId {
        self.user_id
    }
}
