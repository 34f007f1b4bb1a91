//! Outbound notification abstractions.
//!
//! Every call is independent and best-effort from the engine's point of
//! view: a failure is logged by the caller and never rolls back quiz state.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::model::{QuestionDispatch, QuizResult, UserId};

/// Messages delivered to the reader taking the quiz.
#[async_trait]
pub trait UserNotifier: Send + Sync {
    /// Sends a question with its four options.
    async fn send_question(&self, dispatch: &QuestionDispatch) -> Result<(), DomainError>;

    /// Tells the reader that question `number` (0-based) timed out.
    async fn send_time_up(&self, user_id: UserId, number: usize) -> Result<(), DomainError>;

    /// Sends the final summary of a persisted result.
    async fn send_summary(&self, result: &QuizResult) -> Result<(), DomainError>;

    /// Tells the reader their result could not be saved and may be retried.
    async fn send_completion_failed(&self, user_id: UserId) -> Result<(), DomainError>;
}

/// Messages delivered to administrators.
#[async_trait]
pub trait AdminNotifier: Send + Sync {
    /// Sends a result summary to one administrator.
    async fn send_admin_summary(
        &self,
        admin_id: UserId,
        result: &QuizResult,
    ) -> Result<(), DomainError>;
}
