//! Repository abstractions consumed by the quiz engine.
//!
//! Registration, question import and report export are owned by other parts
//! of the bot; the engine only reads users and questions and writes results
//! through these traits.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::model::{Bracket, Question, QuizResult, UserId, UserProfile};

/// Read access to registered readers and administrators.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Looks up a registered reader. `None` means the user never registered.
    async fn find_user(&self, user_id: UserId) -> Result<Option<UserProfile>, DomainError>;

    /// Identifiers of every administrator that receives result broadcasts.
    async fn admin_ids(&self) -> Result<Vec<UserId>, DomainError>;

    /// Returns `true` if the user completed registration.
    async fn is_registered(&self, user_id: UserId) -> Result<bool, DomainError> {
        Ok(self.find_user(user_id).await?.is_some())
    }

    /// The bracket a registered reader takes quizzes in.
    async fn bracket_of(&self, user_id: UserId) -> Result<Option<Bracket>, DomainError> {
        Ok(self
            .find_user(user_id)
            .await?
            .map(|profile| profile.bracket()))
    }
}

/// Read access to the imported question bank.
#[async_trait]
pub trait QuestionImport: Send + Sync {
    /// Every question currently tagged with `bracket`.
    async fn all_questions(&self, bracket: Bracket) -> Result<Vec<Question>, DomainError>;
}

/// Durable storage for completed quiz results.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Persists a result. Persisting the same `result_id` twice must not
    /// create a second record.
    async fn persist_result(&self, result: &QuizResult) -> Result<(), DomainError>;

    /// All persisted results of a user, oldest first.
    async fn results_for_user(&self, user_id: UserId) -> Result<Vec<QuizResult>, DomainError>;
}
