//! Quiz error types.

use kitobxon_core::error::DomainError;
use kitobxon_core::model::{Bracket, UserId};
use thiserror::Error;

/// Errors returned by quiz operations.
#[derive(Debug, Clone, Error)]
pub enum QuizError {
    /// The user never completed registration.
    #[error("user {0} is not registered")]
    NotRegistered(UserId),

    /// The bracket does not hold enough questions for a quiz.
    #[error("bracket {bracket} has {available} questions, {required} required")]
    InsufficientQuestions {
        /// Bracket that was sampled.
        bracket: Bracket,
        /// Questions currently in the bracket.
        available: usize,
        /// Questions a quiz needs.
        required: usize,
    },

    /// The user already has a live quiz.
    #[error("user {0} already has a quiz in progress")]
    SessionAlreadyActive(UserId),

    /// The tapped question is no longer awaiting an answer.
    #[error("question {question_number} is not awaiting an answer")]
    AnswerRejected {
        /// 0-based number the tap was raised for.
        question_number: usize,
    },

    /// The user has no live quiz.
    #[error("user {0} has no quiz in progress")]
    NoActiveSession(UserId),

    /// The finished quiz could not be saved; completion can be retried.
    #[error("result could not be saved: {0}")]
    ResultNotPersisted(DomainError),

    /// A collaborator failed.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl QuizError {
    /// Returns `true` if repeating the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ResultNotPersisted(_))
    }
}
