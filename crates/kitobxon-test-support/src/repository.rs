//! Test repositories: in-memory, recording and failing implementations of
//! the engine's collaborator traits.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use kitobxon_core::error::DomainError;
use kitobxon_core::model::{Bracket, Question, QuizResult, UserId, UserProfile};
use kitobxon_core::repository::{QuestionImport, ResultRepository, UserDirectory};

/// A user directory backed by a fixed set of profiles and admin ids.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<UserId, UserProfile>,
    admins: Vec<UserId>,
}

impl InMemoryUserDirectory {
    /// Creates a directory holding `users`, broadcasting results to `admins`.
    #[must_use]
    pub fn new(users: Vec<UserProfile>, admins: Vec<UserId>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.user_id, u)).collect(),
            admins,
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user(&self, user_id: UserId) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.users.get(&user_id).cloned())
    }

    async fn admin_ids(&self) -> Result<Vec<UserId>, DomainError> {
        Ok(self.admins.clone())
    }
}

/// A question bank backed by per-bracket vectors.
#[derive(Debug, Default)]
pub struct InMemoryQuestionImport {
    questions: HashMap<Bracket, Vec<Question>>,
}

impl InMemoryQuestionImport {
    /// Creates an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `questions` to `bracket`.
    #[must_use]
    pub fn with(mut self, bracket: Bracket, questions: Vec<Question>) -> Self {
        self.questions.entry(bracket).or_default().extend(questions);
        self
    }
}

#[async_trait]
impl QuestionImport for InMemoryQuestionImport {
    async fn all_questions(&self, bracket: Bracket) -> Result<Vec<Question>, DomainError> {
        Ok(self.questions.get(&bracket).cloned().unwrap_or_default())
    }
}

/// A result repository that records every persisted result and ignores
/// repeated `result_id`s, like the real store does.
#[derive(Debug, Default)]
pub struct RecordingResultRepository {
    persisted: Mutex<Vec<QuizResult>>,
    attempts: Mutex<usize>,
}

impl RecordingResultRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all distinct results that were persisted.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn persisted(&self) -> Vec<QuizResult> {
        self.persisted.lock().unwrap().clone()
    }

    /// Number of `persist_result` calls, including duplicates.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    fn record(&self, result: &QuizResult) {
        *self.attempts.lock().unwrap() += 1;
        let mut persisted = self.persisted.lock().unwrap();
        if !persisted.iter().any(|r| r.result_id == result.result_id) {
            persisted.push(result.clone());
        }
    }
}

#[async_trait]
impl ResultRepository for RecordingResultRepository {
    async fn persist_result(&self, result: &QuizResult) -> Result<(), DomainError> {
        self.record(result);
        Ok(())
    }

    async fn results_for_user(&self, user_id: UserId) -> Result<Vec<QuizResult>, DomainError> {
        Ok(self
            .persisted()
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect())
    }
}

/// A result repository that always returns an infrastructure error. Useful
/// for testing error-handling paths.
#[derive(Debug)]
pub struct FailingResultRepository;

#[async_trait]
impl ResultRepository for FailingResultRepository {
    async fn persist_result(&self, _result: &QuizResult) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn results_for_user(&self, _user_id: UserId) -> Result<Vec<QuizResult>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

/// A result repository that fails the first `failures` persist calls and
/// records afterwards.
#[derive(Debug)]
pub struct FlakyResultRepository {
    remaining_failures: Mutex<usize>,
    inner: RecordingResultRepository,
}

impl FlakyResultRepository {
    /// Creates a repository that fails `failures` times before succeeding.
    #[must_use]
    pub fn new(failures: usize) -> Self {
        Self {
            remaining_failures: Mutex::new(failures),
            inner: RecordingResultRepository::new(),
        }
    }

    /// Results persisted once the failures ran out.
    pub fn persisted(&self) -> Vec<QuizResult> {
        self.inner.persisted()
    }
}

#[async_trait]
impl ResultRepository for FlakyResultRepository {
    async fn persist_result(&self, result: &QuizResult) -> Result<(), DomainError> {
        {
            let mut remaining = self.remaining_failures.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DomainError::Infrastructure("connection reset".into()));
            }
        }
        self.inner.persist_result(result).await
    }

    async fn results_for_user(&self, user_id: UserId) -> Result<Vec<QuizResult>, DomainError> {
        self.inner.results_for_user(user_id).await
    }
}
