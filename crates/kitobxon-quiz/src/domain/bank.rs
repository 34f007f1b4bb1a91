//! Question bank and sampler.

use kitobxon_core::error::DomainError;
use kitobxon_core::model::{Bracket, Question};
use kitobxon_core::repository::QuestionImport;
use kitobxon_core::rng::DeterministicRng;

use super::error::QuizError;

/// Snapshot of the questions tagged with one bracket.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    bracket: Bracket,
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Creates a bank from already loaded questions.
    #[must_use]
    pub fn new(bracket: Bracket, questions: Vec<Question>) -> Self {
        Self { bracket, questions }
    }

    /// Loads the current questions of `bracket`. Every quiz start loads a
    /// fresh snapshot, so newly imported questions show up in the next quiz.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the import cannot be read.
    pub async fn load(import: &dyn QuestionImport, bracket: Bracket) -> Result<Self, DomainError> {
        let questions = import.all_questions(bracket).await?;
        Ok(Self::new(bracket, questions))
    }

    /// The bracket this bank was loaded for.
    #[must_use]
    pub fn bracket(&self) -> Bracket {
        self.bracket
    }

    /// Number of questions in the bank.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Returns `true` if the bank holds no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Draws `n` distinct questions uniformly without replacement.
    ///
    /// Runs the first `n` steps of a Fisher–Yates shuffle over question
    /// indices; the bank itself is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InsufficientQuestions` if the bank holds fewer
    /// than `n` questions.
    pub fn sample(
        &self,
        n: usize,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Vec<Question>, QuizError> {
        let len = self.questions.len();
        if len < n {
            return Err(QuizError::InsufficientQuestions {
                bracket: self.bracket,
                available: len,
                required: n,
            });
        }

        let mut indices: Vec<usize> = (0..len).collect();
        let last = len.saturating_sub(1);
        for i in 0..n {
            let min = u32::try_from(i).unwrap_or(u32::MAX);
            let max = u32::try_from(last).unwrap_or(u32::MAX);
            let drawn = rng.next_u32_range(min, max);
            let j = usize::try_from(drawn).map_or(i, |j| j.clamp(i, last));
            indices.swap(i, j);
        }

        Ok(indices[..n]
            .iter()
            .map(|&index| self.questions[index].clone())
            .collect())
    }
}
