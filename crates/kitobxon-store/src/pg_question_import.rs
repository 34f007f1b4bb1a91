//! `PostgreSQL` implementation of the `QuestionImport` trait.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use kitobxon_core::error::DomainError;
use kitobxon_core::model::{Bracket, OptionTag, Question};
use kitobxon_core::repository::QuestionImport;

use crate::mapping::{corrupt, infra};

/// PostgreSQL-backed view of the imported question bank.
#[derive(Debug, Clone)]
pub struct PgQuestionImport {
    pool: PgPool,
}

impl PgQuestionImport {
    /// Creates a new `PgQuestionImport`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_question_row(row: &PgRow) -> Result<Question, DomainError> {
    let correct: String = row.try_get("correct_option").map_err(infra)?;
    Ok(Question {
        id: row.try_get("question_id").map_err(infra)?,
        prompt: row.try_get("prompt").map_err(infra)?,
        options: [
            row.try_get("option_a").map_err(infra)?,
            row.try_get("option_b").map_err(infra)?,
            row.try_get("option_c").map_err(infra)?,
            row.try_get("option_d").map_err(infra)?,
        ],
        correct: correct
            .parse::<OptionTag>()
            .map_err(|e| corrupt("correct_option", e))?,
    })
}

#[async_trait]
impl QuestionImport for PgQuestionImport {
    async fn all_questions(&self, bracket: Bracket) -> Result<Vec<Question>, DomainError> {
        let rows = sqlx::query(
            r"
                SELECT question_id, prompt, option_a, option_b, option_c, option_d, correct_option
                FROM questions
                WHERE bracket = $1
                ORDER BY imported_at ASC, question_id ASC
            ",
        )
        .bind(bracket.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        rows.iter().map(map_question_row).collect()
    }
}
