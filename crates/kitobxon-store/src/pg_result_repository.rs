//! `PostgreSQL` implementation of the `ResultRepository` trait.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::debug;

use kitobxon_core::error::DomainError;
use kitobxon_core::model::{AnswerRecord, Bracket, QuizResult, UserId};
use kitobxon_core::repository::ResultRepository;

use crate::mapping::{corrupt, i32_from_u32, infra, u32_from_i32};

/// PostgreSQL-backed storage of completed quiz results.
#[derive(Debug, Clone)]
pub struct PgResultRepository {
    pool: PgPool,
}

impl PgResultRepository {
    /// Creates a new `PgResultRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_result_row(row: &PgRow) -> Result<QuizResult, DomainError> {
    let bracket: String = row.try_get("bracket").map_err(infra)?;
    let answers: Json<Vec<AnswerRecord>> = row.try_get("answers").map_err(infra)?;
    Ok(QuizResult {
        result_id: row.try_get("result_id").map_err(infra)?,
        user_id: UserId(row.try_get("user_id").map_err(infra)?),
        display_name: row.try_get("display_name").map_err(infra)?,
        username: row.try_get("username").map_err(infra)?,
        bracket: bracket
            .parse::<Bracket>()
            .map_err(|e| corrupt("bracket", e))?,
        score: u32_from_i32("score", row.try_get("score").map_err(infra)?)?,
        correct_count: u32_from_i32("correct_count", row.try_get("correct_count").map_err(infra)?)?,
        total_questions: u32_from_i32(
            "total_questions",
            row.try_get("total_questions").map_err(infra)?,
        )?,
        percentage: row.try_get("percentage").map_err(infra)?,
        elapsed_secs: row.try_get("elapsed_secs").map_err(infra)?,
        started_at: row.try_get("started_at").map_err(infra)?,
        completed_at: row.try_get("completed_at").map_err(infra)?,
        answers: answers.0,
    })
}

#[async_trait]
impl ResultRepository for PgResultRepository {
    async fn persist_result(&self, result: &QuizResult) -> Result<(), DomainError> {
        let inserted = sqlx::query(
            r"
                INSERT INTO quiz_results (
                    result_id, user_id, display_name, username, bracket,
                    score, correct_count, total_questions, percentage,
                    elapsed_secs, started_at, completed_at, answers
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                ON CONFLICT (result_id) DO NOTHING
            ",
        )
        .bind(result.result_id)
        .bind(result.user_id.0)
        .bind(&result.display_name)
        .bind(&result.username)
        .bind(result.bracket.as_str())
        .bind(i32_from_u32("score", result.score)?)
        .bind(i32_from_u32("correct_count", result.correct_count)?)
        .bind(i32_from_u32("total_questions", result.total_questions)?)
        .bind(result.percentage)
        .bind(result.elapsed_secs)
        .bind(result.started_at)
        .bind(result.completed_at)
        .bind(Json(&result.answers))
        .execute(&self.pool)
        .await
        .map_err(infra)?;

        if inserted.rows_affected() == 0 {
            debug!(result_id = %result.result_id, "result already persisted");
        }
        Ok(())
    }

    async fn results_for_user(&self, user_id: UserId) -> Result<Vec<QuizResult>, DomainError> {
        let rows = sqlx::query(
            r"
                SELECT
                    result_id, user_id, display_name, username, bracket,
                    score, correct_count, total_questions, percentage,
                    elapsed_secs, started_at, completed_at, answers
                FROM quiz_results
                WHERE user_id = $1
                ORDER BY completed_at ASC
            ",
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        rows.iter().map(map_result_row).collect()
    }
}
