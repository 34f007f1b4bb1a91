//! Routes for running quizzes.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use kitobxon_core::model::{AnswerOutcome, OptionTag, QuestionDispatch, QuizResult, UserId};
use kitobxon_quiz::domain::commands;
use kitobxon_quiz::domain::session::SessionView;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /start.
#[derive(Debug, Deserialize)]
pub struct StartQuizRequest {
    /// The reader starting the quiz.
    pub user_id: UserId,
}

/// Request body for POST /answer.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    /// The reader answering.
    pub user_id: UserId,
    /// 0-based number of the question being answered, as dispatched.
    pub question_number: usize,
    /// The picked option, `"A"` to `"D"`.
    pub option: OptionTag,
}

/// Request body for POST /complete.
#[derive(Debug, Deserialize)]
pub struct CompleteQuizRequest {
    /// Owner of the finished quiz.
    pub user_id: UserId,
}

/// POST /start
#[instrument(skip(state, request), fields(user_id = %request.user_id))]
async fn start_quiz(
    State(state): State<AppState>,
    Json(request): Json<StartQuizRequest>,
) -> Result<Json<QuestionDispatch>, ApiError> {
    let command = commands::StartQuiz {
        correlation_id: Uuid::new_v4(),
        user_id: request.user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling start_quiz command");

    let dispatch = state.engine.start_quiz(&command).await?;
    Ok(Json(dispatch))
}

/// POST /answer
#[instrument(
    skip(state, request),
    fields(user_id = %request.user_id, question_number = request.question_number)
)]
async fn submit_answer(
    State(state): State<AppState>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<AnswerOutcome>, ApiError> {
    let command = commands::SubmitAnswer {
        correlation_id: Uuid::new_v4(),
        user_id: request.user_id,
        cursor: request.question_number,
        option: request.option,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_answer command");

    let outcome = state.engine.submit_answer(&command).await?;
    Ok(Json(outcome))
}

/// POST /complete
#[instrument(skip(state, request), fields(user_id = %request.user_id))]
async fn complete_quiz(
    State(state): State<AppState>,
    Json(request): Json<CompleteQuizRequest>,
) -> Result<Json<QuizResult>, ApiError> {
    let command = commands::RetryCompletion {
        correlation_id: Uuid::new_v4(),
        user_id: request.user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling retry_completion command");

    let result = state.engine.retry_completion(&command).await?;
    Ok(Json(result))
}

/// GET /sessions/{user_id}
#[instrument(skip(state))]
async fn session_progress(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state.engine.session_progress(UserId(user_id)).await?;
    Ok(Json(view))
}

/// Returns the router for quiz commands and progress queries.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_quiz))
        .route("/answer", post(submit_answer))
        .route("/complete", post(complete_quiz))
        .route("/sessions/{user_id}", get(session_progress))
}
