//! Kitobxon API: error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kitobxon_core::error::DomainError;
use kitobxon_quiz::domain::error::QuizError;
use serde::Serialize;
use thiserror::Error;

use crate::telegram::TelegramError;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The Telegram client could not be built.
    #[error("telegram client error: {0}")]
    Telegram(#[from] TelegramError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `QuizError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub QuizError);

impl From<QuizError> for ApiError {
    fn from(err: QuizError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(QuizError::Domain(err))
    }
}

impl ApiError {
    /// Status code and machine-readable code for the wrapped error.
    #[must_use]
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            QuizError::NotRegistered(_) => (StatusCode::FORBIDDEN, "not_registered"),
            QuizError::InsufficientQuestions { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_questions")
            }
            QuizError::SessionAlreadyActive(_) => (StatusCode::CONFLICT, "session_already_active"),
            QuizError::AnswerRejected { .. } => (StatusCode::CONFLICT, "answer_rejected"),
            QuizError::NoActiveSession(_) => (StatusCode::NOT_FOUND, "no_active_session"),
            QuizError::ResultNotPersisted(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "result_not_persisted")
            }
            QuizError::Domain(DomainError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            QuizError::Domain(DomainError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            QuizError::Domain(DomainError::Infrastructure(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
