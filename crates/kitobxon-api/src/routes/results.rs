//! Routes for persisted quiz results.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use kitobxon_core::model::{QuizResult, UserId};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /{user_id}
#[instrument(skip(state))]
async fn results_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<QuizResult>>, ApiError> {
    let results = state.engine.results_for_user(UserId(user_id)).await?;
    Ok(Json(results))
}

/// Returns the router for result queries.
pub fn router() -> Router<AppState> {
    Router::new().route("/{user_id}", get(results_for_user))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use kitobxon_test_support::FailingResultRepository;
    use tower::ServiceExt;

    use crate::testing::{READER, app_state_with, test_app_state};

    fn get_request(user_id: UserId) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(format!("/{}", user_id.0))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_results_returns_empty_list_for_new_reader() {
        // Arrange
        let app = router().with_state(test_app_state());

        // Act
        let response = app.oneshot(get_request(READER)).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_results_returns_500_when_store_fails() {
        // Arrange
        let state = app_state_with(Arc::new(FailingResultRepository), "http://127.0.0.1:9");
        let app = router().with_state(state);

        // Act
        let response = app.oneshot(get_request(READER)).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_results_returns_400_for_non_numeric_id() {
        // Arrange
        let app = router().with_state(test_app_state());
        let request = Request::builder()
            .method("GET")
            .uri("/reader")
            .body(Body::empty())
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
