//! Query handlers for the quiz context.

use kitobxon_core::model::{QuizResult, UserId};
use kitobxon_core::repository::ResultRepository;

use crate::domain::error::QuizError;

/// Returns the persisted results of `user_id`, oldest first.
///
/// # Errors
///
/// Returns `QuizError::Domain` if the result store fails.
pub async fn get_results(
    user_id: UserId,
    repo: &dyn ResultRepository,
) -> Result<Vec<QuizResult>, QuizError> {
    Ok(repo.results_for_user(user_id).await?)
}
