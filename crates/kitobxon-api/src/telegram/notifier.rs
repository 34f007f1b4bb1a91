//! Quiz notifications delivered through the Bot API.

use async_trait::async_trait;
use kitobxon_core::error::DomainError;
use kitobxon_core::model::{QuestionDispatch, QuizResult, UserId};
use kitobxon_core::notifier::{AdminNotifier, UserNotifier};

use super::client::TelegramClient;
use super::messages;

/// Implements both notifier traits over a [`TelegramClient`].
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: TelegramClient,
}

impl TelegramNotifier {
    /// Creates a notifier sending through `client`.
    #[must_use]
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserNotifier for TelegramNotifier {
    async fn send_question(&self, dispatch: &QuestionDispatch) -> Result<(), DomainError> {
        let keyboard = messages::question_keyboard(dispatch);
        self.client
            .send_message(
                dispatch.user_id,
                &messages::question_text(dispatch),
                Some(&keyboard),
            )
            .await?;
        Ok(())
    }

    async fn send_time_up(&self, user_id: UserId, _number: usize) -> Result<(), DomainError> {
        self.client
            .send_message(user_id, messages::TIME_UP, None)
            .await?;
        Ok(())
    }

    async fn send_summary(&self, result: &QuizResult) -> Result<(), DomainError> {
        self.client
            .send_message(result.user_id, &messages::summary_text(result), None)
            .await?;
        Ok(())
    }

    async fn send_completion_failed(&self, user_id: UserId) -> Result<(), DomainError> {
        let keyboard = messages::retry_keyboard();
        self.client
            .send_message(user_id, messages::COMPLETION_FAILED, Some(&keyboard))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AdminNotifier for TelegramNotifier {
    async fn send_admin_summary(
        &self,
        admin_id: UserId,
        result: &QuizResult,
    ) -> Result<(), DomainError> {
        self.client
            .send_message(admin_id, &messages::admin_summary_text(result), None)
            .await?;
        Ok(())
    }
}
