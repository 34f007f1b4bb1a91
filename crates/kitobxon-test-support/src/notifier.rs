//! Test notifier: records every outbound message instead of sending it.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use kitobxon_core::error::DomainError;
use kitobxon_core::model::{QuestionDispatch, QuizResult, UserId};
use kitobxon_core::notifier::{AdminNotifier, UserNotifier};

/// One delivered message.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A question was sent.
    Question {
        /// Recipient.
        user_id: UserId,
        /// 0-based question number.
        number: usize,
    },
    /// A time-up notice was sent.
    TimeUp {
        /// Recipient.
        user_id: UserId,
        /// 0-based question number.
        number: usize,
    },
    /// The reader's summary was sent.
    Summary {
        /// Recipient.
        user_id: UserId,
        /// Reported score.
        score: u32,
    },
    /// The reader was told the result could not be saved.
    CompletionFailed {
        /// Recipient.
        user_id: UserId,
    },
    /// An admin summary was sent.
    AdminSummary {
        /// Recipient.
        admin_id: UserId,
        /// Reader the result belongs to.
        user_id: UserId,
        /// Reported score.
        score: u32,
    },
}

/// A notifier implementing both [`UserNotifier`] and [`AdminNotifier`] that
/// records deliveries. Deliveries to recipients marked as failing return an
/// infrastructure error and are not recorded.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    failing: HashSet<UserId>,
    question_delay: Duration,
}

impl RecordingNotifier {
    /// Creates a notifier that delivers to everyone.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notifier whose deliveries to `recipients` fail.
    #[must_use]
    pub fn failing_for(recipients: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            failing: recipients.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Makes every question send take `delay`, like a slow Bot API call.
    #[must_use]
    pub fn with_question_delay(mut self, delay: Duration) -> Self {
        self.question_delay = delay;
        self
    }

    /// Returns a snapshot of all delivered messages, in delivery order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    /// Question numbers delivered to `user_id`, in delivery order.
    pub fn questions_sent_to(&self, user_id: UserId) -> Vec<usize> {
        self.sent()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Question { user_id: to, number } if to == user_id => Some(number),
                _ => None,
            })
            .collect()
    }

    fn deliver(&self, recipient: UserId, notification: Notification) -> Result<(), DomainError> {
        if self.failing.contains(&recipient) {
            return Err(DomainError::Infrastructure(format!(
                "recipient {recipient} is unreachable"
            )));
        }
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

#[async_trait]
impl UserNotifier for RecordingNotifier {
    async fn send_question(&self, dispatch: &QuestionDispatch) -> Result<(), DomainError> {
        if !self.question_delay.is_zero() {
            tokio::time::sleep(self.question_delay).await;
        }
        self.deliver(
            dispatch.user_id,
            Notification::Question {
                user_id: dispatch.user_id,
                number: dispatch.number,
            },
        )
    }

    async fn send_time_up(&self, user_id: UserId, number: usize) -> Result<(), DomainError> {
        self.deliver(user_id, Notification::TimeUp { user_id, number })
    }

    async fn send_summary(&self, result: &QuizResult) -> Result<(), DomainError> {
        self.deliver(
            result.user_id,
            Notification::Summary {
                user_id: result.user_id,
                score: result.score,
            },
        )
    }

    async fn send_completion_failed(&self, user_id: UserId) -> Result<(), DomainError> {
        self.deliver(user_id, Notification::CompletionFailed { user_id })
    }
}

#[async_trait]
impl AdminNotifier for RecordingNotifier {
    async fn send_admin_summary(
        &self,
        admin_id: UserId,
        result: &QuizResult,
    ) -> Result<(), DomainError> {
        self.deliver(
            admin_id,
            Notification::AdminSummary {
                admin_id,
                user_id: result.user_id,
                score: result.score,
            },
        )
    }
}
