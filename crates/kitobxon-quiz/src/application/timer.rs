//! Per-question deadlines.
//!
//! A deadline is a detached task that sleeps and then posts
//! `DeadlineElapsed { cursor }` into the session mailbox. It never touches
//! session state and is never cancelled: a deadline for a question that was
//! already answered is discarded by the session's cursor guard.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use super::arbiter::SessionMessage;

#[derive(Debug, Clone, Copy)]
pub(crate) struct DeadlineTimer {
    limit: Duration,
}

impl DeadlineTimer {
    pub(crate) fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub(crate) fn limit(self) -> Duration {
        self.limit
    }

    /// Arms the deadline of question `cursor`. The deadline is fixed now,
    /// not when the spawned task first runs.
    pub(crate) fn arm(
        self,
        mailbox: UnboundedSender<SessionMessage>,
        session_id: Uuid,
        cursor: usize,
    ) {
        let deadline = Instant::now() + self.limit;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if mailbox
                .send(SessionMessage::DeadlineElapsed { cursor })
                .is_err()
            {
                debug!(%session_id, cursor, "deadline elapsed after session ended");
            }
        });
    }
}
