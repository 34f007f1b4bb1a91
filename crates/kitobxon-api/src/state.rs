//! Shared application state.

use std::fmt;

use kitobxon_quiz::application::QuizEngine;

use crate::telegram::TelegramClient;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The quiz engine owning every live session.
    pub engine: QuizEngine,
    /// Bot API client used to answer webhook updates.
    pub telegram: TelegramClient,
    /// Secret Telegram must present on webhook calls, if configured.
    pub webhook_secret: Option<String>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .field("telegram", &self.telegram)
            .field("webhook_secret", &self.webhook_secret.is_some())
            .finish()
    }
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        engine: QuizEngine,
        telegram: TelegramClient,
        webhook_secret: Option<String>,
    ) -> Self {
        Self {
            engine,
            telegram,
            webhook_secret,
        }
    }
}
