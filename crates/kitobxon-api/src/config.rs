//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use kitobxon_quiz::application::QuizSettings;
use kitobxon_quiz::application::settings::DEFAULT_QUESTION_TIME_LIMIT;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Settings the server needs at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Bot token used for outbound Telegram calls.
    pub telegram_bot_token: String,
    /// Base URL of the Telegram Bot API.
    pub telegram_api_base: String,
    /// Value Telegram must echo in `X-Telegram-Bot-Api-Secret-Token`.
    pub telegram_webhook_secret: Option<String>,
    /// How long a reader has for each question.
    pub question_time_limit: Duration,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("telegram_api_base", &self.telegram_api_base)
            .field("question_time_limit", &self.question_time_limit)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = required(&lookup, "DATABASE_URL")?;
        let telegram_bot_token = required(&lookup, "TELEGRAM_BOT_TOKEN")?;
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };

        let question_time_limit = match lookup("QUIZ_QUESTION_TIME_LIMIT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|e| {
                    AppError::Config(format!(
                        "QUIZ_QUESTION_TIME_LIMIT_SECS must be a whole number: {e}"
                    ))
                })?;
                if secs == 0 {
                    return Err(AppError::Config(
                        "QUIZ_QUESTION_TIME_LIMIT_SECS must be positive".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_QUESTION_TIME_LIMIT,
        };

        Ok(Self {
            database_url,
            host,
            port,
            telegram_bot_token,
            telegram_api_base: lookup("TELEGRAM_API_BASE")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
            telegram_webhook_secret: lookup("TELEGRAM_WEBHOOK_SECRET")
                .filter(|secret| !secret.is_empty()),
            question_time_limit,
        })
    }

    /// Address the server listens on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }

    /// Engine settings derived from the configuration.
    #[must_use]
    pub fn quiz_settings(&self) -> QuizSettings {
        QuizSettings {
            question_time_limit: self.question_time_limit,
        }
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, AppError> {
    lookup(key).ok_or_else(|| AppError::Config(format!("{key} environment variable must be set")))
}
