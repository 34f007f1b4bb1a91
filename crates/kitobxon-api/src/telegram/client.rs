//! Minimal Telegram Bot API client.

use std::fmt;
use std::time::Duration;

use kitobxon_core::error::DomainError;
use kitobxon_core::model::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors raised by Bot API calls.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// The request never got an HTTP response.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Telegram answered with an error status or `"ok": false`.
    #[error("telegram api error (status {status}): {description}")]
    Api {
        /// HTTP status of the reply.
        status: u16,
        /// Telegram's `description`, or the raw body when it is not JSON.
        description: String,
    },
}

impl From<TelegramError> for DomainError {
    fn from(err: TelegramError) -> Self {
        DomainError::Infrastructure(err.to_string())
    }
}

/// One button of an inline keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    /// Label shown to the user.
    pub text: String,
    /// Data echoed back in the callback query.
    pub callback_data: String,
}

/// Keyboard attached below a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    /// Rows of buttons.
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Serialize)]
struct AnswerCallbackQueryRequest<'a> {
    callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends Bot API requests for one bot.
#[derive(Clone)]
pub struct TelegramClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Creates a client for the bot identified by `token`.
    ///
    /// # Errors
    ///
    /// Returns `TelegramError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: &str, token: &str) -> Result<Self, TelegramError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.base_url, self.token)
    }

    async fn call<B: Serialize + Sync>(&self, method: &str, body: &B) -> Result<(), TelegramError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<ApiReply>(&text) {
            Ok(reply) if status.is_success() && reply.ok => {
                debug!(method, "telegram call succeeded");
                Ok(())
            }
            Ok(reply) => Err(TelegramError::Api {
                status: status.as_u16(),
                description: reply.description.unwrap_or_default(),
            }),
            Err(_) => Err(TelegramError::Api {
                status: status.as_u16(),
                description: text,
            }),
        }
    }

    /// Sends a text message, optionally with an inline keyboard.
    ///
    /// # Errors
    ///
    /// Returns `TelegramError` if the request fails or Telegram rejects it.
    #[instrument(skip(self, text, reply_markup))]
    pub async fn send_message(
        &self,
        chat_id: UserId,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError> {
        let body = SendMessageRequest {
            chat_id: chat_id.0,
            text,
            reply_markup,
        };
        self.call("sendMessage", &body).await
    }

    /// Acknowledges a callback query, optionally showing `text` as a toast.
    ///
    /// # Errors
    ///
    /// Returns `TelegramError` if the request fails or Telegram rejects it.
    #[instrument(skip(self, text))]
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), TelegramError> {
        let body = AnswerCallbackQueryRequest {
            callback_query_id,
            text,
        };
        self.call("answerCallbackQuery", &body).await
    }
}
