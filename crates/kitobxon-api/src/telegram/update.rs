//! Incoming webhook updates.
//!
//! Only the fields the quiz reacts to are modelled; Telegram sends many
//! more and serde ignores them.

use kitobxon_core::model::UserId;
use serde::Deserialize;

/// A Bot API update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonic update identifier.
    pub update_id: i64,
    /// A new message, if this update carries one.
    #[serde(default)]
    pub message: Option<Message>,
    /// A button tap, if this update carries one.
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// A chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Chat the message was sent in.
    pub chat: Chat,
    /// Sender; absent for channel posts.
    #[serde(default)]
    pub from: Option<User>,
    /// Message text.
    #[serde(default)]
    pub text: Option<String>,
}

impl Message {
    /// The user the bot should treat as the sender.
    #[must_use]
    pub fn sender(&self) -> UserId {
        self.from.as_ref().map_or(UserId(self.chat.id), |user| UserId(user.id))
    }
}

/// A chat.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Chat identifier; equals the user id in private chats.
    pub id: i64,
}

/// A Telegram user.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: i64,
}

/// A tap on an inline button.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    /// Identifier to acknowledge the tap with.
    pub id: String,
    /// Who tapped.
    pub from: User,
    /// Data attached to the button.
    #[serde(default)]
    pub data: Option<String>,
}
