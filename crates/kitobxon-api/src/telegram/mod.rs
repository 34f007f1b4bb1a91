//! Telegram Bot API adapter: outbound client, quiz notifications and the
//! webhook update model.

pub mod callback;
pub mod client;
pub mod messages;
pub mod notifier;
pub mod update;

pub use callback::QuizCallback;
pub use client::{InlineKeyboardButton, InlineKeyboardMarkup, TelegramClient, TelegramError};
pub use notifier::TelegramNotifier;
