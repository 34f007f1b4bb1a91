//! Callback data carried by the quiz's inline buttons.
//!
//! Answer buttons encode the question they were sent with, so a tap on a
//! stale keyboard names the question it was meant for: `quiz:<n>:<a-d>`.
//! The retry button after a failed save is `quiz:retry`.

use std::fmt;
use std::str::FromStr;

use kitobxon_core::error::DomainError;
use kitobxon_core::model::OptionTag;

const PREFIX: &str = "quiz";
const RETRY: &str = "retry";

/// Decoded quiz callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCallback {
    /// Tap on one of the four options of question `cursor` (0-based).
    Answer {
        /// Question the keyboard was sent with.
        cursor: usize,
        /// The tapped option.
        option: OptionTag,
    },
    /// Tap on the retry button after a failed save.
    Retry,
}

impl fmt::Display for QuizCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Answer { cursor, option } => write!(
                f,
                "{PREFIX}:{cursor}:{}",
                option.as_char().to_ascii_lowercase()
            ),
            Self::Retry => write!(f, "{PREFIX}:{RETRY}"),
        }
    }
}

impl FromStr for QuizCallback {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::Validation(format!("not a quiz callback: {s}"));

        let mut parts = s.split(':');
        if parts.next() != Some(PREFIX) {
            return Err(invalid());
        }

        match (parts.next(), parts.next(), parts.next()) {
            (Some(RETRY), None, None) => Ok(Self::Retry),
            (Some(cursor), Some(option), None) => Ok(Self::Answer {
                cursor: cursor.parse().map_err(|_| invalid())?,
                option: option.parse()?,
            }),
            _ => Err(invalid()),
        }
    }
}
