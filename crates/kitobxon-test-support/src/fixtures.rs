//! Builders for questions and reader profiles.

use kitobxon_core::model::{Bracket, OptionTag, Question, UserId, UserProfile};
use uuid::Uuid;

/// A question whose correct option is `correct`. The prompt embeds `label`
/// so samples can be told apart in assertions.
#[must_use]
pub fn question(label: &str, correct: OptionTag) -> Question {
    Question {
        id: Uuid::new_v4(),
        prompt: format!("{label}?"),
        options: [
            format!("{label} a"),
            format!("{label} b"),
            format!("{label} c"),
            format!("{label} d"),
        ],
        correct,
    }
}

/// `count` distinct questions for `bracket`, with correct options cycling
/// through A, B, C, D.
#[must_use]
pub fn questions(bracket: Bracket, count: usize) -> Vec<Question> {
    (0..count)
        .map(|i| question(&format!("{bracket} #{i}"), OptionTag::ALL[i % 4]))
        .collect()
}

/// A registered reader of the given age.
#[must_use]
pub fn profile(user_id: i64, age: u8) -> UserProfile {
    UserProfile {
        user_id: UserId(user_id),
        display_name: format!("Reader {user_id}"),
        username: Some(format!("reader{user_id}")),
        age,
    }
}
