//! Texts and keyboards the bot sends during a quiz.

use kitobxon_core::model::{AnswerOutcome, OptionTag, QuestionDispatch, QuizResult};
use kitobxon_quiz::domain::error::QuizError;

use super::callback::QuizCallback;
use super::client::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Sent when a question's deadline expires before a tap.
pub const TIME_UP: &str = "⏰ Vaqt tugadi! Keyingi savolga o'tish...";

/// Sent when a finished quiz could not be saved.
pub const COMPLETION_FAILED: &str =
    "⚠️ Natijani saqlab bo'lmadi. Qayta urinish uchun tugmani bosing.";

/// Toast shown after a successful retry; the summary follows as a message.
pub const RETRY_SUCCEEDED: &str = "✅ Natija saqlandi!";

/// Question text with its 1-based position.
#[must_use]
pub fn question_text(dispatch: &QuestionDispatch) -> String {
    format!(
        "📝 Savol {}/{}\n\n{}",
        dispatch.display_number(),
        dispatch.total,
        dispatch.prompt
    )
}

/// One button per option, one option per row.
#[must_use]
pub fn question_keyboard(dispatch: &QuestionDispatch) -> InlineKeyboardMarkup {
    let inline_keyboard = OptionTag::ALL
        .iter()
        .map(|&option| {
            vec![InlineKeyboardButton {
                text: format!("{option}) {}", dispatch.options[option.index()]),
                callback_data: QuizCallback::Answer {
                    cursor: dispatch.number,
                    option,
                }
                .to_string(),
            }]
        })
        .collect();
    InlineKeyboardMarkup { inline_keyboard }
}

/// Keyboard with the single retry button.
#[must_use]
pub fn retry_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![vec![InlineKeyboardButton {
            text: "🔄 Qayta urinish".to_string(),
            callback_data: QuizCallback::Retry.to_string(),
        }]],
    }
}

fn result_lines(result: &QuizResult) -> String {
    format!(
        "✅ To'g'ri javoblar: {}/{}\n⭐ Ball: {}/100\n📈 Foiz: {:.1}%\n⏱ Vaqt: {}",
        result.correct_count,
        result.total_questions,
        result.score,
        result.percentage,
        result.elapsed_display()
    )
}

/// Summary sent to the reader.
#[must_use]
pub fn summary_text(result: &QuizResult) -> String {
    format!("✅ Test yakunlandi!\n\n📊 Natijalar:\n{}", result_lines(result))
}

/// Summary sent to each administrator.
#[must_use]
pub fn admin_summary_text(result: &QuizResult) -> String {
    format!(
        "📊 Yangi test natijasi:\n\n👤 Foydalanuvchi: {}\n🆔 Telegram ID: {}\n👤 Username: @{}\n📅 Yosh guruhi: {}\n{}",
        result.display_name,
        result.user_id,
        result.username.as_deref().unwrap_or("N/A"),
        result.bracket,
        result_lines(result)
    )
}

/// Toast shown after an accepted tap.
#[must_use]
pub fn feedback_text(outcome: AnswerOutcome) -> String {
    match outcome {
        AnswerOutcome::Correct => "✅ To'g'ri javob!".to_string(),
        AnswerOutcome::Incorrect { correct_option } => {
            format!("❌ Noto'g'ri. To'g'ri javob: {correct_option}")
        }
    }
}

/// Text telling the reader why an operation was refused.
#[must_use]
pub fn error_text(err: &QuizError) -> &'static str {
    match err {
        QuizError::NotRegistered(_) => "❌ Test topshirishdan oldin ro'yxatdan o'ting!",
        QuizError::InsufficientQuestions { .. } => {
            "❌ Yetarli miqdorda test savollari mavjud emas!"
        }
        QuizError::SessionAlreadyActive(_) => "⏳ Sizda tugallanmagan test bor!",
        QuizError::AnswerRejected { .. } => "⌛ Bu savolga javob qabul qilinmaydi.",
        QuizError::NoActiveSession(_) => "❌ Test sessiyasi topilmadi!",
        QuizError::ResultNotPersisted(_) => COMPLETION_FAILED,
        QuizError::Domain(_) => "⚠️ Xatolik yuz berdi. Keyinroq urinib ko'ring.",
    }
}
