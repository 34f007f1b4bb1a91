//! State builders shared by the route unit tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use kitobxon_core::model::{Bracket, QUESTIONS_PER_QUIZ, UserId};
use kitobxon_core::notifier::{AdminNotifier, UserNotifier};
use kitobxon_core::repository::ResultRepository;
use kitobxon_core::rng::DeterministicRng;
use kitobxon_quiz::application::{Collaborators, QuizEngine, QuizSettings};
use kitobxon_test_support::{
    FixedClock, InMemoryQuestionImport, InMemoryUserDirectory, MockRng, RecordingNotifier,
    RecordingResultRepository, profile, questions,
};

use crate::state::AppState;
use crate::telegram::TelegramClient;

/// A registered 9-year-old reader.
pub const READER: UserId = UserId(7);

/// A user that never registered.
pub const STRANGER: UserId = UserId(99);

/// Engine over in-memory doubles holding exactly one quiz worth of
/// questions per bracket.
pub fn engine_with(results: Arc<dyn ResultRepository>) -> QuizEngine {
    let notifier = Arc::new(RecordingNotifier::new());
    engine_over(results, notifier.clone(), notifier)
}

/// Like [`engine_with`], with the given notifiers.
pub fn engine_over(
    results: Arc<dyn ResultRepository>,
    user_notifier: Arc<dyn UserNotifier>,
    admin_notifier: Arc<dyn AdminNotifier>,
) -> QuizEngine {
    let directory = InMemoryUserDirectory::new(vec![profile(READER.0, 9)], vec![UserId(900)]);
    let import = InMemoryQuestionImport::new()
        .with(
            Bracket::Ages7To10,
            questions(Bracket::Ages7To10, QUESTIONS_PER_QUIZ),
        )
        .with(
            Bracket::Ages11To14,
            questions(Bracket::Ages11To14, QUESTIONS_PER_QUIZ),
        );
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));

    QuizEngine::new(
        Collaborators {
            directory: Arc::new(directory),
            questions: Arc::new(import),
            results,
            user_notifier,
            admin_notifier,
            clock: Arc::new(FixedClock(Utc::now())),
            rng,
        },
        QuizSettings {
            question_time_limit: Duration::from_secs(60),
        },
    )
}

/// State whose Telegram client points at `telegram_base`.
pub fn app_state_with(results: Arc<dyn ResultRepository>, telegram_base: &str) -> AppState {
    AppState::new(
        engine_with(results),
        TelegramClient::new(telegram_base, "TOKEN").unwrap(),
        None,
    )
}

/// State for routes that never reach Telegram.
pub fn test_app_state() -> AppState {
    app_state_with(
        Arc::new(RecordingResultRepository::new()),
        "http://127.0.0.1:9",
    )
}
