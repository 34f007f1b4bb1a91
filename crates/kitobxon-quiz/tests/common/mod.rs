//! Shared helpers for quiz engine integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::TimeZone;
use kitobxon_core::model::{Bracket, OptionTag, QUESTIONS_PER_QUIZ, UserId};
use kitobxon_core::repository::ResultRepository;
use kitobxon_core::rng::DeterministicRng;
use kitobxon_quiz::application::{Collaborators, QuizEngine, QuizSettings};
use kitobxon_quiz::domain::commands::{RetryCompletion, StartQuiz, SubmitAnswer};
use kitobxon_test_support::{
    FixedClock, InMemoryQuestionImport, InMemoryUserDirectory, MockRng, RecordingNotifier,
    RecordingResultRepository, profile, questions,
};
use uuid::Uuid;

/// A registered 9-year-old reader.
pub const READER: UserId = UserId(7);

/// A registered 13-year-old reader.
pub const OLDER_READER: UserId = UserId(8);

/// A user that never registered.
pub const STRANGER: UserId = UserId(99);

/// Administrators receiving result broadcasts.
pub const ADMINS: [UserId; 2] = [UserId(900), UserId(901)];

/// Question time limit used by the engine under test.
pub const LIMIT: Duration = Duration::from_secs(60);

/// Engine under test plus the doubles it talks to.
pub struct Harness {
    pub engine: QuizEngine,
    pub notifier: Arc<RecordingNotifier>,
    pub results: Arc<RecordingResultRepository>,
}

/// Builds an engine whose brackets hold exactly 25 questions. With `MockRng`
/// the draw keeps source order, so question `n` has correct option
/// [`correct_option`]`(n)`.
pub fn harness() -> Harness {
    let notifier = Arc::new(RecordingNotifier::new());
    let results = Arc::new(RecordingResultRepository::new());
    let engine = engine_with(
        Arc::clone(&results) as Arc<dyn ResultRepository>,
        Arc::clone(&notifier),
        QUESTIONS_PER_QUIZ,
        LIMIT,
    );
    Harness {
        engine,
        notifier,
        results,
    }
}

/// Builds an engine with custom collaborators.
pub fn engine_with(
    results: Arc<dyn ResultRepository>,
    notifier: Arc<RecordingNotifier>,
    questions_per_bracket: usize,
    limit: Duration,
) -> QuizEngine {
    let directory = InMemoryUserDirectory::new(
        vec![profile(READER.0, 9), profile(OLDER_READER.0, 13)],
        ADMINS.to_vec(),
    );
    let import = InMemoryQuestionImport::new()
        .with(
            Bracket::Ages7To10,
            questions(Bracket::Ages7To10, questions_per_bracket),
        )
        .with(
            Bracket::Ages11To14,
            questions(Bracket::Ages11To14, questions_per_bracket),
        );
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
    let clock = FixedClock(chrono::Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());

    QuizEngine::new(
        Collaborators {
            directory: Arc::new(directory),
            questions: Arc::new(import),
            results,
            user_notifier: notifier.clone(),
            admin_notifier: notifier,
            clock: Arc::new(clock),
            rng,
        },
        QuizSettings {
            question_time_limit: limit,
        },
    )
}

/// Correct option of question `cursor` in an engine built by [`harness`].
pub fn correct_option(cursor: usize) -> OptionTag {
    OptionTag::ALL[cursor % 4]
}

/// Some option other than the correct one.
pub fn wrong_option(cursor: usize) -> OptionTag {
    OptionTag::ALL[(cursor + 1) % 4]
}

pub fn start(user_id: UserId) -> StartQuiz {
    StartQuiz {
        correlation_id: Uuid::new_v4(),
        user_id,
    }
}

pub fn answer(user_id: UserId, cursor: usize, option: OptionTag) -> SubmitAnswer {
    SubmitAnswer {
        correlation_id: Uuid::new_v4(),
        user_id,
        cursor,
        option,
    }
}

pub fn retry(user_id: UserId) -> RetryCompletion {
    RetryCompletion {
        correlation_id: Uuid::new_v4(),
        user_id,
    }
}

/// Lets every runnable task finish its work. On a paused clock this moves
/// time forward by one millisecond once everything is idle.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Answers every question of `user_id`'s quiz correctly.
pub async fn answer_all_correctly(engine: &QuizEngine, user_id: UserId) {
    for cursor in 0..QUESTIONS_PER_QUIZ {
        engine
            .submit_answer(&answer(user_id, cursor, correct_option(cursor)))
            .await
            .unwrap();
    }
    settle().await;
}
