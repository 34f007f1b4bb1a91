//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use kitobxon_core::model::{Bracket, QUESTIONS_PER_QUIZ, UserId};
use kitobxon_core::repository::ResultRepository;
use kitobxon_core::rng::DeterministicRng;
use kitobxon_quiz::application::{Collaborators, QuizEngine, QuizSettings};
use kitobxon_test_support::{
    FixedClock, InMemoryQuestionImport, InMemoryUserDirectory, MockRng, RecordingNotifier,
    profile, questions,
};
use tower::ServiceExt;

use kitobxon_api::routes;
use kitobxon_api::state::AppState;
use kitobxon_api::telegram::TelegramClient;

/// A registered 9-year-old reader.
pub const READER: UserId = UserId(7);

/// A registered 12-year-old reader.
pub const OLDER_READER: UserId = UserId(8);

/// Administrator receiving result broadcasts.
pub const ADMIN: UserId = UserId(900);

/// Build the full app router over in-memory collaborators. Uses the same
/// route structure as `main.rs`. With `MockRng` the draw keeps fixture
/// order, so question `n` has option `ALL[n % 4]` correct.
pub fn build_test_app(
    results: Arc<dyn ResultRepository>,
    notifier: Arc<RecordingNotifier>,
) -> Router {
    let directory = InMemoryUserDirectory::new(
        vec![profile(READER.0, 9), profile(OLDER_READER.0, 12)],
        vec![ADMIN],
    );
    let import = InMemoryQuestionImport::new()
        .with(
            Bracket::Ages7To10,
            questions(Bracket::Ages7To10, QUESTIONS_PER_QUIZ),
        )
        .with(
            Bracket::Ages11To14,
            questions(Bracket::Ages11To14, QUESTIONS_PER_QUIZ + 5),
        );
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
    let clock = FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 3, 2, 9, 0, 0).unwrap(),
    );

    let engine = QuizEngine::new(
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
            question_time_limit: Duration::from_secs(60),
        },
    );
    let telegram = TelegramClient::new("http://127.0.0.1:9", "TOKEN").unwrap();

    routes::app_router().with_state(AppState::new(engine, telegram, None))
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Polls `GET /api/v1/results/{user}` until it lists `count` results.
/// Completion runs on the session task after the last answer is accepted.
pub async fn wait_for_results(app: &Router, user: UserId, count: usize) -> serde_json::Value {
    for _ in 0..200 {
        let (status, json) = get_json(app.clone(), &format!("/api/v1/results/{}", user.0)).await;
        assert_eq!(status, StatusCode::OK);
        if json.as_array().is_some_and(|results| results.len() >= count) {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("results for {user} never reached {count}");
}
