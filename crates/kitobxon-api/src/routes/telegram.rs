//! Telegram webhook: turns bot updates into quiz commands.
//!
//! Telegram retries any update that does not get a 2xx, so every update the
//! bot understands is acknowledged with 200 and failures are reported to the
//! user in the chat instead.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::{Json, Router, routing::post};
use kitobxon_core::model::UserId;
use kitobxon_quiz::domain::commands;
use kitobxon_quiz::domain::error::QuizError;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::state::AppState;
use crate::telegram::QuizCallback;
use crate::telegram::messages;
use crate::telegram::update::{CallbackQuery, Message, Update};

/// Header carrying the secret configured with `setWebhook`.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Label of the main-menu button that starts a quiz.
pub const START_BUTTON: &str = "📝 Test topshirish";

const START_COMMAND: &str = "/quiz";

fn is_start_command(text: &str) -> bool {
    let text = text.trim();
    if text == START_BUTTON {
        return true;
    }
    // Group chats address commands as `/quiz@botname`.
    text.split_whitespace()
        .next()
        .and_then(|word| word.split('@').next())
        .is_some_and(|command| command == START_COMMAND)
}

fn secret_matches(state: &AppState, headers: &HeaderMap) -> bool {
    match &state.webhook_secret {
        None => true,
        Some(expected) => headers
            .get(SECRET_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|presented| presented == expected.as_str()),
    }
}

/// POST /webhook
#[instrument(skip(state, headers, update), fields(update_id = update.update_id))]
async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> StatusCode {
    if !secret_matches(&state, &headers) {
        warn!("rejecting webhook call with wrong secret");
        return StatusCode::UNAUTHORIZED;
    }

    if let Some(callback) = update.callback_query {
        handle_callback(&state, callback).await;
    } else if let Some(message) = update.message {
        handle_message(&state, message).await;
    }
    StatusCode::OK
}

async fn handle_message(state: &AppState, message: Message) {
    let Some(text) = message.text.as_deref() else {
        return;
    };
    if !is_start_command(text) {
        debug!("ignoring message");
        return;
    }

    let command = commands::StartQuiz {
        correlation_id: Uuid::new_v4(),
        user_id: message.sender(),
    };
    info!(
        correlation_id = %command.correlation_id,
        user_id = %command.user_id,
        "handling start_quiz command"
    );

    // On success the session itself sends the first question.
    if let Err(err) = state.engine.start_quiz(&command).await {
        info!(user_id = %command.user_id, error = %err, "quiz not started");
        if let Err(send_err) = state
            .telegram
            .send_message(command.user_id, messages::error_text(&err), None)
            .await
        {
            warn!(user_id = %command.user_id, error = %send_err, "failed to send refusal");
        }
    }
}

async fn handle_callback(state: &AppState, callback: CallbackQuery) {
    let user_id = UserId(callback.from.id);
    let parsed = callback.data.as_deref().map(str::parse::<QuizCallback>);

    // An accepted tap holds the session's next question until its feedback
    // toast is out.
    let mut held = None;
    let toast = match parsed {
        Some(Ok(QuizCallback::Answer { cursor, option })) => {
            let command = commands::SubmitAnswer {
                correlation_id: Uuid::new_v4(),
                user_id,
                cursor,
                option,
            };
            info!(
                correlation_id = %command.correlation_id,
                %user_id,
                cursor,
                "handling submit_answer command"
            );
            match state.engine.submit_answer_holding_next(&command).await {
                Ok(accepted) => {
                    let toast = messages::feedback_text(accepted.outcome());
                    held = Some(accepted);
                    Some(toast)
                }
                Err(QuizError::AnswerRejected { question_number }) => {
                    debug!(%user_id, question_number, "late tap discarded");
                    None
                }
                Err(err) => Some(messages::error_text(&err).to_string()),
            }
        }
        Some(Ok(QuizCallback::Retry)) => {
            let command = commands::RetryCompletion {
                correlation_id: Uuid::new_v4(),
                user_id,
            };
            info!(
                correlation_id = %command.correlation_id,
                %user_id,
                "handling retry_completion command"
            );
            match state.engine.retry_completion(&command).await {
                Ok(_) => Some(messages::RETRY_SUCCEEDED.to_string()),
                Err(err) => Some(messages::error_text(&err).to_string()),
            }
        }
        Some(Err(err)) => {
            debug!(error = %err, "ignoring foreign callback");
            None
        }
        None => None,
    };

    if let Err(err) = state
        .telegram
        .answer_callback_query(&callback.id, toast.as_deref())
        .await
    {
        warn!(%user_id, error = %err, "failed to answer callback query");
    }
    drop(held);
}

/// Returns the router for the Telegram webhook.
pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(webhook))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use kitobxon_core::model::{OptionTag, QUESTIONS_PER_QUIZ};
    use kitobxon_core::repository::ResultRepository;
    use kitobxon_test_support::{FailingResultRepository, RecordingResultRepository};
    use serde_json::Value;
    use tower::ServiceExt;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::telegram::{TelegramClient, TelegramNotifier};
    use crate::testing::{READER, STRANGER, app_state_with, engine_over, engine_with};

    fn state_for(server: &MockServer) -> AppState {
        app_state_with(Arc::new(RecordingResultRepository::new()), &server.uri())
    }

    async fn mount_ok(server: &MockServer, api_method: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/botTOKEN/{api_method}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": true
            })))
            .mount(server)
            .await;
    }

    fn webhook_request(update: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(update).unwrap()))
            .unwrap()
    }

    fn text_update(user_id: UserId, text: &str) -> Value {
        serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 1,
                "chat": { "id": user_id.0, "type": "private" },
                "from": { "id": user_id.0, "is_bot": false, "first_name": "Reader" },
                "text": text
            }
        })
    }

    fn callback_update(user_id: UserId, data: &str) -> Value {
        serde_json::json!({
            "update_id": 2,
            "callback_query": {
                "id": "cb-1",
                "from": { "id": user_id.0, "is_bot": false, "first_name": "Reader" },
                "chat_instance": "x",
                "data": data
            }
        })
    }

    /// State whose engine also talks to the reader through `server`.
    fn telegram_state_for(server: &MockServer, results: Arc<dyn ResultRepository>) -> AppState {
        let client = TelegramClient::new(&server.uri(), "TOKEN").unwrap();
        let notifier = Arc::new(TelegramNotifier::new(client.clone()));
        AppState::new(
            engine_over(results, notifier.clone(), notifier),
            client,
            None,
        )
    }

    /// Bot API methods called so far, in arrival order.
    async fn called_methods(server: &MockServer) -> Vec<String> {
        server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter_map(|request| request.url.path().rsplit('/').next().map(str::to_string))
            .collect()
    }

    async fn wait_for_calls(server: &MockServer, count: usize) -> Vec<String> {
        for _ in 0..200 {
            let methods = called_methods(server).await;
            if methods.len() >= count {
                return methods;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        called_methods(server).await
    }

    async fn start(state: &AppState) {
        state
            .engine
            .start_quiz(&commands::StartQuiz {
                correlation_id: Uuid::new_v4(),
                user_id: READER,
            })
            .await
            .unwrap();
    }

    async fn sent_bodies(server: &MockServer, api_method: &str) -> Vec<Value> {
        server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|request| request.url.path().ends_with(api_method))
            .map(|request| serde_json::from_slice(&request.body).unwrap())
            .collect()
    }

    #[test]
    fn test_start_command_variants() {
        assert!(is_start_command("/quiz"));
        assert!(is_start_command(" /quiz@KitobxonBot "));
        assert!(is_start_command(START_BUTTON));
        assert!(!is_start_command("/start"));
        assert!(!is_start_command("/quizzes"));
        assert!(!is_start_command("quiz"));
    }

    #[tokio::test]
    async fn test_quiz_command_starts_session() {
        // Arrange
        let server = MockServer::start().await;
        let state = state_for(&server);
        let app = router().with_state(state.clone());

        // Act
        let response = app
            .oneshot(webhook_request(&text_update(READER, "/quiz")))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.engine.has_active_session(READER));
        assert!(sent_bodies(&server, "sendMessage").await.is_empty());
    }

    #[tokio::test]
    async fn test_unregistered_user_is_told_to_register() {
        // Arrange
        let server = MockServer::start().await;
        mount_ok(&server, "sendMessage").await;
        let app = router().with_state(state_for(&server));

        // Act
        let response = app
            .oneshot(webhook_request(&text_update(STRANGER, "/quiz")))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let sent = sent_bodies(&server, "sendMessage").await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["chat_id"], STRANGER.0);
        assert_eq!(
            sent[0]["text"],
            "❌ Test topshirishdan oldin ro'yxatdan o'ting!"
        );
    }

    #[tokio::test]
    async fn test_answer_tap_is_acknowledged_with_feedback() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/answerCallbackQuery"))
            .and(body_partial_json(serde_json::json!({
                "callback_query_id": "cb-1",
                "text": "✅ To'g'ri javob!"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": true
            })))
            .expect(1)
            .mount(&server)
            .await;
        let state = state_for(&server);
        start(&state).await;

        // Act
        let response = router()
            .with_state(state)
            .oneshot(webhook_request(&callback_update(READER, "quiz:0:a")))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_feedback_is_acknowledged_before_next_question() {
        // Arrange
        let server = MockServer::start().await;
        mount_ok(&server, "sendMessage").await;
        mount_ok(&server, "answerCallbackQuery").await;
        let state = telegram_state_for(&server, Arc::new(RecordingResultRepository::new()));
        start(&state).await;
        wait_for_calls(&server, 1).await;

        // Act
        let response = router()
            .with_state(state)
            .oneshot(webhook_request(&callback_update(READER, "quiz:0:a")))
            .await
            .unwrap();
        let methods = wait_for_calls(&server, 3).await;

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            methods,
            vec!["sendMessage", "answerCallbackQuery", "sendMessage"]
        );
        let questions = sent_bodies(&server, "sendMessage").await;
        assert!(questions[1]["text"].as_str().unwrap().starts_with("📝 Savol 2/25"));
    }

    #[tokio::test]
    async fn test_failed_retry_reports_only_through_the_toast() {
        // Arrange
        let server = MockServer::start().await;
        mount_ok(&server, "sendMessage").await;
        mount_ok(&server, "answerCallbackQuery").await;
        let state = telegram_state_for(&server, Arc::new(FailingResultRepository));
        start(&state).await;
        for cursor in 0..QUESTIONS_PER_QUIZ {
            state
                .engine
                .submit_answer(&commands::SubmitAnswer {
                    correlation_id: Uuid::new_v4(),
                    user_id: READER,
                    cursor,
                    option: OptionTag::A,
                })
                .await
                .unwrap();
        }

        // Act
        let response = router()
            .with_state(state.clone())
            .oneshot(webhook_request(&callback_update(READER, "quiz:retry")))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.engine.has_active_session(READER));
        let failure_notices = sent_bodies(&server, "sendMessage")
            .await
            .into_iter()
            .filter(|body| body["text"] == messages::COMPLETION_FAILED)
            .count();
        assert_eq!(failure_notices, 1);
        let answers = sent_bodies(&server, "answerCallbackQuery").await;
        assert_eq!(answers.len(), 1);
        assert!(answers[0]["text"].is_string());
    }

    #[tokio::test]
    async fn test_repeated_tap_is_acknowledged_silently() {
        // Arrange
        let server = MockServer::start().await;
        mount_ok(&server, "answerCallbackQuery").await;
        let state = state_for(&server);
        start(&state).await;
        let update = callback_update(READER, "quiz:0:b");

        // Act
        for _ in 0..2 {
            let response = router()
                .with_state(state.clone())
                .oneshot(webhook_request(&update))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        // Assert
        let answers = sent_bodies(&server, "answerCallbackQuery").await;
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0]["text"], "❌ Noto'g'ri. To'g'ri javob: A");
        assert!(answers[1].get("text").is_none());
    }

    #[tokio::test]
    async fn test_retry_without_session_reports_missing_session() {
        // Arrange
        let server = MockServer::start().await;
        mount_ok(&server, "answerCallbackQuery").await;
        let app = router().with_state(state_for(&server));

        // Act
        app.oneshot(webhook_request(&callback_update(READER, "quiz:retry")))
            .await
            .unwrap();

        // Assert
        let answers = sent_bodies(&server, "answerCallbackQuery").await;
        assert_eq!(answers[0]["text"], "❌ Test sessiyasi topilmadi!");
    }

    #[tokio::test]
    async fn test_foreign_callback_is_acknowledged_without_text() {
        // Arrange
        let server = MockServer::start().await;
        mount_ok(&server, "answerCallbackQuery").await;
        let app = router().with_state(state_for(&server));

        // Act
        let response = app
            .oneshot(webhook_request(&callback_update(READER, "menu:about")))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let answers = sent_bodies(&server, "answerCallbackQuery").await;
        assert_eq!(answers.len(), 1);
        assert!(answers[0].get("text").is_none());
    }

    #[tokio::test]
    async fn test_wrong_secret_returns_401_and_starts_nothing() {
        // Arrange
        let server = MockServer::start().await;
        let state = AppState::new(
            engine_with(Arc::new(RecordingResultRepository::new())),
            TelegramClient::new(&server.uri(), "TOKEN").unwrap(),
            Some("s3cret".to_string()),
        );
        let mut request = webhook_request(&text_update(READER, "/quiz"));
        request
            .headers_mut()
            .insert(SECRET_HEADER, "guess".parse().unwrap());

        // Act
        let response = router()
            .with_state(state.clone())
            .oneshot(request)
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(!state.engine.has_active_session(READER));
    }

    #[tokio::test]
    async fn test_matching_secret_is_accepted() {
        // Arrange
        let server = MockServer::start().await;
        let state = AppState::new(
            engine_with(Arc::new(RecordingResultRepository::new())),
            TelegramClient::new(&server.uri(), "TOKEN").unwrap(),
            Some("s3cret".to_string()),
        );
        let mut request = webhook_request(&text_update(READER, "/quiz"));
        request
            .headers_mut()
            .insert(SECRET_HEADER, "s3cret".parse().unwrap());

        // Act
        let response = router()
            .with_state(state.clone())
            .oneshot(request)
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.engine.has_active_session(READER));
    }
}
