//! Kitobxon quiz server entry point.

use std::error::Error;
use std::sync::{Arc, Mutex};

use kitobxon_api::config::AppConfig;
use kitobxon_api::error::AppError;
use kitobxon_api::routes;
use kitobxon_api::state::AppState;
use kitobxon_api::telegram::{TelegramClient, TelegramNotifier};
use kitobxon_core::rng::{DeterministicRng, SystemRng};
use kitobxon_core::time::SystemClock;
use kitobxon_quiz::application::{Collaborators, QuizEngine};
use kitobxon_store::schema::MIGRATOR;
use kitobxon_store::{PgQuestionImport, PgResultRepository, PgUserDirectory};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Kitobxon quiz server");

    let config = AppConfig::from_env()?;

    // Create database connection pool and bring the schema up to date.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(AppError::from)?;
    MIGRATOR.run(&pool).await.map_err(AppError::from)?;

    let telegram = TelegramClient::new(&config.telegram_api_base, &config.telegram_bot_token)
        .map_err(AppError::from)?;
    let notifier = Arc::new(TelegramNotifier::new(telegram.clone()));
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(SystemRng::from_os()));

    let engine = QuizEngine::new(
        Collaborators {
            directory: Arc::new(PgUserDirectory::new(pool.clone())),
            questions: Arc::new(PgQuestionImport::new(pool.clone())),
            results: Arc::new(PgResultRepository::new(pool)),
            user_notifier: notifier.clone(),
            admin_notifier: notifier,
            clock: Arc::new(SystemClock),
            rng,
        },
        config.quiz_settings(),
    );

    let app_state = AppState::new(engine, telegram, config.telegram_webhook_secret.clone());

    // TODO: Restrict CorsLayer origins before exposing the JSON API outside the bot host.
    let app = routes::app_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = config.socket_addr()?;
    tracing::info!(
        question_time_limit_secs = config.question_time_limit.as_secs(),
        "Listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
