mod advice;
mod app;
mod auth;
mod config;
mod error;
mod state;
mod tasks;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "taskmind=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    if config.advice.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; /api/ask-chatgpt will fail");
    }

    let app_state = AppState::init(config).await?;
    app::serve(app::build_app(app_state)).await
}
