use axum::{extract::State, routing::post, Extension, Json, Router};
use tracing::instrument;

use super::{
    dto::{AdviceRequest, AdviceResponse},
    services,
};
use crate::{
    auth::middleware::SessionUser,
    error::{AppError, JsonBody},
    state::AppState,
};

pub fn advice_routes() -> Router<AppState> {
    Router::new().route("/ask-chatgpt", post(ask_chatgpt))
}

#[instrument(skip(state, user, payload), fields(email = %user.email))]
pub async fn ask_chatgpt(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    JsonBody(payload): JsonBody<AdviceRequest>,
) -> Result<Json<AdviceResponse>, AppError> {
    Ok(Json(services::ask(&state, payload).await?))
}
