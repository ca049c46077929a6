use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use crate::{
    auth::{
        cookie::{clear_session, set_session},
        dto::{
            AuthResponse, MessageResponse, ProtectedResponse, PublicUser, SigninRequest,
            SignupRequest,
        },
        middleware::SessionUser,
        services,
    },
    error::{AppError, JsonBody},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
        .route("/auth/signout", post(signout))
}

/// Routes mounted under the session gate.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/protected", get(protected))
        .route("/users", get(list_users))
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let session = services::signup(&state, payload).await?;
    let jar = set_session(jar, session.token, state.keys.ttl, state.config.cookie_secure);
    Ok((
        jar,
        Json(AuthResponse {
            message: "User created successfully",
            user: session.user,
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(payload): JsonBody<SigninRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let session = services::signin(&state, payload).await?;
    let jar = set_session(jar, session.token, state.keys.ttl, state.config.cookie_secure);
    Ok((
        jar,
        Json(AuthResponse {
            message: "Signin successful",
            user: session.user,
        }),
    ))
}

#[instrument(skip(state, jar))]
pub async fn signout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    info!("signout");
    (
        clear_session(jar, state.config.cookie_secure),
        Json(MessageResponse {
            message: "Signout successful",
        }),
    )
}

#[instrument(skip(state))]
pub async fn protected(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ProtectedResponse>, AppError> {
    Ok(Json(services::profile(&state, &user.email).await?))
}

#[instrument(skip(state, _user))]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(_user): Extension<SessionUser>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    Ok(Json(services::list_users(&state).await?))
}
