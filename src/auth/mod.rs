use crate::state::AppState;
use axum::Router;

mod claims;
pub mod cookie;
pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod middleware;
mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

/// Routes that bypass the session gate.
pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}

/// Routes that must be mounted behind `middleware::require_session`.
pub fn protected_router() -> Router<AppState> {
    handlers::user_routes()
}
