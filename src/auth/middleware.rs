use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use super::{cookie::session_token, jwt::JwtKeys};
use crate::error::AppError;

/// Identity attached to requests that passed the session gate.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub email: String,
}

/// Rejects the request unless the `token` cookie carries a valid session.
pub async fn require_session(
    State(keys): State<JwtKeys>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = session_token(&jar) else {
        warn!(uri = %req.uri(), "missing session cookie");
        return Err(unauthorized());
    };

    let claims = match keys.verify(token) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, uri = %req.uri(), "invalid or expired session token");
            return Err(unauthorized());
        }
    };

    req.extensions_mut().insert(SessionUser {
        email: claims.email,
    });
    Ok(next.run(req).await)
}

fn unauthorized() -> AppError {
    AppError::Unauthorized("Unauthorized".into())
}
