use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::{Duration, OffsetDateTime};

pub const SESSION_COOKIE: &str = "token";

pub fn set_session(jar: CookieJar, token: String, ttl: std::time::Duration, secure: bool) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .max_age(Duration::seconds(ttl.as_secs() as i64));
    jar.add(cookie)
}

/// Overwrites the session cookie with an already-expired empty one.
pub fn clear_session(jar: CookieJar, secure: bool) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH);
    jar.add(cookie)
}

pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
}
