use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};

use crate::{
    auth::{
        dto::{ProtectedResponse, PublicUser, Session, SigninRequest, SignupRequest},
        password::{hash_password, verify_password},
        repo_types::{InsertUserError, NewUser},
    },
    error::AppError,
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_USERNAME_LEN: usize = 3;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn issue_session(state: &AppState, user: PublicUser) -> Result<Session, AppError> {
    let token = state.keys.issue(&user.email).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Internal("Error generating token".into())
    })?;
    Ok(Session { token, user })
}

pub async fn signup(state: &AppState, req: SignupRequest) -> Result<Session, AppError> {
    if !is_valid_email(&req.email) {
        warn!(email = %req.email, "invalid email");
        return Err(AppError::Validation("Invalid email format".into()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".into(),
        ));
    }
    if req.username.chars().count() < MIN_USERNAME_LEN {
        warn!(username = %req.username, "username too short");
        return Err(AppError::Validation(
            "Username must be at least 3 characters long".into(),
        ));
    }

    if state.users.find_by_email(&req.email).await?.is_some() {
        warn!(email = %req.email, "email already registered");
        return Err(AppError::Validation(InsertUserError::EmailTaken.to_string()));
    }
    if state.users.find_by_username(&req.username).await?.is_some() {
        warn!(username = %req.username, "username already taken");
        return Err(AppError::Validation(InsertUserError::UsernameTaken.to_string()));
    }

    let password_hash = hash_password(&req.password)?;

    let user = state
        .users
        .insert(NewUser {
            email: req.email,
            username: req.username,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            InsertUserError::Other(e) => {
                error!(error = %e, "create user failed");
                AppError::Internal("Error storing user".into())
            }
            conflict => {
                // lost a race with a concurrent signup
                warn!(error = %conflict, "unique constraint rejected signup");
                AppError::Validation(conflict.to_string())
            }
        })?;

    info!(email = %user.email, username = %user.username, "user registered");
    issue_session(state, user.into())
}

pub async fn signin(state: &AppState, req: SigninRequest) -> Result<Session, AppError> {
    if !is_valid_email(&req.email) {
        warn!(email = %req.email, "invalid email");
        return Err(AppError::Validation("Invalid email format".into()));
    }
    if req.password.is_empty() {
        warn!(email = %req.email, "signin without password");
        return Err(AppError::Validation(
            "Invalid input: password is required".into(),
        ));
    }

    let user = match state.users.find_by_email(&req.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %req.email, "signin unknown email");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
        Err(e) => {
            // lookup failures are reported like a miss
            error!(error = %e, "find_by_email failed");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    let ok = verify_password(&req.password, &user.password_hash).unwrap_or(false);
    if !ok {
        warn!(email = %req.email, "signin invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    info!(email = %user.email, "user signed in");
    issue_session(state, user.into())
}

/// Profile behind `GET /api/protected`.
pub async fn profile(state: &AppState, email: &str) -> Result<ProtectedResponse, AppError> {
    let user = match state.users.find_by_email(email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            error!(email = %email, "session email has no user");
            return Err(AppError::Internal("Error fetching user data".into()));
        }
        Err(e) => {
            error!(error = %e, email = %email, "find_by_email failed");
            return Err(AppError::Internal("Error fetching user data".into()));
        }
    };
    Ok(ProtectedResponse {
        message: "This is a protected route",
        email: user.email,
        username: user.username,
    })
}

pub async fn list_users(state: &AppState) -> Result<Vec<PublicUser>, AppError> {
    let users = state.users.list().await.map_err(|e| {
        error!(error = %e, "list users failed");
        AppError::Internal("Error fetching users".into())
    })?;
    Ok(users.into_iter().map(PublicUser::from).collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::{repo::UserRepo, repo_types::User};

    fn signup_req(email: &str, password: &str, username: &str) -> SignupRequest {
        SignupRequest {
            email: email.into(),
            password: password.into(),
            username: username.into(),
        }
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("a@b.c"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("spa ce@b.com"));
        assert!(!is_valid_email("a@b.c0m"));
    }

    #[tokio::test]
    async fn signup_then_signin_roundtrip() {
        let state = AppState::fake();
        let session = signup(&state, signup_req("a@b.com", "longenough1", "abc"))
            .await
            .expect("signup");
        assert_eq!(session.user.email, "a@b.com");
        assert_eq!(state.keys.verify(&session.token).unwrap().email, "a@b.com");

        let stored = state.users.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "longenough1");

        let again = signin(
            &state,
            SigninRequest {
                email: "a@b.com".into(),
                password: "longenough1".into(),
            },
        )
        .await
        .expect("signin");
        assert_eq!(
            again.user,
            PublicUser {
                email: "a@b.com".into(),
                username: "abc".into()
            }
        );
    }

    #[tokio::test]
    async fn signup_validates_before_touching_store() {
        let state = AppState::fake();
        for req in [
            signup_req("bad-email", "longenough1", "abc"),
            signup_req("a@b.com", "short", "abc"),
            signup_req("a@b.com", "longenough1", "ab"),
        ] {
            let err = signup(&state, req).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert!(state.users.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_email_and_username() {
        let state = AppState::fake();
        signup(&state, signup_req("a@b.com", "longenough1", "abc"))
            .await
            .unwrap();

        let err = signup(&state, signup_req("a@b.com", "longenough1", "other"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email already registered");

        let err = signup(&state, signup_req("z@b.com", "longenough1", "abc"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Username already taken");

        assert_eq!(state.users.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn signin_does_not_reveal_which_check_failed() {
        let state = AppState::fake();
        signup(&state, signup_req("a@b.com", "longenough1", "abc"))
            .await
            .unwrap();

        let wrong_pw = signin(
            &state,
            SigninRequest {
                email: "a@b.com".into(),
                password: "wrong-password".into(),
            },
        )
        .await
        .unwrap_err();
        let unknown = signin(
            &state,
            SigninRequest {
                email: "nobody@b.com".into(),
                password: "longenough1".into(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(wrong_pw, AppError::Unauthorized(_)));
        assert_eq!(wrong_pw.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn length_rules_count_characters() {
        let state = AppState::fake();
        // four bytes, two characters
        let err = signup(&state, signup_req("a@b.com", "longenough1", "äö"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Username must be at least 3 characters long");

        signup(&state, signup_req("a@b.com", "pässwörd", "äöü"))
            .await
            .expect("eight characters is long enough");
    }

    #[tokio::test]
    async fn signin_requires_a_password() {
        let state = AppState::fake();
        signup(&state, signup_req("a@b.com", "longenough1", "abc"))
            .await
            .unwrap();

        let err = signin(
            &state,
            SigninRequest {
                email: "a@b.com".into(),
                password: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "Invalid input: password is required");
    }

    /// Reads see nothing, the insert loses on a constraint: two signups racing.
    struct RacingUsers(InsertUserError);

    #[async_trait::async_trait]
    impl UserRepo for RacingUsers {
        async fn find_by_email(&self, _: &str) -> anyhow::Result<Option<User>> {
            Ok(None)
        }
        async fn find_by_username(&self, _: &str) -> anyhow::Result<Option<User>> {
            Ok(None)
        }
        async fn insert(&self, _: NewUser) -> Result<User, InsertUserError> {
            Err(match &self.0 {
                InsertUserError::EmailTaken => InsertUserError::EmailTaken,
                InsertUserError::UsernameTaken => InsertUserError::UsernameTaken,
                InsertUserError::Other(e) => InsertUserError::Other(anyhow::anyhow!("{e}")),
            })
        }
        async fn list(&self) -> anyhow::Result<Vec<User>> {
            Ok(Vec::new())
        }
    }

    fn racing_state(conflict: InsertUserError) -> AppState {
        let base = AppState::fake();
        AppState::from_parts(
            base.config.clone(),
            Arc::new(RacingUsers(conflict)),
            base.tasks.clone(),
            base.advisor.clone(),
        )
    }

    #[tokio::test]
    async fn store_conflict_on_insert_is_a_validation_error() {
        let state = racing_state(InsertUserError::UsernameTaken);
        let err = signup(&state, signup_req("a@b.com", "longenough1", "abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Username already taken"));

        let state = racing_state(InsertUserError::EmailTaken);
        let err = signup(&state, signup_req("a@b.com", "longenough1", "abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Email already registered"));
    }

    #[tokio::test]
    async fn store_failure_on_insert_is_internal() {
        let state = racing_state(InsertUserError::Other(anyhow::anyhow!("connection reset")));
        let err = signup(&state, signup_req("a@b.com", "longenough1", "abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.to_string(), "Error storing user");
    }

    #[tokio::test]
    async fn list_users_hides_password_hash() {
        let state = AppState::fake();
        signup(&state, signup_req("a@b.com", "longenough1", "abc"))
            .await
            .unwrap();
        let users = list_users(&state).await.unwrap();
        let json = serde_json::to_string(&users).unwrap();
        assert!(json.contains("abc"));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }
}
