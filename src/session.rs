use crate::errors::AppError;
use crate::ledger;
use crate::models::Snapshot;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

pub const USER_HEADER: &str = "x-goal-user";
pub const PASSWORD_HEADER: &str = "x-goal-password";

/// Credentials carried by a single request. Checked against the snapshot
/// loaded for that request, never cached between requests.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    password: String,
}

impl Session {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn authorize(&self, snapshot: &Snapshot) -> Result<(), AppError> {
        if ledger::verify_user(snapshot, &self.username, &self.password) {
            Ok(())
        } else {
            warn!(username = %self.username, "rejected credentials");
            Err(AppError::unauthorized("invalid username or password"))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        match (header(USER_HEADER), header(PASSWORD_HEADER)) {
            (Some(username), Some(password)) if !username.trim().is_empty() => {
                Ok(Session::new(username.trim(), password))
            }
            _ => Err(AppError::unauthorized("missing credentials")),
        }
    }
}
