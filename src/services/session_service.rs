//! Domain service for login sessions.
//!
//! A session is a server-side registry row keyed by its bearer token. Expiry
//! is lazy: rows outlive their deadline until a validation touches them.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive. Please contact administrator.")]
    InactiveAccount,

    #[error("No password generated for this student. Please contact administrator.")]
    NoCredential,

    #[error("Access denied. No token provided.")]
    MissingToken,

    #[error("Invalid or expired session.")]
    SessionNotFound,

    #[error("Session expired. Please login again.")]
    SessionExpired,

    #[error("Invalid token.")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for SessionError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for SessionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Caller network context, recorded with every login attempt.
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub ip_address: String,
    pub user_agent: String,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginSession {
    pub token: String,
    pub session_id: String,
    pub student_id: String,
    pub name: String,
    pub expires_at: String,
}

/// Identity attached to a request once its token has been validated.
#[derive(Debug, Clone, Serialize)]
pub struct AuthIdentity {
    pub student_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub student_id: String,
    pub name: String,
    pub session_id: String,
    pub created_at: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogoutReceipt {
    pub student_id: String,
    pub logged_out_at: String,
}

/// Domain service trait for login sessions.
#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    /// Verifies credentials, mints a token and registers the session.
    /// Every attempt, pass or fail, lands in the activity log.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidCredentials`] for unknown students, missing
    /// credential records and wrong passwords alike; the distinction is
    /// recorded internally only. [`SessionError::InactiveAccount`] when the
    /// directory marks the account inactive.
    async fn login(
        &self,
        student_id: &str,
        password: &str,
        ctx: &ClientContext,
    ) -> Result<LoginSession, SessionError>;

    /// Checks a bearer token: registry presence first, then age, then
    /// signature. A session past its deadline is deleted on sight.
    ///
    /// # Errors
    ///
    /// [`SessionError::SessionNotFound`], [`SessionError::SessionExpired`] or
    /// [`SessionError::InvalidToken`] depending on which check fails.
    async fn validate(&self, token: &str) -> Result<AuthIdentity, SessionError>;

    /// Removes the session for `token`. Repeating a logout is not an error;
    /// the registry row is simply already gone.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidToken`] when the signature does not check out.
    async fn logout(&self, token: &str) -> Result<LogoutReceipt, SessionError>;

    /// Session metadata for an already-validated token.
    async fn status(&self, token: &str) -> Result<SessionStatus, SessionError>;
}
