//! Domain service for password reset tokens.
//!
//! A student holds at most one live reset token; issuing a new one replaces
//! any predecessor. Tokens are single use and expire after a short window.

use serde::Serialize;
use thiserror::Error;

use super::credential_service::PasswordChanged;

/// Errors specific to reset operations.
#[derive(Debug, Error)]
pub enum ResetError {
    #[error("Student not found or email does not match records")]
    StudentNotFound,

    #[error("Invalid or expired reset token")]
    InvalidToken,

    #[error("Reset token has expired")]
    Expired,

    #[error("Password record not found")]
    CredentialMissing,

    #[error("{0}")]
    PolicyViolation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ResetError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ResetError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Issued reset token. In a deployment with mail delivery the token would be
/// sent out of band; here it is returned directly.
#[derive(Debug, Clone, Serialize)]
pub struct ResetIssued {
    pub student_id: String,
    pub reset_token: String,
    pub expires_at: String,
}

/// Domain service trait for password resets.
#[async_trait::async_trait]
pub trait ResetService: Send + Sync {
    /// Issues a reset token after matching `email` against the directory
    /// record for `student_id`. The comparison is exact.
    ///
    /// # Errors
    ///
    /// [`ResetError::StudentNotFound`] covers both an unknown student and a
    /// mismatched email, so callers cannot probe which part was wrong.
    async fn request_reset(&self, student_id: &str, email: &str)
        -> Result<ResetIssued, ResetError>;

    /// Consumes a reset token and installs the new password. A successful
    /// consume spends the token; an expired token is removed on sight.
    ///
    /// # Errors
    ///
    /// [`ResetError::InvalidToken`] for unknown tokens,
    /// [`ResetError::Expired`] for tokens past their window,
    /// [`ResetError::PolicyViolation`] when the new password fails policy,
    /// [`ResetError::CredentialMissing`] when no record exists to overwrite.
    async fn consume_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<PasswordChanged, ResetError>;
}
