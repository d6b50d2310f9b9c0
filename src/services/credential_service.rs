//! Domain service for the credential store.
//!
//! One hashed-password record per student. Plaintext is returned exactly once,
//! at generation, and never stored.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to credential operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Student not found in Enrollment system")]
    StudentNotFound,

    #[error("Student account is inactive")]
    InactiveAccount,

    #[error("Password already generated for this student")]
    AlreadyExists,

    #[error("Password record not found")]
    NotFound,

    #[error("Current password is incorrect")]
    InvalidCredentials,

    #[error("{0}")]
    PolicyViolation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CredentialError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CredentialError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result of generating an initial password. `password` is the only copy
/// of the plaintext that will ever exist.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPassword {
    pub student_id: String,
    pub student_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CredentialStatus {
    pub student_id: String,
    pub password_generated: bool,
    pub generated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordChanged {
    pub student_id: String,
    pub updated_at: String,
}

/// Domain service trait for the credential store.
#[async_trait::async_trait]
pub trait CredentialService: Send + Sync {
    /// Generates the initial password for a student.
    ///
    /// # Errors
    ///
    /// [`CredentialError::StudentNotFound`] when the directory has no such
    /// student, [`CredentialError::InactiveAccount`] when the directory status
    /// is not active, [`CredentialError::AlreadyExists`] when a credential
    /// record already exists.
    async fn generate(&self, student_id: &str) -> Result<GeneratedPassword, CredentialError>;

    /// Replaces the password after verifying the current one.
    ///
    /// # Errors
    ///
    /// [`CredentialError::InvalidCredentials`] on a wrong current password,
    /// [`CredentialError::PolicyViolation`] when the new password fails
    /// policy, [`CredentialError::NotFound`] when no record exists.
    async fn change_password(
        &self,
        student_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<PasswordChanged, CredentialError>;

    /// Read-only generation status. Never errors on unknown students.
    async fn status(&self, student_id: &str) -> Result<CredentialStatus, CredentialError>;
}

/// Password complexity rules shared by the change and reset paths:
/// length >= 8, at least one digit, at least one of `!@#$%^&*`.
pub fn check_password_policy(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("New password must be at least 8 characters long".to_string());
    }

    let has_number = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| "!@#$%^&*".contains(c));

    if !has_number || !has_special {
        return Err(
            "New password must contain at least one number and one special character (!@#$%^&*)"
                .to_string(),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_accepts_valid_password() {
        assert!(check_password_policy("NewPass123!").is_ok());
    }

    #[test]
    fn test_policy_rejects_short_password() {
        // 7 chars, otherwise valid
        assert!(check_password_policy("short1!").is_err());
    }

    #[test]
    fn test_policy_rejects_missing_digit() {
        assert!(check_password_policy("Password!").is_err());
    }

    #[test]
    fn test_policy_rejects_missing_special() {
        assert!(check_password_policy("Password123").is_err());
    }
}
