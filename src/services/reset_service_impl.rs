use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::clients::directory::StudentDirectory;
use crate::config::SecurityConfig;
use crate::db::Store;

use super::credential_service::{check_password_policy, PasswordChanged};
use super::reset_service::{ResetError, ResetIssued, ResetService};

pub struct SeaOrmResetServiceImpl {
    store: Store,
    directory: Arc<dyn StudentDirectory>,
    security: SecurityConfig,
}

impl SeaOrmResetServiceImpl {
    pub fn new(store: Store, directory: Arc<dyn StudentDirectory>, security: SecurityConfig) -> Self {
        Self {
            store,
            directory,
            security,
        }
    }
}

#[async_trait::async_trait]
impl ResetService for SeaOrmResetServiceImpl {
    async fn request_reset(
        &self,
        student_id: &str,
        email: &str,
    ) -> Result<ResetIssued, ResetError> {
        // One error for both failure modes; callers cannot tell an unknown
        // student from a wrong email.
        let matches = self
            .directory
            .lookup(student_id)
            .await?
            .is_some_and(|student| student.email == email);
        if !matches {
            return Err(ResetError::StudentNotFound);
        }

        let token = Uuid::new_v4().to_string();
        let now = Utc::now();
        let expires_at =
            (now + Duration::minutes(self.security.reset_ttl_minutes)).to_rfc3339();

        self.store
            .replace_reset_token(student_id, &token, &now.to_rfc3339(), &expires_at)
            .await?;

        info!("Reset token issued for {student_id}");

        Ok(ResetIssued {
            student_id: student_id.to_string(),
            reset_token: token,
            expires_at,
        })
    }

    async fn consume_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<PasswordChanged, ResetError> {
        let Some(record) = self.store.find_reset_token(token).await? else {
            return Err(ResetError::InvalidToken);
        };

        let expired = DateTime::parse_from_rfc3339(&record.expires_at)
            .ok()
            .is_none_or(|deadline| Utc::now() > deadline.with_timezone(&Utc));
        if expired {
            self.store.delete_reset_token(token).await?;
            return Err(ResetError::Expired);
        }

        check_password_policy(new_password).map_err(ResetError::PolicyViolation)?;

        if self.store.get_credential(&record.student_id).await?.is_none() {
            return Err(ResetError::CredentialMissing);
        }

        let updated = self
            .store
            .update_credential(&record.student_id, new_password, &self.security)
            .await?;

        // Single use: spend the token only after the password actually changed.
        self.store.delete_reset_token(token).await?;

        info!("Password reset completed for {}", record.student_id);

        Ok(PasswordChanged {
            student_id: record.student_id,
            updated_at: updated.updated_at,
        })
    }
}
