use std::sync::Arc;

use rand::Rng;
use tracing::info;

use crate::clients::directory::StudentDirectory;
use crate::config::SecurityConfig;
use crate::db::Store;

use super::credential_service::{
    check_password_policy, CredentialError, CredentialService, CredentialStatus,
    GeneratedPassword, PasswordChanged,
};

const PASSWORD_ALPHABET: &[u8] =
    b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789@#$!";
const RANDOM_PART_LEN: usize = 8;

/// Initial passwords are the last four characters of the student id followed
/// by eight characters drawn from an alphabet without lookalikes (no I/l/O/0/1).
fn synthesize_password(student_id: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_PART_LEN)
        .map(|_| PASSWORD_ALPHABET[rng.random_range(0..PASSWORD_ALPHABET.len())] as char)
        .collect();
    let tail_start = student_id.len().saturating_sub(4);
    format!("{}{suffix}", &student_id[tail_start..])
}

pub struct SeaOrmCredentialServiceImpl {
    store: Store,
    directory: Arc<dyn StudentDirectory>,
    security: SecurityConfig,
}

impl SeaOrmCredentialServiceImpl {
    pub fn new(
        store: Store,
        directory: Arc<dyn StudentDirectory>,
        security: SecurityConfig,
    ) -> Self {
        Self {
            store,
            directory,
            security,
        }
    }
}

#[async_trait::async_trait]
impl CredentialService for SeaOrmCredentialServiceImpl {
    async fn generate(&self, student_id: &str) -> Result<GeneratedPassword, CredentialError> {
        let student = self
            .directory
            .lookup(student_id)
            .await?
            .ok_or(CredentialError::StudentNotFound)?;

        if !student.is_active() {
            return Err(CredentialError::InactiveAccount);
        }

        if self.store.get_credential(student_id).await?.is_some() {
            return Err(CredentialError::AlreadyExists);
        }

        let password = synthesize_password(student_id);
        self.store
            .create_credential(student_id, &password, &self.security)
            .await?;

        info!("Generated initial password for {student_id}");

        Ok(GeneratedPassword {
            student_id: student_id.to_string(),
            student_name: student.name,
            password,
        })
    }

    async fn change_password(
        &self,
        student_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<PasswordChanged, CredentialError> {
        check_password_policy(new_password).map_err(CredentialError::PolicyViolation)?;

        match self
            .store
            .verify_credential(student_id, current_password)
            .await?
        {
            None => return Err(CredentialError::NotFound),
            Some(false) => return Err(CredentialError::InvalidCredentials),
            Some(true) => {}
        }

        let updated = self
            .store
            .update_credential(student_id, new_password, &self.security)
            .await?;

        info!("Password changed for {student_id}");

        Ok(PasswordChanged {
            student_id: student_id.to_string(),
            updated_at: updated.updated_at,
        })
    }

    async fn status(&self, student_id: &str) -> Result<CredentialStatus, CredentialError> {
        let record = self.store.get_credential(student_id).await?;
        Ok(CredentialStatus {
            student_id: student_id.to_string(),
            password_generated: record.is_some(),
            generated_at: record.map(|r| r.created_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_password_shape() {
        let password = synthesize_password("2024-00001");
        assert_eq!(password.len(), 12);
        assert!(password.starts_with("0001"));
        assert!(password[4..]
            .bytes()
            .all(|b| PASSWORD_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_synthesized_password_short_student_id() {
        let password = synthesize_password("007");
        assert!(password.starts_with("007"));
        assert_eq!(password.len(), 3 + RANDOM_PART_LEN);
    }
}
