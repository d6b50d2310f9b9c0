use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::credentials;

/// Credential data returned from the repository (hash omitted).
#[derive(Debug, Clone)]
pub struct Credential {
    pub student_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<credentials::Model> for Credential {
    fn from(model: credentials::Model) -> Self {
        Self {
            student_id: model.student_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct CredentialRepository {
    conn: DatabaseConnection,
}

impl CredentialRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, student_id: &str) -> Result<Option<Credential>> {
        let record = credentials::Entity::find()
            .filter(credentials::Column::StudentId.eq(student_id))
            .one(&self.conn)
            .await
            .context("Failed to query credential")?;

        Ok(record.map(Credential::from))
    }

    /// Hashes and stores a new credential. The unique index on `student_id`
    /// rejects a concurrent duplicate insert.
    pub async fn create(
        &self,
        student_id: &str,
        plain_password: &str,
        config: &SecurityConfig,
    ) -> Result<Credential> {
        let password = plain_password.to_string();
        let config = config.clone();
        let hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let model = credentials::ActiveModel {
            student_id: Set(student_id.to_string()),
            password_hash: Set(hash),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = model
            .insert(&self.conn)
            .await
            .context("Failed to insert credential")?;

        Ok(Credential::from(inserted))
    }

    /// Verifies a password against the stored hash.
    /// Returns `None` when no credential exists for the student.
    /// Argon2 verification runs on `spawn_blocking`; it would otherwise
    /// stall the async runtime.
    pub async fn verify_password(&self, student_id: &str, password: &str) -> Result<Option<bool>> {
        let record = credentials::Entity::find()
            .filter(credentials::Column::StudentId.eq(student_id))
            .one(&self.conn)
            .await
            .context("Failed to query credential for verification")?;

        let Some(record) = record else {
            return Ok(None);
        };

        let password_hash = record.password_hash;
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(Some(is_valid))
    }

    pub async fn update_password(
        &self,
        student_id: &str,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<Credential> {
        let record = credentials::Entity::find()
            .filter(credentials::Column::StudentId.eq(student_id))
            .one(&self.conn)
            .await
            .context("Failed to query credential for password update")?
            .ok_or_else(|| anyhow::anyhow!("Credential not found: {student_id}"))?;

        let password = new_password.to_string();
        let config = config.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: credentials::ActiveModel = record.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(now);
        let updated = active.update(&self.conn).await?;

        Ok(Credential::from(updated))
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
