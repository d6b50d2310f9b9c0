use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::login_activity;
use crate::entities::reset_tokens;
use crate::entities::sessions;

pub mod migrator;
pub mod repositories;

pub use repositories::credential::Credential;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn credential_repo(&self) -> repositories::credential::CredentialRepository {
        repositories::credential::CredentialRepository::new(self.conn.clone())
    }

    fn session_repo(&self) -> repositories::session::SessionRepository {
        repositories::session::SessionRepository::new(self.conn.clone())
    }

    fn reset_token_repo(&self) -> repositories::reset_token::ResetTokenRepository {
        repositories::reset_token::ResetTokenRepository::new(self.conn.clone())
    }

    fn activity_repo(&self) -> repositories::activity::ActivityRepository {
        repositories::activity::ActivityRepository::new(self.conn.clone())
    }

    // Credentials

    pub async fn get_credential(&self, student_id: &str) -> Result<Option<Credential>> {
        self.credential_repo().get(student_id).await
    }

    pub async fn create_credential(
        &self,
        student_id: &str,
        plain_password: &str,
        config: &SecurityConfig,
    ) -> Result<Credential> {
        self.credential_repo()
            .create(student_id, plain_password, config)
            .await
    }

    pub async fn verify_credential(
        &self,
        student_id: &str,
        password: &str,
    ) -> Result<Option<bool>> {
        self.credential_repo()
            .verify_password(student_id, password)
            .await
    }

    pub async fn update_credential(
        &self,
        student_id: &str,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<Credential> {
        self.credential_repo()
            .update_password(student_id, new_password, config)
            .await
    }

    // Sessions

    pub async fn insert_session(
        &self,
        session_id: &str,
        student_id: &str,
        token: &str,
        created_at: &str,
        expires_at: &str,
    ) -> Result<sessions::Model> {
        self.session_repo()
            .insert(session_id, student_id, token, created_at, expires_at)
            .await
    }

    pub async fn find_session(&self, token: &str) -> Result<Option<sessions::Model>> {
        self.session_repo().find_by_token(token).await
    }

    pub async fn delete_session(&self, token: &str) -> Result<bool> {
        self.session_repo().delete_by_token(token).await
    }

    pub async fn delete_expired_sessions(&self, now: &str) -> Result<u64> {
        self.session_repo().delete_expired(now).await
    }

    // Reset tokens

    pub async fn replace_reset_token(
        &self,
        student_id: &str,
        token: &str,
        created_at: &str,
        expires_at: &str,
    ) -> Result<reset_tokens::Model> {
        self.reset_token_repo()
            .replace_for_student(student_id, token, created_at, expires_at)
            .await
    }

    pub async fn find_reset_token(&self, token: &str) -> Result<Option<reset_tokens::Model>> {
        self.reset_token_repo().find_by_token(token).await
    }

    pub async fn delete_reset_token(&self, token: &str) -> Result<bool> {
        self.reset_token_repo().delete_by_token(token).await
    }

    pub async fn delete_expired_reset_tokens(&self, now: &str) -> Result<u64> {
        self.reset_token_repo().delete_expired(now).await
    }

    // Activity log

    pub async fn add_activity(
        &self,
        entry_id: &str,
        student_id: &str,
        status: &str,
        reason: &str,
        ip_address: &str,
        user_agent: &str,
    ) -> Result<login_activity::Model> {
        self.activity_repo()
            .add(entry_id, student_id, status, reason, ip_address, user_agent)
            .await
    }

    pub async fn activity_for_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<login_activity::Model>> {
        self.activity_repo().list_for_student(student_id).await
    }

    pub async fn activity_page(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<login_activity::Model>, u64)> {
        self.activity_repo().list_all(page, page_size).await
    }

    pub async fn prune_activity(&self, cutoff: &str) -> Result<u64> {
        self.activity_repo().prune_older_than(cutoff).await
    }
}
