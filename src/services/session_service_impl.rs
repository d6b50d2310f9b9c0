use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::clients::directory::StudentDirectory;
use crate::db::Store;
use crate::token::TokenSigner;

use super::activity_service::{ActivityService, AttemptStatus};
use super::session_service::{
    AuthIdentity, ClientContext, LoginSession, LogoutReceipt, SessionError, SessionService,
    SessionStatus,
};

pub struct SeaOrmSessionServiceImpl {
    store: Store,
    directory: Arc<dyn StudentDirectory>,
    activity: ActivityService,
    signer: TokenSigner,
    session_ttl_minutes: i64,
}

impl SeaOrmSessionServiceImpl {
    pub fn new(
        store: Store,
        directory: Arc<dyn StudentDirectory>,
        activity: ActivityService,
        signer: TokenSigner,
        session_ttl_minutes: i64,
    ) -> Self {
        Self {
            store,
            directory,
            activity,
            signer,
            session_ttl_minutes,
        }
    }

    /// Parses a stored RFC 3339 deadline. A malformed row counts as expired
    /// rather than immortal.
    fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[async_trait::async_trait]
impl SessionService for SeaOrmSessionServiceImpl {
    async fn login(
        &self,
        student_id: &str,
        password: &str,
        ctx: &ClientContext,
    ) -> Result<LoginSession, SessionError> {
        let Some(student) = self.directory.lookup(student_id).await? else {
            self.activity
                .record(student_id, AttemptStatus::Failed, "Student not found", ctx)
                .await;
            return Err(SessionError::InvalidCredentials);
        };

        if !student.is_active() {
            self.activity
                .record(student_id, AttemptStatus::Failed, "Account inactive", ctx)
                .await;
            return Err(SessionError::InactiveAccount);
        }

        match self.store.verify_credential(student_id, password).await? {
            None => {
                self.activity
                    .record(
                        student_id,
                        AttemptStatus::Failed,
                        "No password generated",
                        ctx,
                    )
                    .await;
                return Err(SessionError::NoCredential);
            }
            Some(false) => {
                self.activity
                    .record(student_id, AttemptStatus::Failed, "Invalid password", ctx)
                    .await;
                return Err(SessionError::InvalidCredentials);
            }
            Some(true) => {}
        }

        let session_id = Uuid::new_v4().to_string();
        let token = self.signer.sign(student_id, &student.name, &session_id)?;
        let now = Utc::now();
        let expires_at = (now + Duration::minutes(self.session_ttl_minutes)).to_rfc3339();

        self.store
            .insert_session(
                &session_id,
                student_id,
                &token,
                &now.to_rfc3339(),
                &expires_at,
            )
            .await?;

        self.activity
            .record(student_id, AttemptStatus::Success, "Login successful", ctx)
            .await;

        info!("Login successful for {student_id}");

        Ok(LoginSession {
            token,
            session_id,
            student_id: student_id.to_string(),
            name: student.name,
            expires_at,
        })
    }

    async fn validate(&self, token: &str) -> Result<AuthIdentity, SessionError> {
        // Check order matters: registry absence, then age, then signature.
        // A deleted-because-expired session must not re-report as expired.
        let Some(session) = self.store.find_session(token).await? else {
            return Err(SessionError::SessionNotFound);
        };

        let expired = Self::parse_deadline(&session.expires_at)
            .is_none_or(|deadline| Utc::now() > deadline);
        if expired {
            self.store.delete_session(token).await?;
            return Err(SessionError::SessionExpired);
        }

        let claims = self
            .signer
            .verify(token)
            .map_err(|_| SessionError::InvalidToken)?;

        Ok(AuthIdentity {
            student_id: claims.sub,
            name: claims.name,
        })
    }

    async fn logout(&self, token: &str) -> Result<LogoutReceipt, SessionError> {
        let claims = self
            .signer
            .verify(token)
            .map_err(|_| SessionError::InvalidToken)?;

        // Removing an already-absent session is still a successful logout.
        self.store.delete_session(token).await?;

        info!("Logout for {}", claims.sub);

        Ok(LogoutReceipt {
            student_id: claims.sub,
            logged_out_at: Utc::now().to_rfc3339(),
        })
    }

    async fn status(&self, token: &str) -> Result<SessionStatus, SessionError> {
        let identity = self.validate(token).await?;

        let session = self
            .store
            .find_session(token)
            .await?
            .ok_or(SessionError::SessionNotFound)?;

        Ok(SessionStatus {
            student_id: identity.student_id,
            name: identity.name,
            session_id: session.session_id,
            created_at: session.created_at,
            expires_at: session.expires_at,
        })
    }
}
