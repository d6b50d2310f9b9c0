//! Append-only login activity log.
//!
//! Recording is best effort: a failed insert must never fail the login that
//! triggered it, so errors are logged and swallowed at the `record` seam.

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::db::Store;
use crate::entities::login_activity;

use super::session_service::ClientContext;

/// Outcome column of an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    Success,
    Failed,
}

impl AttemptStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityPage {
    pub records: Vec<login_activity::Model>,
    pub total_records: u64,
    pub page: u64,
    pub page_size: u64,
}

#[derive(Clone)]
pub struct ActivityService {
    store: Store,
}

impl ActivityService {
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Appends one entry. Never propagates storage errors.
    pub async fn record(
        &self,
        student_id: &str,
        status: AttemptStatus,
        reason: &str,
        ctx: &ClientContext,
    ) {
        let entry_id = Uuid::new_v4().to_string();
        if let Err(e) = self
            .store
            .add_activity(
                &entry_id,
                student_id,
                status.as_str(),
                reason,
                &ctx.ip_address,
                &ctx.user_agent,
            )
            .await
        {
            warn!("Failed to record login activity for {student_id}: {e}");
        }
    }

    /// Appends one entry on behalf of another service. The reason is derived
    /// from the reported status; the entry is returned for echoing back.
    pub async fn record_manual(
        &self,
        student_id: &str,
        status: &str,
        ctx: &ClientContext,
    ) -> anyhow::Result<login_activity::Model> {
        let reason = if status == "success" {
            "Login successful"
        } else {
            "Login failed"
        };
        let entry_id = Uuid::new_v4().to_string();
        self.store
            .add_activity(
                &entry_id,
                student_id,
                status,
                reason,
                &ctx.ip_address,
                &ctx.user_agent,
            )
            .await
    }

    /// All entries for one student, newest first.
    pub async fn for_student(
        &self,
        student_id: &str,
    ) -> anyhow::Result<Vec<login_activity::Model>> {
        self.store.activity_for_student(student_id).await
    }

    /// One page of the full log, newest first. Pages are 1-based.
    pub async fn page(&self, page: u64, page_size: u64) -> anyhow::Result<ActivityPage> {
        let (records, total_records) = self.store.activity_page(page, page_size).await?;
        Ok(ActivityPage {
            records,
            total_records,
            page,
            page_size,
        })
    }
}
