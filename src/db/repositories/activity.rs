use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::login_activity;

pub struct ActivityRepository {
    conn: DatabaseConnection,
}

impl ActivityRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(
        &self,
        entry_id: &str,
        student_id: &str,
        status: &str,
        reason: &str,
        ip_address: &str,
        user_agent: &str,
    ) -> Result<login_activity::Model> {
        let model = login_activity::ActiveModel {
            entry_id: Set(entry_id.to_string()),
            student_id: Set(student_id.to_string()),
            status: Set(status.to_string()),
            reason: Set(reason.to_string()),
            ip_address: Set(ip_address.to_string()),
            user_agent: Set(user_agent.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let inserted = model
            .insert(&self.conn)
            .await
            .context("Failed to insert activity entry")?;

        Ok(inserted)
    }

    /// Newest-first entries for one student.
    pub async fn list_for_student(&self, student_id: &str) -> Result<Vec<login_activity::Model>> {
        let entries = login_activity::Entity::find()
            .filter(login_activity::Column::StudentId.eq(student_id))
            .order_by_desc(login_activity::Column::CreatedAt)
            .order_by_desc(login_activity::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query activity for student")?;

        Ok(entries)
    }

    /// Newest-first page of all entries, with the total row count.
    pub async fn list_all(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<login_activity::Model>, u64)> {
        let query = login_activity::Entity::find()
            .order_by_desc(login_activity::Column::CreatedAt)
            .order_by_desc(login_activity::Column::Id);

        let paginator = query.paginate(&self.conn, page_size);
        let total_records = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total_records))
    }

    /// Retention: drops rows older than the cutoff (RFC 3339).
    pub async fn prune_older_than(&self, cutoff: &str) -> Result<u64> {
        let result = login_activity::Entity::delete_many()
            .filter(login_activity::Column::CreatedAt.lt(cutoff))
            .exec(&self.conn)
            .await
            .context("Failed to prune activity log")?;

        Ok(result.rows_affected)
    }
}
