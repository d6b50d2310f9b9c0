use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::sessions;

pub struct SessionRepository {
    conn: DatabaseConnection,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        session_id: &str,
        student_id: &str,
        token: &str,
        created_at: &str,
        expires_at: &str,
    ) -> Result<sessions::Model> {
        let model = sessions::ActiveModel {
            session_id: Set(session_id.to_string()),
            student_id: Set(student_id.to_string()),
            token: Set(token.to_string()),
            created_at: Set(created_at.to_string()),
            expires_at: Set(expires_at.to_string()),
            ..Default::default()
        };

        let inserted = model
            .insert(&self.conn)
            .await
            .context("Failed to insert session")?;

        Ok(inserted)
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<sessions::Model>> {
        let session = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .one(&self.conn)
            .await
            .context("Failed to query session by token")?;

        Ok(session)
    }

    /// Returns whether a row was actually removed.
    pub async fn delete_by_token(&self, token: &str) -> Result<bool> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::Token.eq(token))
            .exec(&self.conn)
            .await
            .context("Failed to delete session")?;

        Ok(result.rows_affected > 0)
    }

    /// Bulk-removes sessions whose expiry is behind `now` (RFC 3339).
    /// Used by the retention sweep; lazy expiry at access time does not
    /// depend on this.
    pub async fn delete_expired(&self, now: &str) -> Result<u64> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lt(now))
            .exec(&self.conn)
            .await
            .context("Failed to prune expired sessions")?;

        Ok(result.rows_affected)
    }
}
