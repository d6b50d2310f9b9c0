use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::reset_tokens;

pub struct ResetTokenRepository {
    conn: DatabaseConnection,
}

impl ResetTokenRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a fresh token for the student, deleting any prior one first.
    /// Enforces the single-active-token invariant.
    pub async fn replace_for_student(
        &self,
        student_id: &str,
        token: &str,
        created_at: &str,
        expires_at: &str,
    ) -> Result<reset_tokens::Model> {
        reset_tokens::Entity::delete_many()
            .filter(reset_tokens::Column::StudentId.eq(student_id))
            .exec(&self.conn)
            .await
            .context("Failed to invalidate prior reset tokens")?;

        let model = reset_tokens::ActiveModel {
            student_id: Set(student_id.to_string()),
            token: Set(token.to_string()),
            created_at: Set(created_at.to_string()),
            expires_at: Set(expires_at.to_string()),
            ..Default::default()
        };

        let inserted = model
            .insert(&self.conn)
            .await
            .context("Failed to insert reset token")?;

        Ok(inserted)
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<reset_tokens::Model>> {
        let record = reset_tokens::Entity::find()
            .filter(reset_tokens::Column::Token.eq(token))
            .one(&self.conn)
            .await
            .context("Failed to query reset token")?;

        Ok(record)
    }

    pub async fn delete_by_token(&self, token: &str) -> Result<bool> {
        let result = reset_tokens::Entity::delete_many()
            .filter(reset_tokens::Column::Token.eq(token))
            .exec(&self.conn)
            .await
            .context("Failed to delete reset token")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_expired(&self, now: &str) -> Result<u64> {
        let result = reset_tokens::Entity::delete_many()
            .filter(reset_tokens::Column::ExpiresAt.lt(now))
            .exec(&self.conn)
            .await
            .context("Failed to prune expired reset tokens")?;

        Ok(result.rows_affected)
    }
}
