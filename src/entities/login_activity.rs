use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Append-only audit row for a login attempt. Never updated after insert.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "login_activity")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip_serializing)]
    pub id: i64,

    #[serde(rename = "id")]
    pub entry_id: String,

    pub student_id: String,

    /// "success" or "failed"
    pub status: String,

    pub reason: String,

    pub ip_address: String,

    /// Raw User-Agent string, exposed as `device_type` on the wire
    #[serde(rename = "device_type")]
    pub user_agent: String,

    #[serde(rename = "timestamp")]
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
