//! Admin action database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for admin_actions table
#[derive(Debug, Clone, FromRow)]
pub struct AdminActionModel {
    pub id: i64,
    pub admin_id: i64,
    pub action: String,
    pub target_type: String,
    pub target_id: i64,
    pub report_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
