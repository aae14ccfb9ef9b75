//! Member database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for members table
#[derive(Debug, Clone, FromRow)]
pub struct MemberModel {
    pub id: i64,
    pub display_name: String,
    pub email: String,
    pub department: String,
    pub role: String,
    pub deleted: bool,
    pub joined_at: DateTime<Utc>,
}
