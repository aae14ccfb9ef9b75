//! Shout-out database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for shoutouts, with tag and media rows folded in as arrays
#[derive(Debug, Clone, FromRow)]
pub struct ShoutOutModel {
    pub id: i64,
    pub author_id: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub edit_count: i32,
    pub recipients: Vec<i64>,
    pub media: Vec<String>,
}
