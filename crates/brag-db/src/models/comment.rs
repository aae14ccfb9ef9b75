//! Comment database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for comments table
#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: i64,
    pub shoutout_id: i64,
    pub author_id: i64,
    pub parent_id: Option<i64>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

/// Thread shape only, for subtree walks
#[derive(Debug, Clone, FromRow)]
pub struct CommentEdgeModel {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub author_id: i64,
}
