//! Notification database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for notifications table
#[derive(Debug, Clone, FromRow)]
pub struct NotificationModel {
    pub id: i64,
    pub recipient_id: i64,
    pub actor_id: i64,
    pub kind: String,
    pub shoutout_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub message: String,
    pub read: bool,
    pub event_key: String,
    pub created_at: DateTime<Utc>,
}
