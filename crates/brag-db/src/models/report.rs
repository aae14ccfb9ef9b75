//! Report database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reports table
#[derive(Debug, Clone, FromRow)]
pub struct ReportModel {
    pub id: i64,
    pub target_type: String,
    pub target_id: i64,
    pub reporter_id: i64,
    pub reason: String,
    pub status: String,
    pub resolved_by: Option<i64>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row of `GROUP BY status`
#[derive(Debug, Clone, FromRow)]
pub struct ReportStatusCountModel {
    pub status: String,
    pub count: i64,
}
