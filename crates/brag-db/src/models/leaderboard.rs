//! Leaderboard database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for leaderboard_entries table
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardEntryModel {
    pub member_id: i64,
    pub shoutouts_sent: i64,
    pub tags_received: i64,
    pub reactions_received: i64,
    pub comments_received: i64,
    pub reactions_given: i64,
    pub score: i64,
    pub revision: i64,
    pub computed_revision: i64,
    pub computed_at: Option<DateTime<Utc>>,
}

/// Entry joined with member details and its window rank
#[derive(Debug, Clone, FromRow)]
pub struct RankedEntryModel {
    #[sqlx(flatten)]
    pub entry: LeaderboardEntryModel,
    pub display_name: String,
    pub department: String,
    pub rank: i64,
}

/// Live counters computed from activity rows
#[derive(Debug, Clone, FromRow)]
pub struct ActivityCountsModel {
    pub shoutouts_sent: i64,
    pub tags_received: i64,
    pub reactions_received: i64,
    pub comments_received: i64,
    pub reactions_given: i64,
}
