//! Response DTOs for engine operations
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use brag_core::entities::{
    ActivityCounts, NotificationKind, ReactionKind, ReportStatus, Role, ToggleState,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Member Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub display_name: String,
    pub department: String,
    pub role: Role,
    pub deleted: bool,
    pub joined_at: DateTime<Utc>,
}

// ============================================================================
// Shout-out Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ShoutOutResponse {
    pub id: String,
    pub author_id: String,
    pub message: String,
    pub recipient_ids: Vec<String>,
    pub media: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
    pub edit_count: i32,
}

/// Rows removed by a shout-out deletion
#[derive(Debug, Clone, Serialize)]
pub struct DeleteShoutOutResponse {
    pub comments_removed: u64,
    pub reactions_removed: u64,
    pub notifications_removed: u64,
    pub reports_removed: u64,
}

// ============================================================================
// Reaction Responses
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReactionCountResponse {
    pub kind: ReactionKind,
    pub count: i64,
}

/// Outcome of a toggle with the target's fresh counts
#[derive(Debug, Clone, Serialize)]
pub struct ReactionToggleResponse {
    pub state: ToggleState,
    /// The actor's reaction after the call
    pub kind: Option<ReactionKind>,
    pub counts: Vec<ReactionCountResponse>,
}

// ============================================================================
// Comment Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub shoutout_id: String,
    pub author_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
}

/// A comment with its nested replies
#[derive(Debug, Clone, Serialize)]
pub struct CommentNodeResponse {
    #[serde(flatten)]
    pub comment: CommentResponse,
    pub replies: Vec<CommentNodeResponse>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeleteCommentResponse {
    /// The comment plus its descendants
    pub removed_count: u64,
    pub reactions_removed: u64,
}

// ============================================================================
// Notification Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub actor_id: String,
    pub kind: NotificationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shoutout_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Moderation Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub id: String,
    pub target_type: &'static str,
    pub target_id: String,
    pub reporter_id: String,
    pub reason: String,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminActionResponse {
    pub id: String,
    pub admin_id: String,
    pub action: &'static str,
    pub target_type: &'static str,
    pub target_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Leaderboard Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRowResponse {
    pub rank: i64,
    pub member_id: String,
    pub display_name: String,
    pub department: String,
    pub score: i64,
    pub counts: ActivityCounts,
}

/// One member's position and breakdown
#[derive(Debug, Clone, Serialize)]
pub struct StandingResponse {
    pub member_id: String,
    pub rank: i64,
    pub score: i64,
    pub counts: ActivityCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_at: Option<DateTime<Utc>>,
}
