//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use brag_core::entities::{
    AdminAction, Comment, CommentNode, ContentRemoval, LeaderboardEntry, Member, Notification,
    RankedEntry, ReactionCount, Report, ShoutOut,
};

use super::responses::{
    AdminActionResponse, CommentNodeResponse, CommentResponse, DeleteShoutOutResponse,
    LeaderboardRowResponse, MemberResponse, NotificationResponse, ReactionCountResponse,
    ReportResponse, ShoutOutResponse, StandingResponse,
};

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.to_string(),
            display_name: member.display_name.clone(),
            department: member.department.clone(),
            role: member.role,
            deleted: member.deleted,
            joined_at: member.joined_at,
        }
    }
}

impl From<&ShoutOut> for ShoutOutResponse {
    fn from(shoutout: &ShoutOut) -> Self {
        Self {
            id: shoutout.id.to_string(),
            author_id: shoutout.author_id.to_string(),
            message: shoutout.message.clone(),
            recipient_ids: shoutout.recipients.iter().map(ToString::to_string).collect(),
            media: shoutout.media.clone(),
            created_at: shoutout.created_at,
            edited_at: shoutout.edited_at,
            edit_count: shoutout.edit_count,
        }
    }
}

impl From<&ContentRemoval> for DeleteShoutOutResponse {
    fn from(removal: &ContentRemoval) -> Self {
        Self {
            comments_removed: removal.comments_removed,
            reactions_removed: removal.reactions_removed,
            notifications_removed: removal.notifications_removed,
            reports_removed: removal.reports_removed,
        }
    }
}

impl From<ReactionCount> for ReactionCountResponse {
    fn from(count: ReactionCount) -> Self {
        Self {
            kind: count.kind,
            count: count.count,
        }
    }
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            shoutout_id: comment.shoutout_id.to_string(),
            author_id: comment.author_id.to_string(),
            parent_id: comment.parent_id.map(|id| id.to_string()),
            body: comment.body.clone(),
            created_at: comment.created_at,
            edited_at: comment.edited_at,
        }
    }
}

impl From<&CommentNode> for CommentNodeResponse {
    fn from(node: &CommentNode) -> Self {
        Self {
            comment: CommentResponse::from(&node.comment),
            replies: node.replies.iter().map(Self::from).collect(),
        }
    }
}

impl From<&Notification> for NotificationResponse {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            actor_id: notification.actor_id.to_string(),
            kind: notification.kind,
            shoutout_id: notification.shoutout_id.map(|id| id.to_string()),
            comment_id: notification.comment_id.map(|id| id.to_string()),
            message: notification.message.clone(),
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}

impl From<&Report> for ReportResponse {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id.to_string(),
            target_type: report.target.kind_str(),
            target_id: report.target.id().to_string(),
            reporter_id: report.reporter_id.to_string(),
            reason: report.reason.clone(),
            status: report.status,
            resolved_by: report.resolved_by.map(|id| id.to_string()),
            resolved_at: report.resolved_at,
            resolution_note: report.resolution_note.clone(),
            created_at: report.created_at,
        }
    }
}

impl From<&AdminAction> for AdminActionResponse {
    fn from(action: &AdminAction) -> Self {
        Self {
            id: action.id.to_string(),
            admin_id: action.admin_id.to_string(),
            action: action.action.as_str(),
            target_type: action.target.kind_str(),
            target_id: action.target.id().to_string(),
            report_id: action.report_id.map(|id| id.to_string()),
            created_at: action.created_at,
        }
    }
}

impl From<RankedEntry> for LeaderboardRowResponse {
    fn from(row: RankedEntry) -> Self {
        Self {
            rank: row.rank,
            member_id: row.entry.member_id.to_string(),
            display_name: row.display_name,
            department: row.department,
            score: row.entry.score,
            counts: row.entry.counts,
        }
    }
}

impl StandingResponse {
    pub fn new(rank: i64, entry: &LeaderboardEntry) -> Self {
        Self {
            member_id: entry.member_id.to_string(),
            rank,
            score: entry.score,
            counts: entry.counts,
            computed_at: entry.computed_at,
        }
    }
}
