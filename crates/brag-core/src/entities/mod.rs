//! Domain entities - core business objects

mod admin_action;
mod comment;
mod leaderboard;
mod member;
mod notification;
mod reaction;
mod removal;
mod report;
mod shoutout;
mod target;

pub use admin_action::{AdminAction, AdminActionKind};
pub use comment::{Comment, CommentArena, CommentNode};
pub use leaderboard::{
    ActivityCounts, LeaderboardEntry, LeaderboardScope, RankedEntry, ScoringWeights,
};
pub use member::{Actor, Member, Role};
pub use notification::{EventKey, Notification, NotificationKind};
pub use reaction::{
    Reaction, ReactionCount, ReactionKind, ReactionTarget, ReactionToggle, ToggleState,
};
pub use removal::ContentRemoval;
pub use report::{Report, ReportStats, ReportStatus, ResolveAction};
pub use shoutout::{normalize_body, ShoutOut, MAX_BODY_CHARS};
pub use target::ContentTarget;
