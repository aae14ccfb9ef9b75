//! Database models - SQLx-compatible structs for PostgreSQL tables

mod admin_action;
mod comment;
mod leaderboard;
mod member;
mod notification;
mod reaction;
mod report;
mod shoutout;

pub use admin_action::AdminActionModel;
pub use comment::{CommentEdgeModel, CommentModel};
pub use leaderboard::{ActivityCountsModel, LeaderboardEntryModel, RankedEntryModel};
pub use member::MemberModel;
pub use notification::NotificationModel;
pub use reaction::{ReactionCountModel, ReactionModel};
pub use report::{ReportModel, ReportStatusCountModel};
pub use shoutout::ShoutOutModel;
