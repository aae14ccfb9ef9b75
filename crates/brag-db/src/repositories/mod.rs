//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in brag-core.
//! Multi-row mutations run in one transaction each; the shared statements
//! they compose live in `cascade`.

mod admin_action;
mod cascade;
mod comment;
mod error;
mod leaderboard;
mod member;
mod notification;
mod reaction;
mod report;
mod shoutout;

pub use admin_action::PgAdminActionRepository;
pub use comment::PgCommentRepository;
pub use leaderboard::PgLeaderboardRepository;
pub use member::PgMemberRepository;
pub use notification::PgNotificationRepository;
pub use reaction::PgReactionRepository;
pub use report::PgReportRepository;
pub use shoutout::PgShoutOutRepository;
