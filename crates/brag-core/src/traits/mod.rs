//! Repository traits (ports)

mod repositories;

pub use repositories::{
    AdminActionRepository, CommentRepository, LeaderboardRepository, MemberRepository,
    NotificationRepository, ReactionRepository, RepoResult, ReportQuery, ReportRepository,
    ResolveCommand, ResolveOutcome, ShoutOutRepository,
};
