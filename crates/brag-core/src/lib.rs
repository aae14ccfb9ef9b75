//! # brag-core
//!
//! Domain layer of the engagement engine: entities, value objects, domain
//! errors, and the repository traits the store adapters implement.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ActivityCounts, Actor, AdminAction, AdminActionKind, Comment, CommentArena, CommentNode,
    ContentRemoval, ContentTarget, EventKey, LeaderboardEntry, LeaderboardScope, Member,
    Notification, NotificationKind, RankedEntry, Reaction, ReactionCount, ReactionKind,
    ReactionTarget, ReactionToggle, Report, ReportStats, ReportStatus, ResolveAction, Role,
    normalize_body, ScoringWeights, ShoutOut, ToggleState, MAX_BODY_CHARS,
};
pub use error::DomainError;
pub use traits::{
    AdminActionRepository, CommentRepository, LeaderboardRepository, MemberRepository,
    NotificationRepository, ReactionRepository, RepoResult, ReportQuery, ReportRepository,
    ResolveCommand, ResolveOutcome, ShoutOutRepository,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
