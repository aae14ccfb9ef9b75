//! Repository traits (ports) - define the interface for data access
//!
//! Every method that mutates more than one row is a single atomic unit in
//! the implementation: either all of its writes land or none do. Methods
//! that change point-bearing activity also bump the leaderboard revision of
//! every affected member inside that same unit.

use async_trait::async_trait;

use crate::entities::{
    ActivityCounts, AdminAction, Comment, ContentRemoval, ContentTarget, LeaderboardEntry,
    LeaderboardScope, Member, Notification, RankedEntry, ReactionCount, ReactionKind,
    ReactionTarget, ReactionToggle, Report, ReportStats, ReportStatus, ResolveAction, ShoutOut,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find member by ID, including soft-deleted members
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Member>>;

    /// Find several members at once; unknown ids are skipped
    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<Member>>;

    /// Create a new member
    async fn create(&self, member: &Member) -> RepoResult<()>;

    /// Flip the soft-delete flag
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// ShoutOut Repository
// ============================================================================

#[async_trait]
pub trait ShoutOutRepository: Send + Sync {
    /// Find shout-out by ID with its recipients and media
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ShoutOut>>;

    /// Insert the shout-out, its tag rows and media references
    async fn create(&self, shoutout: &ShoutOut) -> RepoResult<()>;

    /// Persist message and edit time, bumping the stored edit counter
    ///
    /// The counter check and increment happen in one write: fails with
    /// `EditLimitReached` once the stored counter is at `max_edits`.
    /// Returns the new counter.
    async fn update_message(&self, shoutout: &ShoutOut, max_edits: i32) -> RepoResult<i32>;

    /// Remove the shout-out and everything hanging off it
    ///
    /// `audit` is written in the same unit when an admin removes someone
    /// else's content.
    async fn delete_cascade(
        &self,
        id: Snowflake,
        audit: Option<&AdminAction>,
    ) -> RepoResult<ContentRemoval>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Three-way toggle of the member's reaction on a target
    ///
    /// `new_id` is used only when a row gets created. Fails with a not-found
    /// error when the target does not exist.
    async fn toggle(
        &self,
        target: ReactionTarget,
        member_id: Snowflake,
        kind: ReactionKind,
        new_id: Snowflake,
    ) -> RepoResult<ReactionToggle>;

    /// Per-kind counts for a target; kinds with no reactions are omitted
    async fn counts(&self, target: ReactionTarget) -> RepoResult<Vec<ReactionCount>>;

    /// The member's current reaction kind on a target
    async fn find_kind(
        &self,
        target: ReactionTarget,
        member_id: Snowflake,
    ) -> RepoResult<Option<ReactionKind>>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>>;

    /// Insert a leaf comment; fails with not-found if the shout-out or the
    /// parent vanished
    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    async fn update_body(&self, comment: &Comment) -> RepoResult<()>;

    /// All comments of a shout-out, oldest first
    async fn list_by_shoutout(&self, shoutout_id: Snowflake) -> RepoResult<Vec<Comment>>;

    /// Remove the comment, its descendants and their dependents
    async fn delete_subtree(
        &self,
        id: Snowflake,
        audit: Option<&AdminAction>,
    ) -> RepoResult<ContentRemoval>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert unless `(recipient, event_key)` already exists; true if inserted
    async fn insert_if_absent(&self, notification: &Notification) -> RepoResult<bool>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Notification>>;

    /// Newest first
    async fn list(
        &self,
        recipient_id: Snowflake,
        unread_only: bool,
        limit: i64,
    ) -> RepoResult<Vec<Notification>>;

    async fn unread_count(&self, recipient_id: Snowflake) -> RepoResult<i64>;

    /// Set the read flag; false when the notification does not exist
    async fn mark_read(&self, id: Snowflake) -> RepoResult<bool>;

    /// Mark every unread notification read; returns how many changed
    async fn mark_all_read(&self, recipient_id: Snowflake) -> RepoResult<u64>;
}

// ============================================================================
// Report Repository
// ============================================================================

/// Filter for listing reports
#[derive(Debug, Clone, Default)]
pub struct ReportQuery {
    pub status: Option<ReportStatus>,
    pub limit: i64,
}

/// Everything needed to close a report in one unit
#[derive(Debug, Clone)]
pub struct ResolveCommand {
    pub report_id: Snowflake,
    pub admin_id: Snowflake,
    pub action: ResolveAction,
    pub note: Option<String>,
    /// Id for the audit row
    pub audit_id: Snowflake,
}

/// Result of closing a report
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    pub report: Report,
    pub removal: ContentRemoval,
    /// Author of the reported content when it still existed at close time
    pub content_author: Option<Snowflake>,
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn create(&self, report: &Report) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Report>>;

    /// The reporter's open report on a target, if any
    async fn find_pending(
        &self,
        reporter_id: Snowflake,
        target: ContentTarget,
    ) -> RepoResult<Option<Report>>;

    /// Close a pending report, removing content for `Remove`, and write the
    /// audit row
    ///
    /// A report that is no longer pending fails with a conflict and nothing
    /// changes.
    async fn resolve(&self, command: &ResolveCommand) -> RepoResult<ResolveOutcome>;

    /// Newest first
    async fn list(&self, query: &ReportQuery) -> RepoResult<Vec<Report>>;

    async fn stats(&self) -> RepoResult<ReportStats>;
}

// ============================================================================
// Admin Action Repository
// ============================================================================

#[async_trait]
pub trait AdminActionRepository: Send + Sync {
    /// Newest first
    async fn list(&self, limit: i64) -> RepoResult<Vec<AdminAction>>;
}

// ============================================================================
// Leaderboard Repository
// ============================================================================

#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// Bump the revision of each member's entry, creating missing entries
    async fn mark_stale(&self, member_ids: &[Snowflake]) -> RepoResult<()>;

    /// Fetch the entry, creating an empty stale one if absent
    async fn ensure(&self, member_id: Snowflake) -> RepoResult<LeaderboardEntry>;

    /// Live counters from the activity rows
    async fn activity(&self, member_id: Snowflake) -> RepoResult<ActivityCounts>;

    /// Store counters computed against `observed_revision`
    ///
    /// The write is ignored when a newer computation already landed.
    async fn save_computed(
        &self,
        member_id: Snowflake,
        counts: &ActivityCounts,
        score: i64,
        observed_revision: i64,
    ) -> RepoResult<LeaderboardEntry>;

    /// Active members in scope whose entry is missing or stale
    async fn stale_members(&self, scope: &LeaderboardScope) -> RepoResult<Vec<Snowflake>>;

    /// Entries ordered by score desc then member id asc
    async fn ranked(&self, scope: &LeaderboardScope, limit: i64) -> RepoResult<Vec<RankedEntry>>;

    /// 1-based position among active members in scope
    async fn rank(&self, member_id: Snowflake, scope: &LeaderboardScope) -> RepoResult<i64>;
}
