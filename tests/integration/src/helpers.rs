//! Test helpers for integration tests
//!
//! Provides an engine over a fresh in-memory store, shortcuts for the
//! common setup steps, and assertions on service errors.

use std::fmt::Debug;

use anyhow::{Context, Result};
use brag_common::{try_init_tracing_with_config, EngagementConfig, TracingConfig};
use brag_core::{Actor, LeaderboardEntry, ReactionTarget, Role, Snowflake};
use brag_db::MemoryStore;
use brag_service::dto::{NotificationResponse, ReactionToggleResponse};
use brag_service::{
    CommentService, MemberService, ModerationService, NotificationService, ReactionService,
    ScoreService, ServiceContext, ServiceContextBuilder, ServiceResult, ShoutOutService,
};

use crate::fixtures::{comment_request, register_request, reply_request, shoutout_request};

/// Engine instance over its own store
pub struct TestEngine {
    pub store: MemoryStore,
    pub ctx: ServiceContext,
}

impl TestEngine {
    /// Engine with default switches (lazy recompute)
    pub fn start() -> Self {
        Self::with_engagement(EngagementConfig::default())
    }

    /// Engine that recomputes scores right after each mutation
    pub fn eager() -> Self {
        Self::with_engagement(EngagementConfig {
            eager_recompute: true,
            ..EngagementConfig::default()
        })
    }

    pub fn with_engagement(engagement: EngagementConfig) -> Self {
        // Only the first engine in a test binary installs the subscriber
        let _ = try_init_tracing_with_config(TracingConfig::development());

        let store = MemoryStore::new();
        let ctx = ServiceContextBuilder::new()
            .store(store.clone())
            .engagement(engagement)
            .build()
            .expect("every port is wired to the store");
        Self { store, ctx }
    }

    // === Services ===

    pub fn members(&self) -> MemberService<'_> {
        MemberService::new(&self.ctx)
    }

    pub fn shoutouts(&self) -> ShoutOutService<'_> {
        ShoutOutService::new(&self.ctx)
    }

    pub fn reactions(&self) -> ReactionService<'_> {
        ReactionService::new(&self.ctx)
    }

    pub fn comments(&self) -> CommentService<'_> {
        CommentService::new(&self.ctx)
    }

    pub fn notifications(&self) -> NotificationService<'_> {
        NotificationService::new(&self.ctx)
    }

    pub fn moderation(&self) -> ModerationService<'_> {
        ModerationService::new(&self.ctx)
    }

    pub fn scores(&self) -> ScoreService<'_> {
        ScoreService::new(&self.ctx)
    }

    // === Setup shortcuts ===

    /// Register an employee in `department`
    pub async fn member(&self, department: &str) -> Result<Actor> {
        self.register(department, Role::Employee).await
    }

    pub async fn admin(&self) -> Result<Actor> {
        self.register("Operations", Role::Admin).await
    }

    async fn register(&self, department: &str, role: Role) -> Result<Actor> {
        let member = self
            .members()
            .register_member(register_request(department, role))
            .await?;
        Ok(Actor::new(id(&member.id)?, role))
    }

    /// Post a shout-out tagging `tagged`
    pub async fn shoutout(&self, author: Actor, tagged: &[Actor]) -> Result<Snowflake> {
        let recipients: Vec<Snowflake> = tagged.iter().map(|a| a.id).collect();
        let shoutout = self
            .shoutouts()
            .create_shoutout(author, shoutout_request("Thanks for the help!", &recipients))
            .await?;
        id(&shoutout.id)
    }

    /// Comment on a shout-out, as a reply when `parent` is set
    pub async fn comment(
        &self,
        author: Actor,
        shoutout_id: Snowflake,
        parent: Option<Snowflake>,
    ) -> Result<Snowflake> {
        let request = match parent {
            Some(parent_id) => reply_request("Agreed", parent_id),
            None => comment_request("Well deserved"),
        };
        let comment = self
            .comments()
            .add_comment(author, shoutout_id, request)
            .await?;
        id(&comment.id)
    }

    pub async fn react(
        &self,
        actor: Actor,
        target: ReactionTarget,
        kind: &str,
    ) -> Result<ReactionToggleResponse> {
        Ok(self.reactions().set_reaction(actor, target, kind).await?)
    }

    pub async fn inbox(&self, actor: Actor) -> Result<Vec<NotificationResponse>> {
        Ok(self.notifications().list(actor, false, 100).await?)
    }

    /// Fresh leaderboard entry, healed if stale
    pub async fn entry(&self, member: Actor) -> Result<LeaderboardEntry> {
        Ok(self.scores().entry(member.id).await?)
    }

    pub async fn score(&self, member: Actor) -> Result<i64> {
        Ok(self.entry(member).await?.score)
    }
}

/// Parse a string id from a response DTO
pub fn id(raw: &str) -> Result<Snowflake> {
    raw.parse()
        .with_context(|| format!("response id {raw:?} is not a snowflake"))
}

/// Assert a service call failed with the given error code
pub fn assert_code<T: Debug>(result: ServiceResult<T>, expected: &str) {
    match result {
        Ok(value) => panic!("Expected error {expected}, got Ok({value:?})"),
        Err(err) => assert_eq!(err.error_code(), expected, "unexpected error: {err}"),
    }
}

/// Assert a service call failed with the given status code
pub fn assert_status<T: Debug>(result: ServiceResult<T>, expected: u16) {
    match result {
        Ok(value) => panic!("Expected status {expected}, got Ok({value:?})"),
        Err(err) => assert_eq!(err.status_code(), expected, "unexpected error: {err}"),
    }
}
