//! Service context - dependency container for services
//!
//! Holds all repositories, configuration, and other dependencies needed by services.

use std::sync::Arc;

use brag_common::{AppConfig, EngagementConfig};
use brag_core::traits::{
    AdminActionRepository, CommentRepository, LeaderboardRepository, MemberRepository,
    NotificationRepository, ReactionRepository, ReportRepository, ShoutOutRepository,
};
use brag_core::{ScoringWeights, Snowflake, SnowflakeGenerator};
use brag_db::{
    MemoryStore, PgAdminActionRepository, PgCommentRepository, PgLeaderboardRepository,
    PgMemberRepository, PgNotificationRepository, PgPool, PgReactionRepository,
    PgReportRepository, PgShoutOutRepository,
};

use super::error::{ServiceError, ServiceResult};
use super::score::ScoreAggregator;

/// Service context containing all dependencies
///
/// Built once at startup and shared by handle. It provides access to:
/// - Store repositories
/// - Engagement switches and the score aggregator
/// - Snowflake generator for ID generation
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    member_repo: Arc<dyn MemberRepository>,
    shoutout_repo: Arc<dyn ShoutOutRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
    report_repo: Arc<dyn ReportRepository>,
    admin_action_repo: Arc<dyn AdminActionRepository>,
    leaderboard_repo: Arc<dyn LeaderboardRepository>,

    // Policy
    engagement: Arc<EngagementConfig>,
    aggregator: ScoreAggregator,

    // Services
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Wire PostgreSQL repositories over one pool
    pub fn postgres(pool: PgPool, config: &AppConfig) -> ServiceResult<Self> {
        ServiceContextBuilder::from_config(config)
            .member_repo(Arc::new(PgMemberRepository::new(pool.clone())))
            .shoutout_repo(Arc::new(PgShoutOutRepository::new(pool.clone())))
            .reaction_repo(Arc::new(PgReactionRepository::new(pool.clone())))
            .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
            .notification_repo(Arc::new(PgNotificationRepository::new(pool.clone())))
            .report_repo(Arc::new(PgReportRepository::new(pool.clone())))
            .admin_action_repo(Arc::new(PgAdminActionRepository::new(pool.clone())))
            .leaderboard_repo(Arc::new(PgLeaderboardRepository::new(pool)))
            .build()
    }

    /// Wire every port to one in-memory store
    pub fn in_memory(store: MemoryStore, config: &AppConfig) -> ServiceResult<Self> {
        ServiceContextBuilder::from_config(config).store(store).build()
    }

    // === Repositories ===

    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    pub fn shoutout_repo(&self) -> &dyn ShoutOutRepository {
        self.shoutout_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    pub fn report_repo(&self) -> &dyn ReportRepository {
        self.report_repo.as_ref()
    }

    pub fn admin_action_repo(&self) -> &dyn AdminActionRepository {
        self.admin_action_repo.as_ref()
    }

    pub fn leaderboard_repo(&self) -> &dyn LeaderboardRepository {
        self.leaderboard_repo.as_ref()
    }

    // === Policy ===

    /// Feature switches and notification policy
    pub fn engagement(&self) -> &EngagementConfig {
        &self.engagement
    }

    pub fn aggregator(&self) -> &ScoreAggregator {
        &self.aggregator
    }

    // === Services ===

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("engagement", &self.engagement)
            .field("aggregator", &self.aggregator)
            .field("worker_id", &self.snowflake_generator.worker_id())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    member_repo: Option<Arc<dyn MemberRepository>>,
    shoutout_repo: Option<Arc<dyn ShoutOutRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    report_repo: Option<Arc<dyn ReportRepository>>,
    admin_action_repo: Option<Arc<dyn AdminActionRepository>>,
    leaderboard_repo: Option<Arc<dyn LeaderboardRepository>>,
    engagement: EngagementConfig,
    weights: ScoringWeights,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the engagement, scoring, and worker settings of `config`
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .engagement(config.engagement.clone())
            .weights(config.scoring)
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
    }

    /// Use one store for every port
    pub fn store(self, store: MemoryStore) -> Self {
        self.member_repo(Arc::new(store.clone()))
            .shoutout_repo(Arc::new(store.clone()))
            .reaction_repo(Arc::new(store.clone()))
            .comment_repo(Arc::new(store.clone()))
            .notification_repo(Arc::new(store.clone()))
            .report_repo(Arc::new(store.clone()))
            .admin_action_repo(Arc::new(store.clone()))
            .leaderboard_repo(Arc::new(store))
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn shoutout_repo(mut self, repo: Arc<dyn ShoutOutRepository>) -> Self {
        self.shoutout_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn report_repo(mut self, repo: Arc<dyn ReportRepository>) -> Self {
        self.report_repo = Some(repo);
        self
    }

    pub fn admin_action_repo(mut self, repo: Arc<dyn AdminActionRepository>) -> Self {
        self.admin_action_repo = Some(repo);
        self
    }

    pub fn leaderboard_repo(mut self, repo: Arc<dyn LeaderboardRepository>) -> Self {
        self.leaderboard_repo = Some(repo);
        self
    }

    pub fn engagement(mut self, engagement: EngagementConfig) -> Self {
        self.engagement = engagement;
        self
    }

    pub fn weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            member_repo: self.member_repo.ok_or_else(|| ServiceError::validation("member_repo is required"))?,
            shoutout_repo: self.shoutout_repo.ok_or_else(|| ServiceError::validation("shoutout_repo is required"))?,
            reaction_repo: self.reaction_repo.ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            comment_repo: self.comment_repo.ok_or_else(|| ServiceError::validation("comment_repo is required"))?,
            notification_repo: self.notification_repo.ok_or_else(|| ServiceError::validation("notification_repo is required"))?,
            report_repo: self.report_repo.ok_or_else(|| ServiceError::validation("report_repo is required"))?,
            admin_action_repo: self.admin_action_repo.ok_or_else(|| ServiceError::validation("admin_action_repo is required"))?,
            leaderboard_repo: self.leaderboard_repo.ok_or_else(|| ServiceError::validation("leaderboard_repo is required"))?,
            engagement: Arc::new(self.engagement),
            aggregator: ScoreAggregator::new(self.weights),
            snowflake_generator: self.snowflake_generator.unwrap_or_default(),
        })
    }
}
