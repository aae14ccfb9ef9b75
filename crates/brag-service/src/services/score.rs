//! Score service
//!
//! Keeps leaderboard entries consistent with live activity. Mutations only
//! bump an entry's revision; counters are rebuilt here, either right after
//! the mutation (eager) or before the next read (lazy). Both paths compute
//! the same value from the same rows.

use brag_core::entities::{ActivityCounts, LeaderboardEntry, LeaderboardScope, ScoringWeights};
use brag_core::{DomainError, Snowflake};
use tracing::{debug, instrument, warn};

use crate::dto::{LeaderboardRowResponse, StandingResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Largest leaderboard page
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

/// Weighted sum over activity counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreAggregator {
    weights: ScoringWeights,
}

impl ScoreAggregator {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    pub fn score(&self, counts: &ActivityCounts) -> i64 {
        self.weights.score(counts)
    }
}

/// Score service
pub struct ScoreService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ScoreService<'a> {
    /// Create a new ScoreService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Rebuild one member's counters and score from live rows
    ///
    /// The revision observed before counting is stored with the result, so
    /// a mark that lands while counting keeps the entry stale.
    #[instrument(skip(self))]
    pub async fn recompute(&self, member_id: Snowflake) -> ServiceResult<LeaderboardEntry> {
        let repo = self.ctx.leaderboard_repo();
        let observed = repo.ensure(member_id).await?.revision;
        let counts = repo.activity(member_id).await?;
        let score = self.ctx.aggregator().score(&counts);

        let entry = repo.save_computed(member_id, &counts, score, observed).await?;
        debug!(member_id = %member_id, score, revision = observed, "Score recomputed");
        Ok(entry)
    }

    /// Flag entries stale, then settle them
    #[instrument(skip(self))]
    pub async fn mark_stale(&self, member_ids: &[Snowflake]) -> ServiceResult<()> {
        self.ctx.leaderboard_repo().mark_stale(member_ids).await?;
        self.settle(member_ids).await;
        Ok(())
    }

    /// Eagerly recompute members touched by a committed mutation
    ///
    /// Does nothing in lazy mode. A failed recompute leaves the entry stale
    /// for the next read to heal, so it is logged and dropped.
    pub(crate) async fn settle(&self, member_ids: &[Snowflake]) {
        if !self.ctx.engagement().eager_recompute {
            return;
        }
        for member_id in member_ids {
            match self.recompute(*member_id).await {
                Ok(_) | Err(ServiceError::Domain(DomainError::MemberNotFound(_))) => {}
                Err(err) => {
                    warn!(member_id = %member_id, error = %err, "Eager recompute failed");
                }
            }
        }
    }

    /// Current entry, recomputed first if stale
    #[instrument(skip(self))]
    pub async fn entry(&self, member_id: Snowflake) -> ServiceResult<LeaderboardEntry> {
        let entry = self.ctx.leaderboard_repo().ensure(member_id).await?;
        if entry.is_stale() {
            return self.recompute(member_id).await;
        }
        Ok(entry)
    }

    /// Ranked entries for a scope; `limit` is clamped to 1..=100
    #[instrument(skip(self))]
    pub async fn leaderboard(
        &self,
        scope: LeaderboardScope,
        limit: i64,
    ) -> ServiceResult<Vec<LeaderboardRowResponse>> {
        self.refresh_scope(&scope).await?;

        let rows = self
            .ctx
            .leaderboard_repo()
            .ranked(&scope, limit.clamp(1, MAX_LEADERBOARD_LIMIT))
            .await?;
        Ok(rows.into_iter().map(LeaderboardRowResponse::from).collect())
    }

    /// A member's fresh entry and position within `scope`
    #[instrument(skip(self))]
    pub async fn standing(
        &self,
        member_id: Snowflake,
        scope: LeaderboardScope,
    ) -> ServiceResult<StandingResponse> {
        self.refresh_scope(&scope).await?;
        let entry = self.entry(member_id).await?;
        let rank = self.ctx.leaderboard_repo().rank(member_id, &scope).await?;
        Ok(StandingResponse::new(rank, &entry))
    }

    /// Recompute every stale or missing entry in scope
    async fn refresh_scope(&self, scope: &LeaderboardScope) -> ServiceResult<()> {
        let stale = self.ctx.leaderboard_repo().stale_members(scope).await?;
        if !stale.is_empty() {
            debug!(count = stale.len(), "Refreshing stale leaderboard entries");
        }
        for member_id in stale {
            self.recompute(member_id).await?;
        }
        Ok(())
    }
}
