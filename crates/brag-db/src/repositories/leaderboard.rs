//! PostgreSQL implementation of LeaderboardRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use brag_core::entities::{ActivityCounts, LeaderboardEntry, LeaderboardScope, RankedEntry};
use brag_core::error::DomainError;
use brag_core::traits::{LeaderboardRepository, RepoResult};
use brag_core::value_objects::Snowflake;

use crate::models::{ActivityCountsModel, LeaderboardEntryModel, RankedEntryModel};

use super::cascade::bump_revisions;
use super::error::{map_db_error, map_fk_violation};

const ENTRY_COLUMNS: &str = "member_id, shoutouts_sent, tags_received, reactions_received, \
                             comments_received, reactions_given, score, revision, \
                             computed_revision, computed_at";

/// PostgreSQL implementation of LeaderboardRepository
#[derive(Clone)]
pub struct PgLeaderboardRepository {
    pool: PgPool,
}

impl PgLeaderboardRepository {
    /// Create a new PgLeaderboardRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, member_id: Snowflake) -> RepoResult<LeaderboardEntry> {
        sqlx::query_as::<_, LeaderboardEntryModel>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM leaderboard_entries WHERE member_id = $1"
        ))
        .bind(member_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .map(LeaderboardEntry::from)
        .ok_or(DomainError::MemberNotFound(member_id))
    }
}

#[async_trait]
impl LeaderboardRepository for PgLeaderboardRepository {
    #[instrument(skip(self))]
    async fn mark_stale(&self, member_ids: &[Snowflake]) -> RepoResult<()> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        bump_revisions(&mut conn, member_ids).await
    }

    #[instrument(skip(self))]
    async fn ensure(&self, member_id: Snowflake) -> RepoResult<LeaderboardEntry> {
        sqlx::query(
            "INSERT INTO leaderboard_entries (member_id) VALUES ($1) ON CONFLICT (member_id) DO NOTHING",
        )
        .bind(member_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::MemberNotFound(member_id)))?;

        self.fetch(member_id).await
    }

    #[instrument(skip(self))]
    async fn activity(&self, member_id: Snowflake) -> RepoResult<ActivityCounts> {
        let counts = sqlx::query_as::<_, ActivityCountsModel>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM shoutouts s WHERE s.author_id = $1) AS shoutouts_sent,
                (SELECT COUNT(*) FROM shoutout_recipients r
                    JOIN shoutouts s ON s.id = r.shoutout_id
                    WHERE r.member_id = $1 AND s.author_id <> $1) AS tags_received,
                (SELECT COUNT(*) FROM reactions x
                    JOIN shoutouts s ON x.target_type = 'shoutout' AND x.target_id = s.id
                    WHERE s.author_id = $1 AND x.member_id <> $1)
                + (SELECT COUNT(*) FROM reactions x
                    JOIN comments c ON x.target_type = 'comment' AND x.target_id = c.id
                    WHERE c.author_id = $1 AND x.member_id <> $1) AS reactions_received,
                (SELECT COUNT(*) FROM comments c
                    JOIN shoutouts s ON s.id = c.shoutout_id
                    WHERE s.author_id = $1 AND c.author_id <> $1) AS comments_received,
                (SELECT COUNT(*) FROM reactions x WHERE x.member_id = $1) AS reactions_given
            "#,
        )
        .bind(member_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(counts.into())
    }

    #[instrument(skip(self, counts))]
    async fn save_computed(
        &self,
        member_id: Snowflake,
        counts: &ActivityCounts,
        score: i64,
        observed_revision: i64,
    ) -> RepoResult<LeaderboardEntry> {
        sqlx::query(
            r#"
            UPDATE leaderboard_entries
            SET shoutouts_sent = $2, tags_received = $3, reactions_received = $4,
                comments_received = $5, reactions_given = $6, score = $7,
                computed_revision = $8, computed_at = NOW()
            WHERE member_id = $1 AND computed_revision <= $8
            "#,
        )
        .bind(member_id.into_inner())
        .bind(counts.shoutouts_sent)
        .bind(counts.tags_received)
        .bind(counts.reactions_received)
        .bind(counts.comments_received)
        .bind(counts.reactions_given)
        .bind(score)
        .bind(observed_revision)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.fetch(member_id).await
    }

    #[instrument(skip(self))]
    async fn stale_members(&self, scope: &LeaderboardScope) -> RepoResult<Vec<Snowflake>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT m.id
            FROM members m
            LEFT JOIN leaderboard_entries e ON e.member_id = m.id
            WHERE NOT m.deleted
              AND ($1::TEXT IS NULL OR m.department = $1)
              AND (e.member_id IS NULL OR e.revision > e.computed_revision)
            ORDER BY m.id
            "#,
        )
        .bind(scope.department())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn ranked(&self, scope: &LeaderboardScope, limit: i64) -> RepoResult<Vec<RankedEntry>> {
        let rows = sqlx::query_as::<_, RankedEntryModel>(
            r#"
            SELECT e.member_id, e.shoutouts_sent, e.tags_received, e.reactions_received,
                   e.comments_received, e.reactions_given, e.score, e.revision,
                   e.computed_revision, e.computed_at,
                   m.display_name, m.department,
                   ROW_NUMBER() OVER (ORDER BY e.score DESC, e.member_id ASC) AS rank
            FROM leaderboard_entries e
            JOIN members m ON m.id = e.member_id
            WHERE NOT m.deleted AND ($1::TEXT IS NULL OR m.department = $1)
            ORDER BY e.score DESC, e.member_id ASC
            LIMIT $2
            "#,
        )
        .bind(scope.department())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(RankedEntry::from).collect())
    }

    #[instrument(skip(self))]
    async fn rank(&self, member_id: Snowflake, scope: &LeaderboardScope) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT 1 + COUNT(*)
            FROM leaderboard_entries e
            JOIN members m ON m.id = e.member_id
            CROSS JOIN (SELECT score FROM leaderboard_entries WHERE member_id = $1) me
            WHERE NOT m.deleted
              AND ($2::TEXT IS NULL OR m.department = $2)
              AND (e.score > me.score OR (e.score = me.score AND e.member_id < $1))
            "#,
        )
        .bind(member_id.into_inner())
        .bind(scope.department())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgLeaderboardRepository>();
    }
}
