//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use brag_core::entities::{
    Reaction, ReactionCount, ReactionKind, ReactionTarget, ReactionToggle, ToggleState,
};
use brag_core::error::DomainError;
use brag_core::traits::{ReactionRepository, RepoResult};
use brag_core::value_objects::Snowflake;

use crate::models::{ReactionCountModel, ReactionModel};

use super::cascade::{bump_revisions, content_author};
use super::error::map_db_error;

/// Attempts before giving up on a toggle that keeps losing insert races
const TOGGLE_ATTEMPTS: usize = 3;

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn toggle(
        &self,
        target: ReactionTarget,
        member_id: Snowflake,
        kind: ReactionKind,
        new_id: Snowflake,
    ) -> RepoResult<ReactionToggle> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let owner = content_author(&mut tx, target)
            .await?
            .ok_or(match target {
                ReactionTarget::ShoutOut(id) => DomainError::ShoutOutNotFound(id),
                ReactionTarget::Comment(id) => DomainError::CommentNotFound(id),
            })?;

        // One toggle at a time per (target, member); released on commit
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("reaction:{}:{}:{}", target.kind_str(), target.id(), member_id))
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let mut outcome = None;
        for _ in 0..TOGGLE_ATTEMPTS {
            let existing = sqlx::query_as::<_, ReactionModel>(
                r#"
                SELECT id, target_type, target_id, member_id, kind, created_at, updated_at
                FROM reactions
                WHERE target_type = $1 AND target_id = $2 AND member_id = $3
                FOR UPDATE
                "#,
            )
            .bind(target.kind_str())
            .bind(target.id().into_inner())
            .bind(member_id.into_inner())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?
            .map(Reaction::try_from)
            .transpose()?;

            let previous = existing.as_ref().map(|r| r.kind);
            let state = ToggleState::decide(previous, kind);

            let reaction = match (state, existing) {
                (ToggleState::Added, _) => {
                    let inserted = sqlx::query_as::<_, ReactionModel>(
                        r#"
                        INSERT INTO reactions (id, target_type, target_id, member_id, kind)
                        VALUES ($1, $2, $3, $4, $5)
                        ON CONFLICT (target_type, target_id, member_id) DO NOTHING
                        RETURNING id, target_type, target_id, member_id, kind, created_at, updated_at
                        "#,
                    )
                    .bind(new_id.into_inner())
                    .bind(target.kind_str())
                    .bind(target.id().into_inner())
                    .bind(member_id.into_inner())
                    .bind(kind.as_str())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(map_db_error)?;

                    match inserted {
                        Some(model) => Reaction::try_from(model)?,
                        None => {
                            // A concurrent request created the row first
                            debug!("Reaction insert lost a race, re-reading");
                            continue;
                        }
                    }
                }
                (ToggleState::Changed, Some(current)) => {
                    let model = sqlx::query_as::<_, ReactionModel>(
                        r#"
                        UPDATE reactions SET kind = $2, updated_at = NOW()
                        WHERE id = $1
                        RETURNING id, target_type, target_id, member_id, kind, created_at, updated_at
                        "#,
                    )
                    .bind(current.id.into_inner())
                    .bind(kind.as_str())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
                    Reaction::try_from(model)?
                }
                (ToggleState::Removed, Some(current)) => {
                    sqlx::query("DELETE FROM reactions WHERE id = $1")
                        .bind(current.id.into_inner())
                        .execute(&mut *tx)
                        .await
                        .map_err(map_db_error)?;
                    current
                }
                (_, None) => {
                    return Err(DomainError::InternalError(
                        "reaction toggle lost its row".to_string(),
                    ))
                }
            };

            outcome = Some(ReactionToggle {
                state,
                reaction,
                previous,
                target_owner: owner,
            });
            break;
        }

        let toggle = outcome.ok_or_else(|| {
            DomainError::InternalError("reaction toggle did not settle".to_string())
        })?;

        bump_revisions(&mut tx, &[owner, member_id]).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(toggle)
    }

    #[instrument(skip(self))]
    async fn counts(&self, target: ReactionTarget) -> RepoResult<Vec<ReactionCount>> {
        let results = sqlx::query_as::<_, ReactionCountModel>(
            r#"
            SELECT kind, COUNT(*) AS count
            FROM reactions
            WHERE target_type = $1 AND target_id = $2
            GROUP BY kind
            ORDER BY count DESC, kind
            "#,
        )
        .bind(target.kind_str())
        .bind(target.id().into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(ReactionCount::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_kind(
        &self,
        target: ReactionTarget,
        member_id: Snowflake,
    ) -> RepoResult<Option<ReactionKind>> {
        let kind = sqlx::query_scalar::<_, String>(
            r#"
            SELECT kind FROM reactions
            WHERE target_type = $1 AND target_id = $2 AND member_id = $3
            "#,
        )
        .bind(target.kind_str())
        .bind(target.id().into_inner())
        .bind(member_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        kind.map(|k| {
            k.parse()
                .map_err(|_| DomainError::DatabaseError(format!("unknown reaction type: {k}")))
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgReactionRepository>();
    }
}
