//! PostgreSQL implementation of ShoutOutRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use brag_core::entities::{AdminAction, ContentRemoval, ShoutOut};
use brag_core::error::DomainError;
use brag_core::traits::{RepoResult, ShoutOutRepository};
use brag_core::value_objects::Snowflake;

use crate::mappers::raw_ids;
use crate::models::ShoutOutModel;

use super::cascade::{bump_revisions, delete_shoutout_tree, insert_admin_action};
use super::error::{map_db_error, map_fk_violation};

/// PostgreSQL implementation of ShoutOutRepository
#[derive(Clone)]
pub struct PgShoutOutRepository {
    pool: PgPool,
}

impl PgShoutOutRepository {
    /// Create a new PgShoutOutRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShoutOutRepository for PgShoutOutRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ShoutOut>> {
        let result = sqlx::query_as::<_, ShoutOutModel>(
            r#"
            SELECT s.id, s.author_id, s.message, s.created_at, s.edited_at, s.edit_count,
                   ARRAY(SELECT r.member_id FROM shoutout_recipients r
                         WHERE r.shoutout_id = s.id ORDER BY r.position) AS recipients,
                   ARRAY(SELECT m.media_ref FROM shoutout_media m
                         WHERE m.shoutout_id = s.id ORDER BY m.position) AS media
            FROM shoutouts s
            WHERE s.id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ShoutOut::from))
    }

    #[instrument(skip(self, shoutout), fields(shoutout_id = %shoutout.id))]
    async fn create(&self, shoutout: &ShoutOut) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO shoutouts (id, author_id, message, created_at, edited_at, edit_count)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(shoutout.id.into_inner())
        .bind(shoutout.author_id.into_inner())
        .bind(&shoutout.message)
        .bind(shoutout.created_at)
        .bind(shoutout.edited_at)
        .bind(shoutout.edit_count)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_fk_violation(e, || DomainError::MemberNotFound(shoutout.author_id)))?;

        if !shoutout.recipients.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO shoutout_recipients (shoutout_id, member_id, position)
                SELECT $1, t.member_id, (t.ord - 1)::INTEGER
                FROM UNNEST($2::BIGINT[]) WITH ORDINALITY AS t(member_id, ord)
                "#,
            )
            .bind(shoutout.id.into_inner())
            .bind(raw_ids(&shoutout.recipients))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_fk_violation(e, || {
                    DomainError::ValidationError("tagged member does not exist".to_string())
                })
            })?;
        }

        if !shoutout.media.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO shoutout_media (shoutout_id, position, media_ref)
                SELECT $1, (t.ord - 1)::INTEGER, t.media_ref
                FROM UNNEST($2::TEXT[]) WITH ORDINALITY AS t(media_ref, ord)
                "#,
            )
            .bind(shoutout.id.into_inner())
            .bind(&shoutout.media)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        let mut stale = shoutout.recipients.clone();
        stale.push(shoutout.author_id);
        bump_revisions(&mut tx, &stale).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, shoutout), fields(shoutout_id = %shoutout.id))]
    async fn update_message(&self, shoutout: &ShoutOut, max_edits: i32) -> RepoResult<i32> {
        let edit_count: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE shoutouts
            SET message = $2, edited_at = $3, edit_count = edit_count + 1
            WHERE id = $1 AND edit_count < $4
            RETURNING edit_count
            "#,
        )
        .bind(shoutout.id.into_inner())
        .bind(&shoutout.message)
        .bind(shoutout.edited_at)
        .bind(max_edits)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        if let Some(count) = edit_count {
            return Ok(count);
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM shoutouts WHERE id = $1)")
                .bind(shoutout.id.into_inner())
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;
        if exists {
            Err(DomainError::EditLimitReached { max: max_edits })
        } else {
            Err(DomainError::ShoutOutNotFound(shoutout.id))
        }
    }

    #[instrument(skip(self, audit))]
    async fn delete_cascade(
        &self,
        id: Snowflake,
        audit: Option<&AdminAction>,
    ) -> RepoResult<ContentRemoval> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let (removal, _author) = delete_shoutout_tree(&mut tx, id)
            .await?
            .ok_or(DomainError::ShoutOutNotFound(id))?;
        if let Some(action) = audit {
            insert_admin_action(&mut tx, action).await?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(removal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgShoutOutRepository>();
    }
}
