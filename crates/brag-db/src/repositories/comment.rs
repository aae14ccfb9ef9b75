//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use brag_core::entities::{AdminAction, Comment, ContentRemoval};
use brag_core::error::DomainError;
use brag_core::traits::{CommentRepository, RepoResult};
use brag_core::value_objects::Snowflake;

use crate::models::CommentModel;

use super::cascade::{bump_revisions, delete_comment_subtree, insert_admin_action};
use super::error::map_db_error;

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    /// Create a new PgCommentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT id, shoutout_id, author_id, parent_id, body, created_at, edited_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Comment::from))
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Share locks keep the shout-out and parent alive until commit
        let owner = sqlx::query_scalar::<_, i64>(
            "SELECT author_id FROM shoutouts WHERE id = $1 FOR SHARE",
        )
        .bind(comment.shoutout_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::ShoutOutNotFound(comment.shoutout_id))?;

        if let Some(parent_id) = comment.parent_id {
            let parent_thread = sqlx::query_scalar::<_, i64>(
                "SELECT shoutout_id FROM comments WHERE id = $1 FOR SHARE",
            )
            .bind(parent_id.into_inner())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?
            .ok_or(DomainError::CommentNotFound(parent_id))?;

            if parent_thread != comment.shoutout_id.into_inner() {
                return Err(DomainError::CrossThreadParent { parent: parent_id });
            }
        }

        sqlx::query(
            r#"
            INSERT INTO comments (id, shoutout_id, author_id, parent_id, body, created_at, edited_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(comment.id.into_inner())
        .bind(comment.shoutout_id.into_inner())
        .bind(comment.author_id.into_inner())
        .bind(comment.parent_id.map(Snowflake::into_inner))
        .bind(&comment.body)
        .bind(comment.created_at)
        .bind(comment.edited_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        bump_revisions(&mut tx, &[Snowflake::new(owner)]).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn update_body(&self, comment: &Comment) -> RepoResult<()> {
        let result = sqlx::query("UPDATE comments SET body = $2, edited_at = $3 WHERE id = $1")
            .bind(comment.id.into_inner())
            .bind(&comment.body)
            .bind(comment.edited_at)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CommentNotFound(comment.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_by_shoutout(&self, shoutout_id: Snowflake) -> RepoResult<Vec<Comment>> {
        let results = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT id, shoutout_id, author_id, parent_id, body, created_at, edited_at
            FROM comments
            WHERE shoutout_id = $1
            ORDER BY id
            "#,
        )
        .bind(shoutout_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self, audit))]
    async fn delete_subtree(
        &self,
        id: Snowflake,
        audit: Option<&AdminAction>,
    ) -> RepoResult<ContentRemoval> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let (removal, _author) = delete_comment_subtree(&mut tx, id)
            .await?
            .ok_or(DomainError::CommentNotFound(id))?;
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
        assert_send_sync::<PgCommentRepository>();
    }
}
