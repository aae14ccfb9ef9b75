//! PostgreSQL implementation of AdminActionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use brag_core::entities::AdminAction;
use brag_core::traits::{AdminActionRepository, RepoResult};

use crate::models::AdminActionModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AdminActionRepository
#[derive(Clone)]
pub struct PgAdminActionRepository {
    pool: PgPool,
}

impl PgAdminActionRepository {
    /// Create a new PgAdminActionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminActionRepository for PgAdminActionRepository {
    #[instrument(skip(self))]
    async fn list(&self, limit: i64) -> RepoResult<Vec<AdminAction>> {
        let results = sqlx::query_as::<_, AdminActionModel>(
            r#"
            SELECT id, admin_id, action, target_type, target_id, report_id, created_at
            FROM admin_actions
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(AdminAction::try_from).collect()
    }
}
