//! PostgreSQL implementation of ReportRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use brag_core::entities::{
    AdminAction, AdminActionKind, ContentRemoval, ContentTarget, Report, ReportStats,
    ResolveAction,
};
use brag_core::error::DomainError;
use brag_core::traits::{RepoResult, ReportQuery, ReportRepository, ResolveCommand, ResolveOutcome};
use brag_core::value_objects::Snowflake;

use crate::mappers::report_stats;
use crate::models::{ReportModel, ReportStatusCountModel};

use super::cascade::{
    content_author, delete_comment_subtree, delete_shoutout_tree, insert_admin_action,
};
use super::error::{map_db_error, map_unique_violation};

const REPORT_COLUMNS: &str = "id, target_type, target_id, reporter_id, reason, status, \
                              resolved_by, resolved_at, resolution_note, created_at";

/// PostgreSQL implementation of ReportRepository
#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    /// Create a new PgReportRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    #[instrument(skip(self, report), fields(report_id = %report.id))]
    async fn create(&self, report: &Report) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reports (id, target_type, target_id, reporter_id, reason, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(report.id.into_inner())
        .bind(report.target.kind_str())
        .bind(report.target.id().into_inner())
        .bind(report.reporter_id.into_inner())
        .bind(&report.reason)
        .bind(report.status.as_str())
        .bind(report.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::DuplicateReport(report.target)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Report>> {
        let result = sqlx::query_as::<_, ReportModel>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Report::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_pending(
        &self,
        reporter_id: Snowflake,
        target: ContentTarget,
    ) -> RepoResult<Option<Report>> {
        let result = sqlx::query_as::<_, ReportModel>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports \
             WHERE reporter_id = $1 AND target_type = $2 AND target_id = $3 AND status = 'pending'"
        ))
        .bind(reporter_id.into_inner())
        .bind(target.kind_str())
        .bind(target.id().into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Report::try_from).transpose()
    }

    #[instrument(skip(self, command), fields(report_id = %command.report_id))]
    async fn resolve(&self, command: &ResolveCommand) -> RepoResult<ResolveOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let mut report = sqlx::query_as::<_, ReportModel>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1 FOR UPDATE"
        ))
        .bind(command.report_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .map(Report::try_from)
        .transpose()?
        .ok_or(DomainError::ReportNotFound(command.report_id))?;

        // Fails on a terminal report; dropping `tx` rolls back
        report.close(command.admin_id, command.action, command.note.clone())?;

        // Close first so the cascade's pending-report sweep leaves this one alone
        sqlx::query(
            r#"
            UPDATE reports
            SET status = $2, resolved_by = $3, resolved_at = $4, resolution_note = $5
            WHERE id = $1
            "#,
        )
        .bind(report.id.into_inner())
        .bind(report.status.as_str())
        .bind(report.resolved_by.map(Snowflake::into_inner))
        .bind(report.resolved_at)
        .bind(report.resolution_note.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let (removal, content_author) = match (command.action, report.target) {
            (ResolveAction::Dismiss, target) => {
                (ContentRemoval::default(), content_author(&mut tx, target).await?)
            }
            (ResolveAction::Remove, ContentTarget::ShoutOut(id)) => {
                split(delete_shoutout_tree(&mut tx, id).await?)
            }
            (ResolveAction::Remove, ContentTarget::Comment(id)) => {
                split(delete_comment_subtree(&mut tx, id).await?)
            }
        };

        let kind = match command.action {
            ResolveAction::Remove => AdminActionKind::ResolveRemove,
            ResolveAction::Dismiss => AdminActionKind::Dismiss,
        };
        let audit = AdminAction::new(
            command.audit_id,
            command.admin_id,
            kind,
            report.target,
            Some(report.id),
        );
        insert_admin_action(&mut tx, &audit).await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(ResolveOutcome {
            report,
            removal,
            content_author,
        })
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &ReportQuery) -> RepoResult<Vec<Report>> {
        let results = sqlx::query_as::<_, ReportModel>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY id DESC LIMIT $2"
        ))
        .bind(query.status.map(|s| s.as_str()))
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Report::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> RepoResult<ReportStats> {
        let rows = sqlx::query_as::<_, ReportStatusCountModel>(
            "SELECT status, COUNT(*) AS count FROM reports GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        report_stats(rows)
    }
}

/// Content already gone still resolves, with nothing removed
fn split(removed: Option<(ContentRemoval, Snowflake)>) -> (ContentRemoval, Option<Snowflake>) {
    match removed {
        Some((removal, author)) => (removal, Some(author)),
        None => (ContentRemoval::default(), None),
    }
}
