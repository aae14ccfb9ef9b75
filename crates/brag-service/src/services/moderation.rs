//! Moderation service
//!
//! Member reports on shout-outs and comments, and the admin decisions that
//! close them.

use brag_core::entities::{
    ContentTarget, EventKey, NotificationKind, Report, ReportStats, ReportStatus, ResolveAction,
};
use brag_core::traits::{ReportQuery, ResolveCommand};
use brag_core::{Actor, DomainError, Snowflake};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{AdminActionResponse, CreateReportRequest, ReportResponse, ResolveReportRequest};

use super::content::content_author;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notification::{NotificationRequest, NotificationService};
use super::score::ScoreService;

/// Largest page for report and audit listings
pub const MAX_LISTING_LIMIT: i64 = 100;

/// Moderation service
pub struct ModerationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ModerationService<'a> {
    /// Create a new ModerationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// File a report; one open report per reporter and target
    #[instrument(skip(self, request))]
    pub async fn create_report(
        &self,
        actor: Actor,
        request: CreateReportRequest,
    ) -> ServiceResult<ReportResponse> {
        request.validate()?;
        let reason = request.reason.trim();
        if reason.is_empty() {
            return Err(ServiceError::validation("Reason must not be empty"));
        }

        let target = request.target();
        content_author(self.ctx, target).await?;

        if self
            .ctx
            .report_repo()
            .find_pending(actor.id, target)
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateReport(target).into());
        }

        let report = Report::new(self.ctx.generate_id(), target, actor.id, reason.to_string());
        self.ctx.report_repo().create(&report).await?;

        info!(report_id = %report.id, target = %target, "Report filed");
        Ok(ReportResponse::from(&report))
    }

    /// Close a pending report by removing the content or dismissing it
    #[instrument(skip(self, request))]
    pub async fn resolve(
        &self,
        admin: Actor,
        report_id: Snowflake,
        request: ResolveReportRequest,
    ) -> ServiceResult<ReportResponse> {
        require_admin(admin)?;
        request.validate()?;
        let action: ResolveAction = request.action.parse()?;

        let outcome = self
            .ctx
            .report_repo()
            .resolve(&ResolveCommand {
                report_id,
                admin_id: admin.id,
                action,
                note: request.note.filter(|n| !n.trim().is_empty()),
                audit_id: self.ctx.generate_id(),
            })
            .await?;

        let report = outcome.report;
        info!(
            report_id = %report_id,
            status = report.status.as_str(),
            comments_removed = outcome.removal.comments_removed,
            reactions_removed = outcome.removal.reactions_removed,
            "Report closed"
        );

        ScoreService::new(self.ctx)
            .settle(&outcome.removal.affected_members)
            .await;

        if action == ResolveAction::Remove {
            if let Some(author) = outcome.content_author {
                let request = NotificationRequest::new(
                    author,
                    admin.id,
                    NotificationKind::Moderation,
                    EventKey::moderation(report.id),
                    format!("your {} was removed by a moderator", target_noun(report.target)),
                );
                NotificationService::new(self.ctx).dispatch(vec![request]).await;
            }
        }

        Ok(ReportResponse::from(&report))
    }

    /// Reports, newest first, optionally filtered by status
    #[instrument(skip(self))]
    pub async fn list_reports(
        &self,
        admin: Actor,
        status: Option<&str>,
        limit: i64,
    ) -> ServiceResult<Vec<ReportResponse>> {
        require_admin(admin)?;
        let status = status.map(str::parse::<ReportStatus>).transpose()?;

        let reports = self
            .ctx
            .report_repo()
            .list(&ReportQuery {
                status,
                limit: limit.clamp(1, MAX_LISTING_LIMIT),
            })
            .await?;
        Ok(reports.iter().map(ReportResponse::from).collect())
    }

    /// Report counts per status
    #[instrument(skip(self))]
    pub async fn report_stats(&self, admin: Actor) -> ServiceResult<ReportStats> {
        require_admin(admin)?;
        Ok(self.ctx.report_repo().stats().await?)
    }

    /// Admin log, newest first
    #[instrument(skip(self))]
    pub async fn list_admin_actions(
        &self,
        admin: Actor,
        limit: i64,
    ) -> ServiceResult<Vec<AdminActionResponse>> {
        require_admin(admin)?;
        let actions = self
            .ctx
            .admin_action_repo()
            .list(limit.clamp(1, MAX_LISTING_LIMIT))
            .await?;
        Ok(actions.iter().map(AdminActionResponse::from).collect())
    }
}

fn require_admin(actor: Actor) -> ServiceResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(DomainError::AdminRequired.into())
    }
}

fn target_noun(target: ContentTarget) -> &'static str {
    match target {
        ContentTarget::ShoutOut(_) => "shout-out",
        ContentTarget::Comment(_) => "comment",
    }
}
