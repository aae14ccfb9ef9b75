//! Report entity <-> model mapper

use brag_core::entities::{ContentTarget, Report, ReportStats, ReportStatus};
use brag_core::error::DomainError;
use brag_core::value_objects::Snowflake;

use crate::models::{ReportModel, ReportStatusCountModel};

impl TryFrom<ReportModel> for Report {
    type Error = DomainError;

    fn try_from(model: ReportModel) -> Result<Self, Self::Error> {
        Ok(Report {
            id: Snowflake::new(model.id),
            target: ContentTarget::from_parts(&model.target_type, Snowflake::new(model.target_id))?,
            reporter_id: Snowflake::new(model.reporter_id),
            reason: model.reason,
            status: stored_status(&model.status)?,
            resolved_by: model.resolved_by.map(Snowflake::new),
            resolved_at: model.resolved_at,
            resolution_note: model.resolution_note,
            created_at: model.created_at,
        })
    }
}

/// Fold `GROUP BY status` rows into totals
pub fn report_stats(rows: Vec<ReportStatusCountModel>) -> Result<ReportStats, DomainError> {
    let counts = rows
        .into_iter()
        .map(|row| Ok((stored_status(&row.status)?, row.count)))
        .collect::<Result<Vec<_>, DomainError>>()?;
    Ok(ReportStats::from_counts(counts))
}

fn stored_status(raw: &str) -> Result<ReportStatus, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::DatabaseError(format!("unknown report status: {raw}")))
}
