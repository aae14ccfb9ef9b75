//! Report entity - moderation request with a PENDING → terminal state machine

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

use super::target::ContentTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            "dismissed" => Ok(Self::Dismissed),
            other => Err(DomainError::ValidationError(format!(
                "unknown report status: {other}"
            ))),
        }
    }
}

/// Admin decision on a pending report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveAction {
    /// Delete the reported content and close as resolved
    Remove,
    /// Close without touching content
    Dismiss,
}

impl ResolveAction {
    pub fn resulting_status(&self) -> ReportStatus {
        match self {
            Self::Remove => ReportStatus::Resolved,
            Self::Dismiss => ReportStatus::Dismissed,
        }
    }
}

impl FromStr for ResolveAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remove" | "resolve" => Ok(Self::Remove),
            "dismiss" => Ok(Self::Dismiss),
            other => Err(DomainError::ValidationError(format!(
                "unknown resolve action: {other}"
            ))),
        }
    }
}

/// Report entity
///
/// The target is stored as type + id without a foreign key so a resolved
/// report survives the removal of the content it flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: Snowflake,
    pub target: ContentTarget,
    pub reporter_id: Snowflake,
    pub reason: String,
    pub status: ReportStatus,
    pub resolved_by: Option<Snowflake>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(id: Snowflake, target: ContentTarget, reporter_id: Snowflake, reason: String) -> Self {
        Self {
            id,
            target,
            reporter_id,
            reason,
            status: ReportStatus::Pending,
            resolved_by: None,
            resolved_at: None,
            resolution_note: None,
            created_at: Utc::now(),
        }
    }

    /// Apply an admin decision; terminal reports reject any further transition
    pub fn close(
        &mut self,
        admin_id: Snowflake,
        action: ResolveAction,
        note: Option<String>,
    ) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::ReportAlreadyClosed {
                id: self.id,
                status: self.status,
            });
        }
        self.status = action.resulting_status();
        self.resolved_by = Some(admin_id);
        self.resolved_at = Some(Utc::now());
        self.resolution_note = note;
        Ok(())
    }
}

/// Report counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    pub total: i64,
    pub pending: i64,
    pub resolved: i64,
    pub dismissed: i64,
}

impl ReportStats {
    pub fn from_counts(counts: impl IntoIterator<Item = (ReportStatus, i64)>) -> Self {
        let mut stats = Self::default();
        for (status, n) in counts {
            match status {
                ReportStatus::Pending => stats.pending += n,
                ReportStatus::Resolved => stats.resolved += n,
                ReportStatus::Dismissed => stats.dismissed += n,
            }
            stats.total += n;
        }
        stats
    }
}
