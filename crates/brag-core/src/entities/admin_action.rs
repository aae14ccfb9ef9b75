//! Admin audit log entry

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

use super::target::ContentTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminActionKind {
    ResolveRemove,
    Dismiss,
    DeleteShoutOut,
    DeleteComment,
}

impl AdminActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResolveRemove => "resolve_remove",
            Self::Dismiss => "dismiss",
            Self::DeleteShoutOut => "delete_shoutout",
            Self::DeleteComment => "delete_comment",
        }
    }
}

impl FromStr for AdminActionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resolve_remove" => Ok(Self::ResolveRemove),
            "dismiss" => Ok(Self::Dismiss),
            "delete_shoutout" => Ok(Self::DeleteShoutOut),
            "delete_comment" => Ok(Self::DeleteComment),
            other => Err(DomainError::DatabaseError(format!(
                "unknown admin action: {other}"
            ))),
        }
    }
}

/// Something an admin did to content, kept for audit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAction {
    pub id: Snowflake,
    pub admin_id: Snowflake,
    pub action: AdminActionKind,
    pub target: ContentTarget,
    pub report_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
}

impl AdminAction {
    pub fn new(
        id: Snowflake,
        admin_id: Snowflake,
        action: AdminActionKind,
        target: ContentTarget,
        report_id: Option<Snowflake>,
    ) -> Self {
        Self {
            id,
            admin_id,
            action,
            target,
            report_id,
            created_at: Utc::now(),
        }
    }
}
