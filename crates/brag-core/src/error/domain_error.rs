//! Domain errors - error types for the engagement engine

use thiserror::Error;

use crate::entities::{ReportStatus, ContentTarget};
use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Member not found: {0}")]
    MemberNotFound(Snowflake),

    #[error("Shout-out not found: {0}")]
    ShoutOutNotFound(Snowflake),

    #[error("Comment not found: {0}")]
    CommentNotFound(Snowflake),

    #[error("Report not found: {0}")]
    ReportNotFound(Snowflake),

    #[error("Notification not found: {0}")]
    NotificationNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid reaction type: {0}")]
    InvalidReactionKind(String),

    #[error("Parent comment {parent} belongs to a different shout-out")]
    CrossThreadParent { parent: Snowflake },

    #[error("Body must not be empty")]
    EmptyBody,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Edit limit reached: at most {max} edits")]
    EditLimitReached { max: i32 },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Only the author may do this")]
    NotAuthor,

    #[error("Admin role required")]
    AdminRequired,

    #[error("Notification belongs to another member")]
    NotRecipient,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Report {id} is already {status}")]
    ReportAlreadyClosed { id: Snowflake, status: ReportStatus },

    #[error("A pending report already exists for {0}")]
    DuplicateReport(ContentTarget),

    // =========================================================================
    // Feature Flags
    // =========================================================================
    #[error("Feature disabled: {0}")]
    FeatureDisabled(&'static str),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::ShoutOutNotFound(_) => "UNKNOWN_SHOUTOUT",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::ReportNotFound(_) => "UNKNOWN_REPORT",
            Self::NotificationNotFound(_) => "UNKNOWN_NOTIFICATION",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidReactionKind(_) => "INVALID_REACTION_TYPE",
            Self::CrossThreadParent { .. } => "CROSS_THREAD_PARENT",
            Self::EmptyBody => "EMPTY_BODY",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::EditLimitReached { .. } => "EDIT_LIMIT_REACHED",

            // Authorization
            Self::NotAuthor => "NOT_AUTHOR",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::NotRecipient => "NOT_RECIPIENT",

            // Conflict
            Self::ReportAlreadyClosed { .. } => "REPORT_ALREADY_CLOSED",
            Self::DuplicateReport(_) => "DUPLICATE_REPORT",

            Self::FeatureDisabled(_) => "FEATURE_DISABLED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MemberNotFound(_)
                | Self::ShoutOutNotFound(_)
                | Self::CommentNotFound(_)
                | Self::ReportNotFound(_)
                | Self::NotificationNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidReactionKind(_)
                | Self::CrossThreadParent { .. }
                | Self::EmptyBody
                | Self::ContentTooLong { .. }
                | Self::EditLimitReached { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotAuthor | Self::AdminRequired | Self::NotRecipient)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::ReportAlreadyClosed { .. } | Self::DuplicateReport(_)
        )
    }

    pub fn is_feature_disabled(&self) -> bool {
        matches!(self, Self::FeatureDisabled(_))
    }
}
