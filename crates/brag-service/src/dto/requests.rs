//! Request DTOs for engine operations
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Services trim bodies and enforce the non-blank rule after validation.

use brag_core::entities::{ContentTarget, Role};
use brag_core::Snowflake;
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Member Requests
// ============================================================================

/// Member onboarding request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterMemberRequest {
    #[validate(length(min = 1, max = 64, message = "Display name must be 1-64 characters"))]
    pub display_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 64, message = "Department must be 1-64 characters"))]
    pub department: String,

    /// Defaults to employee
    pub role: Option<Role>,
}

// ============================================================================
// Shout-out Requests
// ============================================================================

/// Post a shout-out
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateShoutOutRequest {
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,

    #[validate(length(max = 50, message = "At most 50 colleagues can be tagged"))]
    #[serde(default)]
    pub recipient_ids: Vec<Snowflake>,

    /// Opaque media references issued by blob storage
    #[validate(length(max = 10, message = "At most 10 attachments"))]
    #[serde(default)]
    pub media: Vec<String>,
}

/// Edit a shout-out message
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditShoutOutRequest {
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,
}

// ============================================================================
// Comment Requests
// ============================================================================

/// Add a comment or reply
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub body: String,

    /// Comment being replied to, in the same thread
    pub parent_id: Option<Snowflake>,
}

/// Edit a comment body
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub body: String,
}

// ============================================================================
// Moderation Requests
// ============================================================================

/// Content types a report can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTargetType {
    #[serde(alias = "shout_out")]
    ShoutOut,
    Comment,
}

/// File a report
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReportRequest {
    pub target_type: ReportTargetType,

    pub target_id: Snowflake,

    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,
}

impl CreateReportRequest {
    pub fn target(&self) -> ContentTarget {
        match self.target_type {
            ReportTargetType::ShoutOut => ContentTarget::ShoutOut(self.target_id),
            ReportTargetType::Comment => ContentTarget::Comment(self.target_id),
        }
    }
}

/// Close a report
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResolveReportRequest {
    /// `remove` or `dismiss`
    pub action: String,

    #[validate(length(max = 1000, message = "Note must be at most 1000 characters"))]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_request_parses_target() {
        let request: CreateReportRequest = serde_json::from_str(
            r#"{"target_type":"shoutout","target_id":"42","reason":"spam"}"#,
        )
        .unwrap();
        assert_eq!(request.target(), ContentTarget::ShoutOut(Snowflake::new(42)));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_shoutout_request_defaults_and_limits() {
        let request: CreateShoutOutRequest =
            serde_json::from_str(r#"{"message":"thanks!"}"#).unwrap();
        assert!(request.recipient_ids.is_empty());
        assert!(request.validate().is_ok());

        let empty: CreateShoutOutRequest = serde_json::from_str(r#"{"message":""}"#).unwrap();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let request = RegisterMemberRequest {
            display_name: "Ada".into(),
            email: "not-an-email".into(),
            department: "Eng".into(),
            role: None,
        };
        assert!(request.validate().is_err());
    }
}
