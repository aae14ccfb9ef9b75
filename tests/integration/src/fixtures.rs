//! Test fixtures and request builders
//!
//! Provides reusable request payloads for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use brag_core::{ContentTarget, Role, Snowflake};
use brag_service::dto::{
    CreateCommentRequest, CreateReportRequest, CreateShoutOutRequest, EditCommentRequest,
    EditShoutOutRequest, RegisterMemberRequest, ReportTargetType, ResolveReportRequest,
};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub fn register_request(department: &str, role: Role) -> RegisterMemberRequest {
    let suffix = unique_suffix();
    RegisterMemberRequest {
        display_name: format!("Member {suffix}"),
        email: format!("member{suffix}@example.com"),
        department: department.to_string(),
        role: Some(role),
    }
}

pub fn shoutout_request(message: &str, recipients: &[Snowflake]) -> CreateShoutOutRequest {
    CreateShoutOutRequest {
        message: message.to_string(),
        recipient_ids: recipients.to_vec(),
        media: Vec::new(),
    }
}

pub fn edit_shoutout_request(message: &str) -> EditShoutOutRequest {
    EditShoutOutRequest {
        message: message.to_string(),
    }
}

pub fn comment_request(body: &str) -> CreateCommentRequest {
    CreateCommentRequest {
        body: body.to_string(),
        parent_id: None,
    }
}

pub fn reply_request(body: &str, parent_id: Snowflake) -> CreateCommentRequest {
    CreateCommentRequest {
        body: body.to_string(),
        parent_id: Some(parent_id),
    }
}

pub fn edit_comment_request(body: &str) -> EditCommentRequest {
    EditCommentRequest {
        body: body.to_string(),
    }
}

pub fn report_request(target: ContentTarget, reason: &str) -> CreateReportRequest {
    let target_type = match target {
        ContentTarget::ShoutOut(_) => ReportTargetType::ShoutOut,
        ContentTarget::Comment(_) => ReportTargetType::Comment,
    };
    CreateReportRequest {
        target_type,
        target_id: target.id(),
        reason: reason.to_string(),
    }
}

pub fn resolve_request(action: &str) -> ResolveReportRequest {
    ResolveReportRequest {
        action: action.to_string(),
        note: None,
    }
}
