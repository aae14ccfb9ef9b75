//! Data transfer objects for engine requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for engine inputs
//! - Response DTOs for serializing engine outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateCommentRequest, CreateReportRequest, CreateShoutOutRequest, EditCommentRequest,
    EditShoutOutRequest, RegisterMemberRequest, ReportTargetType, ResolveReportRequest,
};

pub use responses::{
    AdminActionResponse, CommentNodeResponse, CommentResponse, DeleteCommentResponse,
    DeleteShoutOutResponse, LeaderboardRowResponse, MemberResponse, NotificationResponse,
    ReactionCountResponse, ReactionToggleResponse, ReportResponse, ShoutOutResponse,
    StandingResponse,
};
