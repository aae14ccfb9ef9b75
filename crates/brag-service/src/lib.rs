//! # brag-service
//!
//! Application layer of the engagement engine: the managers for shout-outs,
//! reactions, comments, notifications, moderation, and leaderboard scoring,
//! plus the request and response DTOs they speak.
//!
//! ```ignore
//! let ctx = ServiceContextBuilder::new().store(MemoryStore::new()).build()?;
//! let shoutouts = ShoutOutService::new(&ctx);
//! ```

pub mod dto;
pub mod services;

pub use services::{
    CommentService, DispatchOutcome, MemberService, ModerationService, NotificationRequest,
    NotificationService, NotifyError, ReactionService, ScoreAggregator, ScoreService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, ShoutOutService,
};
