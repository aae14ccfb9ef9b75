//! Engagement services
//!
//! Each service borrows a [`ServiceContext`] and orchestrates one area of
//! the engine: validation, permission checks, the store call, then
//! notification fan-out and score settlement after commit.

pub mod comment;
mod content;
pub mod context;
pub mod error;
pub mod member;
pub mod moderation;
pub mod notification;
pub mod reaction;
pub mod score;
pub mod shoutout;

pub use comment::CommentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use member::MemberService;
pub use moderation::ModerationService;
pub use notification::{DispatchOutcome, NotificationRequest, NotificationService, NotifyError};
pub use reaction::ReactionService;
pub use score::{ScoreAggregator, ScoreService};
pub use shoutout::ShoutOutService;
