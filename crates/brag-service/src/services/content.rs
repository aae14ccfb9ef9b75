//! Lookups shared by services that address a shout-out or comment

use brag_core::entities::ContentTarget;
use brag_core::{DomainError, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Author of the targeted content, or the matching not-found error
pub(crate) async fn content_author(
    ctx: &ServiceContext,
    target: ContentTarget,
) -> ServiceResult<Snowflake> {
    let author = match target {
        ContentTarget::ShoutOut(id) => ctx
            .shoutout_repo()
            .find_by_id(id)
            .await?
            .map(|s| s.author_id)
            .ok_or(DomainError::ShoutOutNotFound(id))?,
        ContentTarget::Comment(id) => ctx
            .comment_repo()
            .find_by_id(id)
            .await?
            .map(|c| c.author_id)
            .ok_or(DomainError::CommentNotFound(id))?,
    };
    Ok(author)
}
