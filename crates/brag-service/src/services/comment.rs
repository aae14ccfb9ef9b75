//! Comment service
//!
//! Nested comment threads on shout-outs: add, edit, delete with subtree
//! removal, and forest assembly for display.

use brag_core::entities::{
    normalize_body, AdminAction, AdminActionKind, Comment, CommentNode, ContentTarget, EventKey,
    NotificationKind,
};
use brag_core::{Actor, DomainError, Snowflake};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{
    CommentNodeResponse, CommentResponse, CreateCommentRequest, DeleteCommentResponse,
    EditCommentRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::notification::{NotificationRequest, NotificationService};
use super::score::ScoreService;

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    /// Create a new CommentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add a comment, or a reply when `parent_id` is set
    #[instrument(skip(self, request))]
    pub async fn add_comment(
        &self,
        actor: Actor,
        shoutout_id: Snowflake,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        if !self.ctx.engagement().comments_enabled {
            return Err(DomainError::FeatureDisabled("comments").into());
        }
        request.validate()?;
        let body = normalize_body(&request.body)?;

        let shoutout = self
            .ctx
            .shoutout_repo()
            .find_by_id(shoutout_id)
            .await?
            .ok_or(DomainError::ShoutOutNotFound(shoutout_id))?;

        let parent = match request.parent_id {
            Some(parent_id) => {
                let parent = self
                    .ctx
                    .comment_repo()
                    .find_by_id(parent_id)
                    .await?
                    .ok_or(DomainError::CommentNotFound(parent_id))?;
                if parent.shoutout_id != shoutout_id {
                    return Err(DomainError::CrossThreadParent { parent: parent_id }.into());
                }
                Some(parent)
            }
            None => None,
        };

        let comment = Comment::new(
            self.ctx.generate_id(),
            shoutout_id,
            actor.id,
            parent.as_ref().map(|p| p.id),
            body,
        );
        self.ctx.comment_repo().create(&comment).await?;

        info!(
            comment_id = %comment.id,
            shoutout_id = %shoutout_id,
            parent_id = ?comment.parent_id,
            "Comment added"
        );

        let mut requests = vec![NotificationRequest::new(
            shoutout.author_id,
            actor.id,
            NotificationKind::Comment,
            EventKey::comment(comment.id),
            "commented on your shout-out",
        )
        .shoutout(shoutout_id)
        .comment(comment.id)];

        if let Some(parent) = &parent {
            // The owner already hears about this comment
            let reply_target = parent.author_id != shoutout.author_id;
            if self.ctx.engagement().notify_reply_author && reply_target {
                requests.push(
                    NotificationRequest::new(
                        parent.author_id,
                        actor.id,
                        NotificationKind::Reply,
                        EventKey::reply(comment.id),
                        "replied to your comment",
                    )
                    .shoutout(shoutout_id)
                    .comment(comment.id),
                );
            }
        }

        NotificationService::new(self.ctx).dispatch(requests).await;
        ScoreService::new(self.ctx).settle(&[shoutout.author_id]).await;

        Ok(CommentResponse::from(&comment))
    }

    /// Replace the body of the actor's own comment
    #[instrument(skip(self, request))]
    pub async fn edit_comment(
        &self,
        actor: Actor,
        comment_id: Snowflake,
        request: EditCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        request.validate()?;
        let body = normalize_body(&request.body)?;

        let mut comment = self.find(comment_id).await?;
        if comment.author_id != actor.id {
            return Err(DomainError::NotAuthor.into());
        }

        comment.edit(body);
        self.ctx.comment_repo().update_body(&comment).await?;

        info!(comment_id = %comment_id, "Comment edited");
        Ok(CommentResponse::from(&comment))
    }

    /// Delete a comment and all of its replies
    ///
    /// Allowed for the author and for admins; an admin removing someone
    /// else's comment is recorded in the admin log.
    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        actor: Actor,
        comment_id: Snowflake,
    ) -> ServiceResult<DeleteCommentResponse> {
        let comment = self.find(comment_id).await?;
        if !actor.owns_or_admin(comment.author_id) {
            return Err(DomainError::NotAuthor.into());
        }

        let audit = (comment.author_id != actor.id).then(|| {
            AdminAction::new(
                self.ctx.generate_id(),
                actor.id,
                AdminActionKind::DeleteComment,
                ContentTarget::Comment(comment_id),
                None,
            )
        });

        let removal = self
            .ctx
            .comment_repo()
            .delete_subtree(comment_id, audit.as_ref())
            .await?;

        info!(
            comment_id = %comment_id,
            comments_removed = removal.comments_removed,
            reactions_removed = removal.reactions_removed,
            "Comment subtree deleted"
        );

        ScoreService::new(self.ctx).settle(&removal.affected_members).await;

        Ok(DeleteCommentResponse {
            removed_count: removal.comments_removed,
            reactions_removed: removal.reactions_removed,
        })
    }

    /// The comment forest of a shout-out
    #[instrument(skip(self))]
    pub async fn list_thread(&self, shoutout_id: Snowflake) -> ServiceResult<Vec<CommentNodeResponse>> {
        if self.ctx.shoutout_repo().find_by_id(shoutout_id).await?.is_none() {
            return Err(DomainError::ShoutOutNotFound(shoutout_id).into());
        }

        let comments = self.ctx.comment_repo().list_by_shoutout(shoutout_id).await?;
        Ok(CommentNode::build_forest(comments)
            .iter()
            .map(CommentNodeResponse::from)
            .collect())
    }

    async fn find(&self, comment_id: Snowflake) -> ServiceResult<Comment> {
        Ok(self
            .ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))?)
    }
}
