//! Shout-out service
//!
//! Posting, editing, and deleting shout-outs.

use std::collections::HashMap;

use brag_core::entities::{
    normalize_body, AdminAction, AdminActionKind, ContentTarget, EventKey, NotificationKind,
    ShoutOut,
};
use brag_core::{Actor, DomainError, Snowflake};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{
    CreateShoutOutRequest, DeleteShoutOutResponse, EditShoutOutRequest, ShoutOutResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::notification::{NotificationRequest, NotificationService};
use super::score::ScoreService;

/// Shout-out service
pub struct ShoutOutService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ShoutOutService<'a> {
    /// Create a new ShoutOutService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a shout-out and notify every tagged colleague
    #[instrument(skip(self, request))]
    pub async fn create_shoutout(
        &self,
        actor: Actor,
        request: CreateShoutOutRequest,
    ) -> ServiceResult<ShoutOutResponse> {
        request.validate()?;
        let message = normalize_body(&request.message)?;

        let shoutout = ShoutOut::new(
            self.ctx.generate_id(),
            actor.id,
            message,
            request.recipient_ids,
            request.media,
        );
        self.require_active_recipients(&shoutout.recipients).await?;

        self.ctx.shoutout_repo().create(&shoutout).await?;

        info!(
            shoutout_id = %shoutout.id,
            author_id = %actor.id,
            tagged = shoutout.recipients.len(),
            "Shout-out posted"
        );

        let requests = shoutout
            .recipients
            .iter()
            .map(|recipient| {
                NotificationRequest::new(
                    *recipient,
                    actor.id,
                    NotificationKind::Tag,
                    EventKey::tag(shoutout.id),
                    "tagged you in a shout-out",
                )
                .shoutout(shoutout.id)
            })
            .collect();
        NotificationService::new(self.ctx).dispatch(requests).await;

        let mut touched = shoutout.recipients.clone();
        touched.push(actor.id);
        ScoreService::new(self.ctx).settle(&touched).await;

        Ok(ShoutOutResponse::from(&shoutout))
    }

    /// Replace the message of the actor's own shout-out
    #[instrument(skip(self, request))]
    pub async fn edit_shoutout(
        &self,
        actor: Actor,
        shoutout_id: Snowflake,
        request: EditShoutOutRequest,
    ) -> ServiceResult<ShoutOutResponse> {
        request.validate()?;
        let message = normalize_body(&request.message)?;

        let mut shoutout = self.find(shoutout_id).await?;
        if shoutout.author_id != actor.id {
            return Err(DomainError::NotAuthor.into());
        }

        let max = self.ctx.engagement().max_shoutout_edits;
        if shoutout.edit_count >= max {
            return Err(DomainError::EditLimitReached { max }.into());
        }

        shoutout.edit(message);
        shoutout.edit_count = self
            .ctx
            .shoutout_repo()
            .update_message(&shoutout, max)
            .await?;

        info!(shoutout_id = %shoutout_id, edit_count = shoutout.edit_count, "Shout-out edited");
        Ok(ShoutOutResponse::from(&shoutout))
    }

    /// Delete a shout-out with its thread, reactions, and notifications
    #[instrument(skip(self))]
    pub async fn delete_shoutout(
        &self,
        actor: Actor,
        shoutout_id: Snowflake,
    ) -> ServiceResult<DeleteShoutOutResponse> {
        let shoutout = self.find(shoutout_id).await?;
        if !actor.owns_or_admin(shoutout.author_id) {
            return Err(DomainError::NotAuthor.into());
        }

        let audit = (shoutout.author_id != actor.id).then(|| {
            AdminAction::new(
                self.ctx.generate_id(),
                actor.id,
                AdminActionKind::DeleteShoutOut,
                ContentTarget::ShoutOut(shoutout_id),
                None,
            )
        });

        let removal = self
            .ctx
            .shoutout_repo()
            .delete_cascade(shoutout_id, audit.as_ref())
            .await?;

        info!(
            shoutout_id = %shoutout_id,
            comments_removed = removal.comments_removed,
            reactions_removed = removal.reactions_removed,
            "Shout-out deleted"
        );

        ScoreService::new(self.ctx).settle(&removal.affected_members).await;
        Ok(DeleteShoutOutResponse::from(&removal))
    }

    #[instrument(skip(self))]
    pub async fn get_shoutout(&self, shoutout_id: Snowflake) -> ServiceResult<ShoutOutResponse> {
        let shoutout = self.find(shoutout_id).await?;
        Ok(ShoutOutResponse::from(&shoutout))
    }

    async fn find(&self, shoutout_id: Snowflake) -> ServiceResult<ShoutOut> {
        Ok(self
            .ctx
            .shoutout_repo()
            .find_by_id(shoutout_id)
            .await?
            .ok_or(DomainError::ShoutOutNotFound(shoutout_id))?)
    }

    /// Every tagged member must exist and not be soft-deleted
    async fn require_active_recipients(&self, recipients: &[Snowflake]) -> ServiceResult<()> {
        if recipients.is_empty() {
            return Ok(());
        }

        let found: HashMap<Snowflake, bool> = self
            .ctx
            .member_repo()
            .find_many(recipients)
            .await?
            .into_iter()
            .map(|m| (m.id, m.is_active()))
            .collect();

        match recipients.iter().find(|id| !found.get(id).copied().unwrap_or(false)) {
            Some(id) => Err(DomainError::MemberNotFound(*id).into()),
            None => Ok(()),
        }
    }
}
