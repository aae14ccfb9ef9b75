//! Reaction service
//!
//! Three-way reaction toggle on shout-outs and comments.

use brag_core::entities::{
    EventKey, NotificationKind, ReactionKind, ReactionTarget, ReactionToggle, ToggleState,
};
use brag_core::{Actor, DomainError};
use tracing::{info, instrument};

use crate::dto::{ReactionCountResponse, ReactionToggleResponse};

use super::content::content_author;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::notification::{NotificationRequest, NotificationService};
use super::score::ScoreService;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add, change, or remove the actor's reaction on a target
    ///
    /// Same kind as the current reaction removes it; a different kind
    /// replaces it in place; no reaction adds one.
    #[instrument(skip(self))]
    pub async fn set_reaction(
        &self,
        actor: Actor,
        target: ReactionTarget,
        kind: &str,
    ) -> ServiceResult<ReactionToggleResponse> {
        if !self.ctx.engagement().reactions_enabled {
            return Err(DomainError::FeatureDisabled("reactions").into());
        }
        let kind: ReactionKind = kind.parse()?;

        let toggle = self
            .ctx
            .reaction_repo()
            .toggle(target, actor.id, kind, self.ctx.generate_id())
            .await?;

        info!(
            reaction_id = %toggle.reaction.id,
            target = %target,
            member_id = %actor.id,
            state = toggle.state.as_str(),
            "Reaction toggled"
        );

        if let Some(request) = self.notification_for(actor, target, &toggle) {
            NotificationService::new(self.ctx).dispatch(vec![request]).await;
        }
        ScoreService::new(self.ctx)
            .settle(&[toggle.target_owner, actor.id])
            .await;

        let counts = self.ctx.reaction_repo().counts(target).await?;
        Ok(ReactionToggleResponse {
            state: toggle.state,
            kind: (toggle.state != ToggleState::Removed).then_some(kind),
            counts: counts.into_iter().map(ReactionCountResponse::from).collect(),
        })
    }

    /// Per-kind counts on a target
    #[instrument(skip(self))]
    pub async fn reaction_counts(
        &self,
        target: ReactionTarget,
    ) -> ServiceResult<Vec<ReactionCountResponse>> {
        content_author(self.ctx, target).await?;
        let counts = self.ctx.reaction_repo().counts(target).await?;
        Ok(counts.into_iter().map(ReactionCountResponse::from).collect())
    }

    /// The actor's current reaction on a target
    #[instrument(skip(self))]
    pub async fn my_reaction(
        &self,
        actor: Actor,
        target: ReactionTarget,
    ) -> ServiceResult<Option<ReactionKind>> {
        content_author(self.ctx, target).await?;
        Ok(self.ctx.reaction_repo().find_kind(target, actor.id).await?)
    }

    fn notification_for(
        &self,
        actor: Actor,
        target: ReactionTarget,
        toggle: &ReactionToggle,
    ) -> Option<NotificationRequest> {
        if toggle.is_self_reaction() {
            return None;
        }

        let reaction = &toggle.reaction;
        let event_key = match toggle.state {
            ToggleState::Added => EventKey::reaction_added(reaction.id),
            ToggleState::Changed if self.ctx.engagement().notify_on_reaction_change => {
                EventKey::reaction_changed(reaction.id, reaction.updated_at.timestamp_millis())
            }
            _ => return None,
        };

        let request = |noun: &str| {
            NotificationRequest::new(
                toggle.target_owner,
                actor.id,
                NotificationKind::Reaction,
                event_key.clone(),
                format!("reacted with {} to your {noun}", reaction.kind),
            )
        };
        Some(match target {
            ReactionTarget::ShoutOut(id) => request("shout-out").shoutout(id),
            ReactionTarget::Comment(id) => request("comment").comment(id),
        })
    }
}
