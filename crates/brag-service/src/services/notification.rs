//! Notification service
//!
//! Creates notifications exactly once per event and recipient, and serves
//! the recipient's inbox. Dispatch never fails the action that triggered it.

use brag_core::entities::{EventKey, Notification, NotificationKind};
use brag_core::{Actor, DomainError, Snowflake};
use chrono::Utc;
use tracing::{debug, instrument, warn};

use crate::dto::NotificationResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Largest inbox page
pub const MAX_INBOX_LIMIT: i64 = 100;

/// One notification to fan out
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub recipient_id: Snowflake,
    pub actor_id: Snowflake,
    pub kind: NotificationKind,
    pub shoutout_id: Option<Snowflake>,
    pub comment_id: Option<Snowflake>,
    pub message: String,
    pub event_key: EventKey,
}

impl NotificationRequest {
    pub fn new(
        recipient_id: Snowflake,
        actor_id: Snowflake,
        kind: NotificationKind,
        event_key: EventKey,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recipient_id,
            actor_id,
            kind,
            shoutout_id: None,
            comment_id: None,
            message: message.into(),
            event_key,
        }
    }

    pub fn shoutout(mut self, id: Snowflake) -> Self {
        self.shoutout_id = Some(id);
        self
    }

    pub fn comment(mut self, id: Snowflake) -> Self {
        self.comment_id = Some(id);
        self
    }
}

/// What happened to one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Created(Snowflake),
    /// The event was already delivered to this recipient
    Duplicate,
    /// Recipient and actor are the same member
    SkippedSelf,
    /// Recipient is unknown or soft-deleted
    SkippedInactive,
}

/// Delivery failure, reported to the caller instead of aborting it
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification store failed: {0}")]
    Store(#[from] DomainError),
}

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Deliver one notification unless it is a self-notification, targets an
    /// inactive member, or was already delivered
    #[instrument(skip(self, request), fields(event_key = %request.event_key, recipient_id = %request.recipient_id))]
    pub async fn notify(&self, request: NotificationRequest) -> Result<DispatchOutcome, NotifyError> {
        if request.recipient_id == request.actor_id {
            return Ok(DispatchOutcome::SkippedSelf);
        }

        let active = self
            .ctx
            .member_repo()
            .find_by_id(request.recipient_id)
            .await?
            .is_some_and(|m| m.is_active());
        if !active {
            return Ok(DispatchOutcome::SkippedInactive);
        }

        let notification = Notification {
            id: self.ctx.generate_id(),
            recipient_id: request.recipient_id,
            actor_id: request.actor_id,
            kind: request.kind,
            shoutout_id: request.shoutout_id,
            comment_id: request.comment_id,
            message: request.message,
            read: false,
            event_key: request.event_key,
            created_at: Utc::now(),
        };

        if self.ctx.notification_repo().insert_if_absent(&notification).await? {
            debug!(notification_id = %notification.id, "Notification created");
            Ok(DispatchOutcome::Created(notification.id))
        } else {
            Ok(DispatchOutcome::Duplicate)
        }
    }

    /// Best-effort fan-out after a committed mutation; failures are logged
    pub(crate) async fn dispatch(&self, requests: Vec<NotificationRequest>) -> Vec<DispatchOutcome> {
        let mut outcomes = Vec::with_capacity(requests.len());
        for request in requests {
            let key = request.event_key.clone();
            match self.notify(request).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => warn!(event_key = %key, error = %err, "Notification dropped"),
            }
        }
        outcomes
    }

    /// The actor's notifications, newest first; `limit` is clamped to 1..=100
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        actor: Actor,
        unread_only: bool,
        limit: i64,
    ) -> ServiceResult<Vec<NotificationResponse>> {
        let notifications = self
            .ctx
            .notification_repo()
            .list(actor.id, unread_only, limit.clamp(1, MAX_INBOX_LIMIT))
            .await?;
        Ok(notifications.iter().map(NotificationResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn unread_count(&self, actor: Actor) -> ServiceResult<i64> {
        Ok(self.ctx.notification_repo().unread_count(actor.id).await?)
    }

    /// Mark one of the actor's notifications read
    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        actor: Actor,
        notification_id: Snowflake,
    ) -> ServiceResult<NotificationResponse> {
        let mut notification = self
            .ctx
            .notification_repo()
            .find_by_id(notification_id)
            .await?
            .ok_or(DomainError::NotificationNotFound(notification_id))?;

        if !notification.belongs_to(actor.id) {
            return Err(DomainError::NotRecipient.into());
        }

        if notification.is_unread()
            && !self.ctx.notification_repo().mark_read(notification_id).await?
        {
            return Err(ServiceError::not_found("Notification", notification_id.to_string()));
        }
        notification.read = true;

        Ok(NotificationResponse::from(&notification))
    }

    /// Mark all of the actor's notifications read; returns how many changed
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, actor: Actor) -> ServiceResult<u64> {
        Ok(self.ctx.notification_repo().mark_all_read(actor.id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_sets_refs() {
        let request = NotificationRequest::new(
            Snowflake::new(1),
            Snowflake::new(2),
            NotificationKind::Reply,
            EventKey::reply(Snowflake::new(9)),
            "replied to your comment",
        )
        .shoutout(Snowflake::new(5))
        .comment(Snowflake::new(9));

        assert_eq!(request.shoutout_id, Some(Snowflake::new(5)));
        assert_eq!(request.comment_id, Some(Snowflake::new(9)));
        assert_eq!(request.event_key.as_str(), "reply:9");
    }

    #[test]
    fn test_notify_error_wraps_store_failure() {
        let err = NotifyError::from(DomainError::DatabaseError("down".into()));
        assert!(err.to_string().contains("down"));
    }
}
