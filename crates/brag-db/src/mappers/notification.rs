//! Notification entity <-> model mapper

use brag_core::entities::{EventKey, Notification};
use brag_core::error::DomainError;
use brag_core::value_objects::Snowflake;

use crate::models::NotificationModel;

impl TryFrom<NotificationModel> for Notification {
    type Error = DomainError;

    fn try_from(model: NotificationModel) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: Snowflake::new(model.id),
            recipient_id: Snowflake::new(model.recipient_id),
            actor_id: Snowflake::new(model.actor_id),
            kind: model.kind.parse()?,
            shoutout_id: model.shoutout_id.map(Snowflake::new),
            comment_id: model.comment_id.map(Snowflake::new),
            message: model.message,
            read: model.read,
            event_key: EventKey::from_stored(model.event_key),
            created_at: model.created_at,
        })
    }
}
