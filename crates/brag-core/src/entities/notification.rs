//! Notification entity - per-recipient record of an engagement event

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// What kind of event produced the notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Tag,
    Reaction,
    Comment,
    Reply,
    Moderation,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Reaction => "reaction",
            Self::Comment => "comment",
            Self::Reply => "reply",
            Self::Moderation => "moderation",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tag" => Ok(Self::Tag),
            "reaction" => Ok(Self::Reaction),
            "comment" => Ok(Self::Comment),
            "reply" => Ok(Self::Reply),
            "moderation" => Ok(Self::Moderation),
            other => Err(DomainError::DatabaseError(format!(
                "unknown notification type: {other}"
            ))),
        }
    }
}

/// Identity of the triggering event; unique per recipient
///
/// Built from the id of the row whose creation is the event, so retrying the
/// same event collapses while a genuinely new event (a fresh reaction row
/// after a removal) gets a new key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey(String);

impl EventKey {
    pub fn tag(shoutout_id: Snowflake) -> Self {
        Self(format!("tag:{shoutout_id}"))
    }

    pub fn reaction_added(reaction_id: Snowflake) -> Self {
        Self(format!("reaction:{reaction_id}"))
    }

    /// A kind change on an existing row; `changed_at_ms` separates repeated changes
    pub fn reaction_changed(reaction_id: Snowflake, changed_at_ms: i64) -> Self {
        Self(format!("reaction:{reaction_id}:changed:{changed_at_ms}"))
    }

    pub fn comment(comment_id: Snowflake) -> Self {
        Self(format!("comment:{comment_id}"))
    }

    pub fn reply(comment_id: Snowflake) -> Self {
        Self(format!("reply:{comment_id}"))
    }

    pub fn moderation(report_id: Snowflake) -> Self {
        Self(format!("moderation:{report_id}"))
    }

    pub fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Notification entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Snowflake,
    pub recipient_id: Snowflake,
    pub actor_id: Snowflake,
    pub kind: NotificationKind,
    pub shoutout_id: Option<Snowflake>,
    pub comment_id: Option<Snowflake>,
    pub message: String,
    pub read: bool,
    pub event_key: EventKey,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    #[inline]
    pub fn is_unread(&self) -> bool {
        !self.read
    }

    #[inline]
    pub fn belongs_to(&self, member_id: Snowflake) -> bool {
        self.recipient_id == member_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_keys_are_distinct_per_event() {
        let a = EventKey::reaction_added(Snowflake::new(1));
        let b = EventKey::reaction_added(Snowflake::new(2));
        assert_ne!(a, b);
        assert_eq!(a, EventKey::reaction_added(Snowflake::new(1)));
        assert_ne!(EventKey::comment(Snowflake::new(1)), EventKey::reply(Snowflake::new(1)));
    }

    #[test]
    fn test_unknown_stored_kind_is_a_store_error() {
        let err = "shoutout".parse::<NotificationKind>().unwrap_err();
        assert_eq!(err.code(), "DATABASE_ERROR");
    }
}
