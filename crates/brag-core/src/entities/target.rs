//! Content target - a shout-out or a comment, as pointed at by reactions,
//! reports and admin actions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// A piece of member-authored content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum ContentTarget {
    #[serde(rename = "shoutout")]
    ShoutOut(Snowflake),
    Comment(Snowflake),
}

impl ContentTarget {
    #[inline]
    pub fn id(&self) -> Snowflake {
        match self {
            Self::ShoutOut(id) | Self::Comment(id) => *id,
        }
    }

    /// Storage discriminator
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::ShoutOut(_) => "shoutout",
            Self::Comment(_) => "comment",
        }
    }

    /// Rebuild from the stored discriminator and id
    pub fn from_parts(kind: &str, id: Snowflake) -> Result<Self, DomainError> {
        match kind {
            "shoutout" => Ok(Self::ShoutOut(id)),
            "comment" => Ok(Self::Comment(id)),
            other => Err(DomainError::DatabaseError(format!(
                "unknown content target type: {other}"
            ))),
        }
    }
}

impl fmt::Display for ContentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind_str(), self.id())
    }
}
