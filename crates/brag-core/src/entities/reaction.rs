//! Reaction entity - one typed acknowledgement per member per target

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

use super::target::ContentTarget;

/// Closed set of reaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Clap,
    Star,
    Laugh,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 4] = [Self::Like, Self::Clap, Self::Star, Self::Laugh];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Clap => "clap",
            Self::Star => "star",
            Self::Laugh => "laugh",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "clap" => Ok(Self::Clap),
            "star" => Ok(Self::Star),
            // older clients sent "laughing"
            "laugh" | "laughing" => Ok(Self::Laugh),
            _ => Err(DomainError::InvalidReactionKind(s.to_string())),
        }
    }
}

/// What a reaction is attached to; shout-outs and comments keep separate sets
pub type ReactionTarget = ContentTarget;

/// Reaction entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub id: Snowflake,
    pub target: ReactionTarget,
    pub member_id: Snowflake,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(
        id: Snowflake,
        target: ReactionTarget,
        member_id: Snowflake,
        kind: ReactionKind,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            target,
            member_id,
            kind,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Result of the three-way toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleState {
    Added,
    Changed,
    Removed,
}

impl ToggleState {
    /// Decide the transition from the member's current reaction on a target
    pub fn decide(existing: Option<ReactionKind>, requested: ReactionKind) -> Self {
        match existing {
            None => Self::Added,
            Some(kind) if kind == requested => Self::Removed,
            Some(_) => Self::Changed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Changed => "changed",
            Self::Removed => "removed",
        }
    }
}

/// What the store did for one toggle call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionToggle {
    pub state: ToggleState,
    /// Row that was created, updated, or deleted
    pub reaction: Reaction,
    /// Kind held before the call, if any
    pub previous: Option<ReactionKind>,
    /// Author of the reacted-to shout-out or comment
    pub target_owner: Snowflake,
}

impl ReactionToggle {
    /// Whether the reactor is also the owner of the target
    #[inline]
    pub fn is_self_reaction(&self) -> bool {
        self.reaction.member_id == self.target_owner
    }
}

/// Aggregated per-kind count for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReactionCount {
    pub kind: ReactionKind,
    pub count: i64,
}

impl ReactionCount {
    pub fn new(kind: ReactionKind, count: i64) -> Self {
        Self { kind, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_decision_table() {
        assert_eq!(ToggleState::decide(None, ReactionKind::Like), ToggleState::Added);
        assert_eq!(
            ToggleState::decide(Some(ReactionKind::Like), ReactionKind::Like),
            ToggleState::Removed
        );
        assert_eq!(
            ToggleState::decide(Some(ReactionKind::Like), ReactionKind::Star),
            ToggleState::Changed
        );
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Clap".parse::<ReactionKind>().unwrap(), ReactionKind::Clap);
        assert_eq!("laughing".parse::<ReactionKind>().unwrap(), ReactionKind::Laugh);
        let err = "heart".parse::<ReactionKind>().unwrap_err();
        assert!(err.is_validation());
    }
}
