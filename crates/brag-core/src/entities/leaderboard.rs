//! Leaderboard entry - derived, recomputable reputation record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Live activity counters read from existing rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActivityCounts {
    pub shoutouts_sent: i64,
    pub tags_received: i64,
    pub reactions_received: i64,
    pub comments_received: i64,
    pub reactions_given: i64,
}

/// Points per unit of activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub shoutout_sent: i64,
    pub tag_received: i64,
    pub reaction_received: i64,
    pub comment_received: i64,
    pub reaction_given: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            shoutout_sent: 5,
            tag_received: 0,
            reaction_received: 2,
            comment_received: 2,
            reaction_given: 1,
        }
    }
}

impl ScoringWeights {
    /// Weighted sum; a pure function of the counters
    pub fn score(&self, counts: &ActivityCounts) -> i64 {
        self.shoutout_sent * counts.shoutouts_sent
            + self.tag_received * counts.tags_received
            + self.reaction_received * counts.reactions_received
            + self.comment_received * counts.comments_received
            + self.reaction_given * counts.reactions_given
    }
}

/// One row per member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub member_id: Snowflake,
    pub counts: ActivityCounts,
    pub score: i64,
    /// Bumped by every mutation touching the member's activity
    pub revision: i64,
    /// Revision observed by the last recompute
    pub computed_revision: i64,
    pub computed_at: Option<DateTime<Utc>>,
}

impl LeaderboardEntry {
    /// Fresh entry that has never been computed
    pub fn empty(member_id: Snowflake) -> Self {
        Self {
            member_id,
            counts: ActivityCounts::default(),
            score: 0,
            revision: 1,
            computed_revision: 0,
            computed_at: None,
        }
    }

    #[inline]
    pub fn is_stale(&self) -> bool {
        self.revision > self.computed_revision
    }
}

/// Which members a leaderboard covers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "scope", content = "department", rename_all = "lowercase")]
pub enum LeaderboardScope {
    #[default]
    Global,
    Department(String),
}

impl LeaderboardScope {
    pub fn department(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Department(name) => Some(name.as_str()),
        }
    }
}

/// Entry with its position and member details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub rank: i64,
    pub display_name: String,
    pub department: String,
    pub entry: LeaderboardEntry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let counts = ActivityCounts {
            shoutouts_sent: 2,
            tags_received: 4,
            reactions_received: 3,
            comments_received: 1,
            reactions_given: 5,
        };
        // 5*2 + 0*4 + 2*3 + 2*1 + 1*5
        assert_eq!(ScoringWeights::default().score(&counts), 23);
    }

    #[test]
    fn test_custom_weights_count_tags() {
        let weights = ScoringWeights {
            tag_received: 3,
            ..ScoringWeights::default()
        };
        let counts = ActivityCounts {
            tags_received: 2,
            ..ActivityCounts::default()
        };
        assert_eq!(weights.score(&counts), 6);
    }

    #[test]
    fn test_staleness() {
        let mut entry = LeaderboardEntry::empty(Snowflake::new(1));
        assert!(entry.is_stale());
        entry.computed_revision = entry.revision;
        assert!(!entry.is_stale());
        entry.revision += 1;
        assert!(entry.is_stale());
    }
}
