//! Leaderboard entity <-> model mapper

use brag_core::entities::{ActivityCounts, LeaderboardEntry, RankedEntry};
use brag_core::value_objects::Snowflake;

use crate::models::{ActivityCountsModel, LeaderboardEntryModel, RankedEntryModel};

impl From<ActivityCountsModel> for ActivityCounts {
    fn from(model: ActivityCountsModel) -> Self {
        ActivityCounts {
            shoutouts_sent: model.shoutouts_sent,
            tags_received: model.tags_received,
            reactions_received: model.reactions_received,
            comments_received: model.comments_received,
            reactions_given: model.reactions_given,
        }
    }
}

impl From<LeaderboardEntryModel> for LeaderboardEntry {
    fn from(model: LeaderboardEntryModel) -> Self {
        LeaderboardEntry {
            member_id: Snowflake::new(model.member_id),
            counts: ActivityCounts {
                shoutouts_sent: model.shoutouts_sent,
                tags_received: model.tags_received,
                reactions_received: model.reactions_received,
                comments_received: model.comments_received,
                reactions_given: model.reactions_given,
            },
            score: model.score,
            revision: model.revision,
            computed_revision: model.computed_revision,
            computed_at: model.computed_at,
        }
    }
}

impl From<RankedEntryModel> for RankedEntry {
    fn from(model: RankedEntryModel) -> Self {
        RankedEntry {
            rank: model.rank,
            display_name: model.display_name,
            department: model.department,
            entry: model.entry.into(),
        }
    }
}
