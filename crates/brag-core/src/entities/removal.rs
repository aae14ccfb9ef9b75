//! Summary of a cascading content removal

use crate::value_objects::Snowflake;

/// What a shout-out or comment-subtree deletion took with it
///
/// `affected_members` lists everyone whose leaderboard counters read any of
/// the removed rows. The store marks them stale in the same unit as the
/// removal; the list lets callers recompute eagerly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRemoval {
    pub shoutouts_removed: u64,
    pub comments_removed: u64,
    pub reactions_removed: u64,
    pub notifications_removed: u64,
    pub reports_removed: u64,
    pub affected_members: Vec<Snowflake>,
}

impl ContentRemoval {
    /// Record a member whose score depends on removed rows
    pub fn touch(&mut self, member_id: Snowflake) {
        if !self.affected_members.contains(&member_id) {
            self.affected_members.push(member_id);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shoutouts_removed == 0 && self.comments_removed == 0
    }
}
