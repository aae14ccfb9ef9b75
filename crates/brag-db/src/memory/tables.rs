//! Table state behind the memory store lock

use std::collections::{BTreeMap, HashMap, HashSet};

use brag_core::entities::{
    ActivityCounts, AdminAction, Comment, CommentArena, ContentRemoval, ContentTarget,
    LeaderboardEntry, LeaderboardScope, Member, Notification, Reaction, ReactionTarget, Report,
    ReportStatus, ShoutOut,
};
use brag_core::value_objects::Snowflake;

/// Every table, keyed by row id
#[derive(Debug, Default)]
pub(super) struct Tables {
    pub members: BTreeMap<Snowflake, Member>,
    pub shoutouts: BTreeMap<Snowflake, ShoutOut>,
    pub comments: BTreeMap<Snowflake, Comment>,
    pub reactions: BTreeMap<Snowflake, Reaction>,
    pub notifications: BTreeMap<Snowflake, Notification>,
    pub reports: BTreeMap<Snowflake, Report>,
    pub entries: HashMap<Snowflake, LeaderboardEntry>,
    pub admin_actions: BTreeMap<Snowflake, AdminAction>,
}

impl Tables {
    /// Bump revisions, creating missing entries for known members
    pub fn bump(&mut self, members: &[Snowflake]) {
        let unique: HashSet<Snowflake> = members.iter().copied().collect();
        for id in unique {
            if !self.members.contains_key(&id) {
                continue;
            }
            self.entries
                .entry(id)
                .and_modify(|e| e.revision += 1)
                .or_insert_with(|| LeaderboardEntry::empty(id));
        }
    }

    pub fn content_author(&self, target: ContentTarget) -> Option<Snowflake> {
        match target {
            ContentTarget::ShoutOut(id) => self.shoutouts.get(&id).map(|s| s.author_id),
            ContentTarget::Comment(id) => self.comments.get(&id).map(|c| c.author_id),
        }
    }

    pub fn reaction_of(&self, target: ReactionTarget, member_id: Snowflake) -> Option<&Reaction> {
        self.reactions
            .values()
            .find(|r| r.target == target && r.member_id == member_id)
    }

    pub fn admin_action(&mut self, action: Option<&AdminAction>) {
        if let Some(action) = action {
            self.admin_actions.insert(action.id, action.clone());
        }
    }

    /// Mirror of the PostgreSQL shout-out cascade
    pub fn delete_shoutout_tree(&mut self, id: Snowflake) -> Option<(ContentRemoval, Snowflake)> {
        let shoutout = self.shoutouts.get(&id)?.clone();
        let mut removal = ContentRemoval::default();
        removal.touch(shoutout.author_id);
        for recipient in &shoutout.recipients {
            removal.touch(*recipient);
        }

        let comment_ids: HashSet<Snowflake> = self
            .comments
            .values()
            .filter(|c| c.shoutout_id == id)
            .map(|c| {
                removal.touch(c.author_id);
                c.id
            })
            .collect();

        let doomed = |target: &ContentTarget| match target {
            ContentTarget::ShoutOut(t) => *t == id,
            ContentTarget::Comment(t) => comment_ids.contains(t),
        };

        self.remove_reactions(&mut removal, doomed);

        let before = self.notifications.len();
        self.notifications.retain(|_, n| {
            n.shoutout_id != Some(id) && !n.comment_id.is_some_and(|c| comment_ids.contains(&c))
        });
        removal.notifications_removed = (before - self.notifications.len()) as u64;

        let before = self.reports.len();
        self.reports
            .retain(|_, r| r.status != ReportStatus::Pending || !doomed(&r.target));
        removal.reports_removed = (before - self.reports.len()) as u64;

        self.comments.retain(|cid, _| !comment_ids.contains(cid));
        removal.comments_removed = comment_ids.len() as u64;

        self.shoutouts.remove(&id);
        removal.shoutouts_removed = 1;

        self.bump(&removal.affected_members);
        Some((removal, shoutout.author_id))
    }

    /// Mirror of the PostgreSQL comment-subtree cascade
    pub fn delete_comment_subtree(&mut self, id: Snowflake) -> Option<(ContentRemoval, Snowflake)> {
        let root = self.comments.get(&id)?.clone();
        let owner = self.shoutouts.get(&root.shoutout_id).map(|s| s.author_id);

        let arena = CommentArena::from_edges(
            self.comments
                .values()
                .filter(|c| c.shoutout_id == root.shoutout_id)
                .map(|c| (c.id, c.parent_id)),
        );
        let doomed: HashSet<Snowflake> = arena.subtree(id).into_iter().collect();

        let mut removal = ContentRemoval::default();
        if let Some(owner) = owner {
            removal.touch(owner);
        }
        for comment_id in &doomed {
            if let Some(comment) = self.comments.get(comment_id) {
                removal.touch(comment.author_id);
            }
        }

        let targeted = |target: &ContentTarget| {
            matches!(target, ContentTarget::Comment(t) if doomed.contains(t))
        };

        self.remove_reactions(&mut removal, targeted);

        let before = self.notifications.len();
        self.notifications
            .retain(|_, n| !n.comment_id.is_some_and(|c| doomed.contains(&c)));
        removal.notifications_removed = (before - self.notifications.len()) as u64;

        let before = self.reports.len();
        self.reports
            .retain(|_, r| r.status != ReportStatus::Pending || !targeted(&r.target));
        removal.reports_removed = (before - self.reports.len()) as u64;

        self.comments.retain(|cid, _| !doomed.contains(cid));
        removal.comments_removed = doomed.len() as u64;

        self.bump(&removal.affected_members);
        Some((removal, root.author_id))
    }

    fn remove_reactions<F>(&mut self, removal: &mut ContentRemoval, doomed: F)
    where
        F: Fn(&ContentTarget) -> bool,
    {
        let gone: Vec<Snowflake> = self
            .reactions
            .values()
            .filter(|r| doomed(&r.target))
            .map(|r| r.id)
            .collect();
        for reaction_id in gone {
            if let Some(reaction) = self.reactions.remove(&reaction_id) {
                removal.touch(reaction.member_id);
                removal.reactions_removed += 1;
            }
        }
    }

    /// Same counting rules as the SQL activity query
    pub fn activity(&self, member_id: Snowflake) -> ActivityCounts {
        let shoutouts_sent = self
            .shoutouts
            .values()
            .filter(|s| s.author_id == member_id)
            .count();

        let tags_received = self
            .shoutouts
            .values()
            .filter(|s| s.author_id != member_id && s.tags(member_id))
            .count();

        let reactions_received = self
            .reactions
            .values()
            .filter(|r| r.member_id != member_id)
            .filter(|r| self.content_author(r.target) == Some(member_id))
            .count();

        let comments_received = self
            .comments
            .values()
            .filter(|c| c.author_id != member_id)
            .filter(|c| {
                self.shoutouts
                    .get(&c.shoutout_id)
                    .is_some_and(|s| s.author_id == member_id)
            })
            .count();

        let reactions_given = self
            .reactions
            .values()
            .filter(|r| r.member_id == member_id)
            .count();

        ActivityCounts {
            shoutouts_sent: shoutouts_sent as i64,
            tags_received: tags_received as i64,
            reactions_received: reactions_received as i64,
            comments_received: comments_received as i64,
            reactions_given: reactions_given as i64,
        }
    }

    /// Active members inside the scope
    pub fn in_scope<'a>(
        &'a self,
        scope: &'a LeaderboardScope,
    ) -> impl Iterator<Item = &'a Member> + 'a {
        self.members.values().filter(move |m| {
            m.is_active() && scope.department().is_none_or(|d| m.department == d)
        })
    }
}
