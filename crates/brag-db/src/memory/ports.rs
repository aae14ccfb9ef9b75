//! Port implementations for the memory store

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

use brag_core::entities::{
    ActivityCounts, AdminAction, AdminActionKind, Comment, ContentRemoval, ContentTarget,
    LeaderboardEntry, LeaderboardScope, Member, Notification, RankedEntry, Reaction,
    ReactionCount, ReactionKind, ReactionTarget, ReactionToggle, Report, ReportStats,
    ReportStatus, ResolveAction, ShoutOut, ToggleState,
};
use brag_core::error::DomainError;
use brag_core::traits::{
    AdminActionRepository, CommentRepository, LeaderboardRepository, MemberRepository,
    NotificationRepository, ReactionRepository, RepoResult, ReportQuery, ReportRepository,
    ResolveCommand, ResolveOutcome, ShoutOutRepository,
};
use brag_core::value_objects::Snowflake;

use super::MemoryStore;

fn target_not_found(target: ContentTarget) -> DomainError {
    match target {
        ContentTarget::ShoutOut(id) => DomainError::ShoutOutNotFound(id),
        ContentTarget::Comment(id) => DomainError::CommentNotFound(id),
    }
}

// ============================================================================
// Members
// ============================================================================

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Member>> {
        Ok(self.tables.lock().members.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<Member>> {
        let t = self.tables.lock();
        let mut found: Vec<Member> = ids.iter().filter_map(|id| t.members.get(id).cloned()).collect();
        found.sort_by_key(|m| m.id);
        found.dedup_by_key(|m| m.id);
        Ok(found)
    }

    #[instrument(skip(self, member), fields(member_id = %member.id))]
    async fn create(&self, member: &Member) -> RepoResult<()> {
        let mut t = self.tables.lock();
        if t.members.values().any(|m| m.email == member.email) {
            return Err(DomainError::ValidationError(format!(
                "email already in use: {}",
                member.email
            )));
        }
        t.members.insert(member.id, member.clone());
        Ok(())
    }

    async fn soft_delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut t = self.tables.lock();
        let member = t.members.get_mut(&id).ok_or(DomainError::MemberNotFound(id))?;
        member.deleted = true;
        Ok(())
    }
}

// ============================================================================
// Shout-outs
// ============================================================================

#[async_trait]
impl ShoutOutRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ShoutOut>> {
        Ok(self.tables.lock().shoutouts.get(&id).cloned())
    }

    #[instrument(skip(self, shoutout), fields(shoutout_id = %shoutout.id))]
    async fn create(&self, shoutout: &ShoutOut) -> RepoResult<()> {
        let mut t = self.tables.lock();
        if !t.members.contains_key(&shoutout.author_id) {
            return Err(DomainError::MemberNotFound(shoutout.author_id));
        }
        if shoutout.recipients.iter().any(|r| !t.members.contains_key(r)) {
            return Err(DomainError::ValidationError(
                "tagged member does not exist".to_string(),
            ));
        }

        t.shoutouts.insert(shoutout.id, shoutout.clone());
        let mut stale = shoutout.recipients.clone();
        stale.push(shoutout.author_id);
        t.bump(&stale);
        Ok(())
    }

    async fn update_message(&self, shoutout: &ShoutOut, max_edits: i32) -> RepoResult<i32> {
        let mut t = self.tables.lock();
        let stored = t
            .shoutouts
            .get_mut(&shoutout.id)
            .ok_or(DomainError::ShoutOutNotFound(shoutout.id))?;
        if stored.edit_count >= max_edits {
            return Err(DomainError::EditLimitReached { max: max_edits });
        }
        stored.message.clone_from(&shoutout.message);
        stored.edited_at = shoutout.edited_at;
        stored.edit_count += 1;
        Ok(stored.edit_count)
    }

    #[instrument(skip(self, audit))]
    async fn delete_cascade(
        &self,
        id: Snowflake,
        audit: Option<&AdminAction>,
    ) -> RepoResult<ContentRemoval> {
        let mut t = self.tables.lock();
        let (removal, _author) = t
            .delete_shoutout_tree(id)
            .ok_or(DomainError::ShoutOutNotFound(id))?;
        t.admin_action(audit);
        Ok(removal)
    }
}

// ============================================================================
// Reactions
// ============================================================================

#[async_trait]
impl ReactionRepository for MemoryStore {
    #[instrument(skip(self))]
    async fn toggle(
        &self,
        target: ReactionTarget,
        member_id: Snowflake,
        kind: ReactionKind,
        new_id: Snowflake,
    ) -> RepoResult<ReactionToggle> {
        let mut t = self.tables.lock();
        let owner = t.content_author(target).ok_or_else(|| target_not_found(target))?;
        if !t.members.contains_key(&member_id) {
            return Err(DomainError::MemberNotFound(member_id));
        }

        let existing = t.reaction_of(target, member_id).cloned();
        let previous = existing.as_ref().map(|r| r.kind);
        let state = ToggleState::decide(previous, kind);

        let reaction = match existing {
            None => {
                let created = Reaction::new(new_id, target, member_id, kind);
                t.reactions.insert(created.id, created.clone());
                created
            }
            Some(mut current) if state == ToggleState::Changed => {
                current.kind = kind;
                current.updated_at = Utc::now();
                t.reactions.insert(current.id, current.clone());
                current
            }
            Some(current) => {
                t.reactions.remove(&current.id);
                current
            }
        };

        t.bump(&[owner, member_id]);

        Ok(ReactionToggle {
            state,
            reaction,
            previous,
            target_owner: owner,
        })
    }

    async fn counts(&self, target: ReactionTarget) -> RepoResult<Vec<ReactionCount>> {
        let t = self.tables.lock();
        let mut counts: Vec<ReactionCount> = ReactionKind::ALL
            .iter()
            .map(|kind| {
                let n = t
                    .reactions
                    .values()
                    .filter(|r| r.target == target && r.kind == *kind)
                    .count();
                ReactionCount::new(*kind, n as i64)
            })
            .filter(|c| c.count > 0)
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.kind.as_str().cmp(b.kind.as_str())));
        Ok(counts)
    }

    async fn find_kind(
        &self,
        target: ReactionTarget,
        member_id: Snowflake,
    ) -> RepoResult<Option<ReactionKind>> {
        Ok(self
            .tables
            .lock()
            .reaction_of(target, member_id)
            .map(|r| r.kind))
    }
}

// ============================================================================
// Comments
// ============================================================================

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        Ok(self.tables.lock().comments.get(&id).cloned())
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        let mut t = self.tables.lock();
        let owner = t
            .shoutouts
            .get(&comment.shoutout_id)
            .map(|s| s.author_id)
            .ok_or(DomainError::ShoutOutNotFound(comment.shoutout_id))?;

        if let Some(parent_id) = comment.parent_id {
            let parent = t
                .comments
                .get(&parent_id)
                .ok_or(DomainError::CommentNotFound(parent_id))?;
            if parent.shoutout_id != comment.shoutout_id {
                return Err(DomainError::CrossThreadParent { parent: parent_id });
            }
        }

        t.comments.insert(comment.id, comment.clone());
        t.bump(&[owner]);
        Ok(())
    }

    async fn update_body(&self, comment: &Comment) -> RepoResult<()> {
        let mut t = self.tables.lock();
        let stored = t
            .comments
            .get_mut(&comment.id)
            .ok_or(DomainError::CommentNotFound(comment.id))?;
        stored.body.clone_from(&comment.body);
        stored.edited_at = comment.edited_at;
        Ok(())
    }

    async fn list_by_shoutout(&self, shoutout_id: Snowflake) -> RepoResult<Vec<Comment>> {
        Ok(self
            .tables
            .lock()
            .comments
            .values()
            .filter(|c| c.shoutout_id == shoutout_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, audit))]
    async fn delete_subtree(
        &self,
        id: Snowflake,
        audit: Option<&AdminAction>,
    ) -> RepoResult<ContentRemoval> {
        let mut t = self.tables.lock();
        let (removal, _author) = t
            .delete_comment_subtree(id)
            .ok_or(DomainError::CommentNotFound(id))?;
        t.admin_action(audit);
        Ok(removal)
    }
}

// ============================================================================
// Notifications
// ============================================================================

#[async_trait]
impl NotificationRepository for MemoryStore {
    #[instrument(skip(self, notification), fields(event_key = %notification.event_key))]
    async fn insert_if_absent(&self, notification: &Notification) -> RepoResult<bool> {
        if self.notifications_down() {
            return Err(DomainError::DatabaseError(
                "notifications table unavailable".to_string(),
            ));
        }

        let mut t = self.tables.lock();
        if !t.members.contains_key(&notification.recipient_id) {
            return Err(DomainError::MemberNotFound(notification.recipient_id));
        }
        let duplicate = t.notifications.values().any(|n| {
            n.recipient_id == notification.recipient_id && n.event_key == notification.event_key
        });
        if duplicate {
            return Ok(false);
        }
        t.notifications.insert(notification.id, notification.clone());
        Ok(true)
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Notification>> {
        Ok(self.tables.lock().notifications.get(&id).cloned())
    }

    async fn list(
        &self,
        recipient_id: Snowflake,
        unread_only: bool,
        limit: i64,
    ) -> RepoResult<Vec<Notification>> {
        let t = self.tables.lock();
        Ok(t.notifications
            .values()
            .rev()
            .filter(|n| n.belongs_to(recipient_id) && (!unread_only || n.is_unread()))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn unread_count(&self, recipient_id: Snowflake) -> RepoResult<i64> {
        let t = self.tables.lock();
        Ok(t.notifications
            .values()
            .filter(|n| n.belongs_to(recipient_id) && n.is_unread())
            .count() as i64)
    }

    async fn mark_read(&self, id: Snowflake) -> RepoResult<bool> {
        let mut t = self.tables.lock();
        let Some(notification) = t.notifications.get_mut(&id) else {
            return Ok(false);
        };
        notification.read = true;
        Ok(true)
    }

    async fn mark_all_read(&self, recipient_id: Snowflake) -> RepoResult<u64> {
        let mut t = self.tables.lock();
        let mut changed = 0;
        for n in t.notifications.values_mut() {
            if n.belongs_to(recipient_id) && n.is_unread() {
                n.read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

// ============================================================================
// Reports
// ============================================================================

#[async_trait]
impl ReportRepository for MemoryStore {
    #[instrument(skip(self, report), fields(report_id = %report.id))]
    async fn create(&self, report: &Report) -> RepoResult<()> {
        let mut t = self.tables.lock();
        let duplicate = t.reports.values().any(|r| {
            r.status == ReportStatus::Pending
                && r.reporter_id == report.reporter_id
                && r.target == report.target
        });
        if duplicate {
            return Err(DomainError::DuplicateReport(report.target));
        }
        t.reports.insert(report.id, report.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Report>> {
        Ok(self.tables.lock().reports.get(&id).cloned())
    }

    async fn find_pending(
        &self,
        reporter_id: Snowflake,
        target: ContentTarget,
    ) -> RepoResult<Option<Report>> {
        let t = self.tables.lock();
        Ok(t.reports
            .values()
            .find(|r| {
                r.status == ReportStatus::Pending
                    && r.reporter_id == reporter_id
                    && r.target == target
            })
            .cloned())
    }

    #[instrument(skip(self, command), fields(report_id = %command.report_id))]
    async fn resolve(&self, command: &ResolveCommand) -> RepoResult<ResolveOutcome> {
        let mut t = self.tables.lock();
        let mut report = t
            .reports
            .get(&command.report_id)
            .cloned()
            .ok_or(DomainError::ReportNotFound(command.report_id))?;

        report.close(command.admin_id, command.action, command.note.clone())?;
        t.reports.insert(report.id, report.clone());

        let (removal, content_author) = match (command.action, report.target) {
            (ResolveAction::Dismiss, target) => (ContentRemoval::default(), t.content_author(target)),
            (ResolveAction::Remove, ContentTarget::ShoutOut(id)) => split(t.delete_shoutout_tree(id)),
            (ResolveAction::Remove, ContentTarget::Comment(id)) => split(t.delete_comment_subtree(id)),
        };

        let kind = match command.action {
            ResolveAction::Remove => AdminActionKind::ResolveRemove,
            ResolveAction::Dismiss => AdminActionKind::Dismiss,
        };
        let audit = AdminAction::new(
            command.audit_id,
            command.admin_id,
            kind,
            report.target,
            Some(report.id),
        );
        t.admin_action(Some(&audit));

        Ok(ResolveOutcome {
            report,
            removal,
            content_author,
        })
    }

    async fn list(&self, query: &ReportQuery) -> RepoResult<Vec<Report>> {
        let t = self.tables.lock();
        Ok(t.reports
            .values()
            .rev()
            .filter(|r| query.status.is_none_or(|s| r.status == s))
            .take(usize::try_from(query.limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn stats(&self) -> RepoResult<ReportStats> {
        let t = self.tables.lock();
        Ok(ReportStats::from_counts(
            t.reports.values().map(|r| (r.status, 1)),
        ))
    }
}

fn split(removed: Option<(ContentRemoval, Snowflake)>) -> (ContentRemoval, Option<Snowflake>) {
    match removed {
        Some((removal, author)) => (removal, Some(author)),
        None => (ContentRemoval::default(), None),
    }
}

// ============================================================================
// Admin actions
// ============================================================================

#[async_trait]
impl AdminActionRepository for MemoryStore {
    async fn list(&self, limit: i64) -> RepoResult<Vec<AdminAction>> {
        let t = self.tables.lock();
        Ok(t.admin_actions
            .values()
            .rev()
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }
}

// ============================================================================
// Leaderboard
// ============================================================================

#[async_trait]
impl LeaderboardRepository for MemoryStore {
    async fn mark_stale(&self, member_ids: &[Snowflake]) -> RepoResult<()> {
        self.tables.lock().bump(member_ids);
        Ok(())
    }

    async fn ensure(&self, member_id: Snowflake) -> RepoResult<LeaderboardEntry> {
        let mut t = self.tables.lock();
        if !t.members.contains_key(&member_id) {
            return Err(DomainError::MemberNotFound(member_id));
        }
        Ok(t.entries
            .entry(member_id)
            .or_insert_with(|| LeaderboardEntry::empty(member_id))
            .clone())
    }

    async fn activity(&self, member_id: Snowflake) -> RepoResult<ActivityCounts> {
        Ok(self.tables.lock().activity(member_id))
    }

    async fn save_computed(
        &self,
        member_id: Snowflake,
        counts: &ActivityCounts,
        score: i64,
        observed_revision: i64,
    ) -> RepoResult<LeaderboardEntry> {
        let mut t = self.tables.lock();
        let entry = t
            .entries
            .get_mut(&member_id)
            .ok_or(DomainError::MemberNotFound(member_id))?;
        if entry.computed_revision <= observed_revision {
            entry.counts = *counts;
            entry.score = score;
            entry.computed_revision = observed_revision;
            entry.computed_at = Some(Utc::now());
        }
        Ok(entry.clone())
    }

    async fn stale_members(&self, scope: &LeaderboardScope) -> RepoResult<Vec<Snowflake>> {
        let t = self.tables.lock();
        Ok(t.in_scope(scope)
            .filter(|m| t.entries.get(&m.id).is_none_or(LeaderboardEntry::is_stale))
            .map(|m| m.id)
            .collect())
    }

    async fn ranked(&self, scope: &LeaderboardScope, limit: i64) -> RepoResult<Vec<RankedEntry>> {
        let t = self.tables.lock();
        let mut rows: Vec<(&Member, &LeaderboardEntry)> = t
            .in_scope(scope)
            .filter_map(|m| t.entries.get(&m.id).map(|e| (m, e)))
            .collect();
        rows.sort_by(|(_, a), (_, b)| b.score.cmp(&a.score).then(a.member_id.cmp(&b.member_id)));

        Ok(rows
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .enumerate()
            .map(|(i, (member, entry))| RankedEntry {
                rank: i as i64 + 1,
                display_name: member.display_name.clone(),
                department: member.department.clone(),
                entry: entry.clone(),
            })
            .collect())
    }

    async fn rank(&self, member_id: Snowflake, scope: &LeaderboardScope) -> RepoResult<i64> {
        let t = self.tables.lock();
        let Some(mine) = t.entries.get(&member_id).map(|e| e.score) else {
            return Ok(1);
        };
        let ahead = t
            .in_scope(scope)
            .filter_map(|m| t.entries.get(&m.id))
            .filter(|e| e.score > mine || (e.score == mine && e.member_id < member_id))
            .count();
        Ok(ahead as i64 + 1)
    }
}
