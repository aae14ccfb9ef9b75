//! Engine integration tests
//!
//! Every scenario drives the public services against a fresh in-memory
//! store, the same wiring a single-process deployment uses.
//!
//! Run with: cargo test -p integration-tests --test engine_tests

use brag_common::EngagementConfig;
use brag_core::{
    ActivityCounts, EventKey, LeaderboardEntry, LeaderboardRepository, LeaderboardScope,
    NotificationKind, ReactionKind, ReactionRepository, ReactionTarget, ReportStatus,
    ToggleState,
};
use brag_service::{
    DispatchOutcome, NotificationRequest, NotifyError, ReactionService, ShoutOutService,
};
use integration_tests::{
    assert_code, assert_status, comment_request, edit_comment_request, edit_shoutout_request, id,
    reply_request, report_request, resolve_request, shoutout_request, TestEngine,
};

// ============================================================================
// Reaction Toggle Tests
// ============================================================================

#[tokio::test]
async fn test_same_kind_twice_adds_then_removes() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let target = ReactionTarget::ShoutOut(engine.shoutout(a, &[b]).await.unwrap());

    let first = engine.react(b, target, "like").await.unwrap();
    assert_eq!(first.state, ToggleState::Added);
    assert_eq!(first.kind, Some(ReactionKind::Like));
    assert_eq!(first.counts.len(), 1);
    assert_eq!(first.counts[0].count, 1);

    let second = engine.react(b, target, "like").await.unwrap();
    assert_eq!(second.state, ToggleState::Removed);
    assert_eq!(second.kind, None);
    assert!(second.counts.is_empty());

    let third = engine.react(b, target, "like").await.unwrap();
    assert_eq!(third.state, ToggleState::Added);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_kind_reactions_stay_consistent() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let target = ReactionTarget::ShoutOut(engine.shoutout(a, &[]).await.unwrap());

    let handles: Vec<_> = (0..9)
        .map(|_| {
            let ctx = engine.ctx.clone();
            tokio::spawn(async move {
                ReactionService::new(&ctx)
                    .set_reaction(b, target, "like")
                    .await
            })
        })
        .collect();

    let mut states = Vec::new();
    for handle in handles {
        states.push(handle.await.unwrap().unwrap().state);
    }
    let added = states.iter().filter(|s| **s == ToggleState::Added).count();
    let removed = states.iter().filter(|s| **s == ToggleState::Removed).count();
    assert_eq!((added, removed), (5, 4));

    // Odd number of toggles from nothing ends with the reaction in place
    let counts = engine.store.counts(target).await.unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].kind, ReactionKind::Like);
    assert_eq!(counts[0].count, 1);
}

#[tokio::test]
async fn test_different_kind_changes_in_place() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let target = ReactionTarget::ShoutOut(engine.shoutout(a, &[]).await.unwrap());

    engine.react(b, target, "like").await.unwrap();
    let changed = engine.react(b, target, "CLAP").await.unwrap();

    assert_eq!(changed.state, ToggleState::Changed);
    assert_eq!(changed.counts.len(), 1);
    assert_eq!(changed.counts[0].kind, ReactionKind::Clap);
    assert_eq!(changed.counts[0].count, 1);

    let mine = engine.reactions().my_reaction(b, target).await.unwrap();
    assert_eq!(mine, Some(ReactionKind::Clap));
}

#[tokio::test]
async fn test_reaction_counts_per_kind() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let c = engine.member("Eng").await.unwrap();
    let d = engine.member("Eng").await.unwrap();
    let target = ReactionTarget::ShoutOut(engine.shoutout(a, &[]).await.unwrap());

    engine.react(b, target, "star").await.unwrap();
    engine.react(c, target, "star").await.unwrap();
    engine.react(d, target, "laughing").await.unwrap();

    let counts = engine.reactions().reaction_counts(target).await.unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!((counts[0].kind, counts[0].count), (ReactionKind::Star, 2));
    assert_eq!((counts[1].kind, counts[1].count), (ReactionKind::Laugh, 1));
}

#[tokio::test]
async fn test_reaction_rejects_bad_input() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let shoutout = engine.shoutout(a, &[]).await.unwrap();

    let result = engine
        .reactions()
        .set_reaction(a, ReactionTarget::ShoutOut(shoutout), "thumbsdown")
        .await;
    assert_code(result, "INVALID_REACTION_TYPE");

    let missing = ReactionTarget::Comment(shoutout);
    let result = engine.reactions().set_reaction(a, missing, "like").await;
    assert_code(result, "UNKNOWN_COMMENT");

    let counts = engine
        .reactions()
        .reaction_counts(ReactionTarget::ShoutOut(shoutout))
        .await
        .unwrap();
    assert!(counts.is_empty());
}

#[tokio::test]
async fn test_reactions_disabled() {
    let engine = TestEngine::with_engagement(EngagementConfig {
        reactions_enabled: false,
        ..EngagementConfig::default()
    });
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let target = ReactionTarget::ShoutOut(engine.shoutout(a, &[]).await.unwrap());

    let result = engine.reactions().set_reaction(b, target, "like").await;
    assert_code(result, "FEATURE_DISABLED");

    let result = engine.reactions().set_reaction(b, target, "like").await;
    assert_status(result, 403);
}

// ============================================================================
// Comment Thread Tests
// ============================================================================

#[tokio::test]
async fn test_delete_comment_removes_subtree_and_reactions() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let c = engine.member("Eng").await.unwrap();
    let shoutout = engine.shoutout(a, &[]).await.unwrap();

    let root = engine.comment(b, shoutout, None).await.unwrap();
    let child = engine.comment(c, shoutout, Some(root)).await.unwrap();
    let grandchild = engine.comment(a, shoutout, Some(child)).await.unwrap();
    let sibling = engine.comment(c, shoutout, Some(root)).await.unwrap();
    let survivor = engine.comment(c, shoutout, None).await.unwrap();

    engine
        .react(a, ReactionTarget::Comment(grandchild), "like")
        .await
        .unwrap();
    engine
        .react(b, ReactionTarget::Comment(sibling), "clap")
        .await
        .unwrap();
    engine
        .react(a, ReactionTarget::Comment(survivor), "star")
        .await
        .unwrap();

    let removed = engine.comments().delete_comment(b, root).await.unwrap();
    assert_eq!(removed.removed_count, 4);
    assert_eq!(removed.reactions_removed, 2);

    let thread = engine.comments().list_thread(shoutout).await.unwrap();
    assert_eq!(thread.len(), 1);
    assert_eq!(id(&thread[0].comment.id).unwrap(), survivor);
    assert!(thread[0].replies.is_empty());

    let result = engine
        .reactions()
        .reaction_counts(ReactionTarget::Comment(grandchild))
        .await;
    assert_code(result, "UNKNOWN_COMMENT");

    let counts = engine
        .reactions()
        .reaction_counts(ReactionTarget::Comment(survivor))
        .await
        .unwrap();
    assert_eq!(counts[0].count, 1);
}

#[tokio::test]
async fn test_thread_is_nested_in_creation_order() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let shoutout = engine.shoutout(a, &[]).await.unwrap();

    let first = engine.comment(b, shoutout, None).await.unwrap();
    let second = engine.comment(a, shoutout, None).await.unwrap();
    let reply_one = engine.comment(a, shoutout, Some(first)).await.unwrap();
    let reply_two = engine.comment(b, shoutout, Some(first)).await.unwrap();

    let thread = engine.comments().list_thread(shoutout).await.unwrap();
    let roots: Vec<_> = thread.iter().map(|n| id(&n.comment.id).unwrap()).collect();
    assert_eq!(roots, vec![first, second]);

    let replies: Vec<_> = thread[0]
        .replies
        .iter()
        .map(|n| id(&n.comment.id).unwrap())
        .collect();
    assert_eq!(replies, vec![reply_one, reply_two]);

    let json = serde_json::to_value(&thread[0]).unwrap();
    assert_eq!(json["id"], first.to_string());
    assert_eq!(json["replies"][1]["parent_id"], first.to_string());
}

#[tokio::test]
async fn test_reply_parent_must_share_shoutout() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let one = engine.shoutout(a, &[]).await.unwrap();
    let two = engine.shoutout(a, &[]).await.unwrap();
    let parent = engine.comment(a, one, None).await.unwrap();

    let result = engine
        .comments()
        .add_comment(a, two, reply_request("hi", parent))
        .await;
    assert_code(result, "CROSS_THREAD_PARENT");

    let result = engine
        .comments()
        .add_comment(a, two, reply_request("hi", two))
        .await;
    assert_code(result, "UNKNOWN_COMMENT");

    let result = engine.comments().add_comment(a, two, comment_request("   ")).await;
    assert_code(result, "EMPTY_BODY");

    assert!(engine.comments().list_thread(two).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_comment_permissions() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let admin = engine.admin().await.unwrap();
    let shoutout = engine.shoutout(a, &[]).await.unwrap();
    let comment = engine.comment(b, shoutout, None).await.unwrap();

    let result = engine
        .comments()
        .edit_comment(a, comment, edit_comment_request("rewritten"))
        .await;
    assert_code(result, "NOT_AUTHOR");

    let edited = engine
        .comments()
        .edit_comment(b, comment, edit_comment_request("  Even better  "))
        .await
        .unwrap();
    assert_eq!(edited.body, "Even better");
    assert!(edited.edited_at.is_some());

    let result = engine.comments().delete_comment(a, comment).await;
    assert_status(result, 403);

    let removed = engine.comments().delete_comment(admin, comment).await.unwrap();
    assert_eq!(removed.removed_count, 1);

    let log = engine.moderation().list_admin_actions(admin, 10).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].action, "delete_comment");
    assert_eq!(id(&log[0].target_id).unwrap(), comment);
}

#[tokio::test]
async fn test_comments_disabled() {
    let engine = TestEngine::with_engagement(EngagementConfig {
        comments_enabled: false,
        ..EngagementConfig::default()
    });
    let a = engine.member("Eng").await.unwrap();
    let shoutout = engine.shoutout(a, &[]).await.unwrap();

    let result = engine
        .comments()
        .add_comment(a, shoutout, comment_request("hello"))
        .await;
    assert_code(result, "FEATURE_DISABLED");
}

// ============================================================================
// Notification Tests
// ============================================================================

#[tokio::test]
async fn test_reaction_notifies_owner_once_per_reaction_row() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let target = ReactionTarget::ShoutOut(engine.shoutout(a, &[]).await.unwrap());

    engine.react(b, target, "like").await.unwrap();
    engine.react(b, target, "clap").await.unwrap();
    assert_eq!(engine.inbox(a).await.unwrap().len(), 1);

    // removed then re-added is a new reaction row
    engine.react(b, target, "clap").await.unwrap();
    engine.react(b, target, "star").await.unwrap();

    let inbox = engine.inbox(a).await.unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(inbox.iter().all(|n| n.kind == NotificationKind::Reaction));
    assert!(inbox.iter().all(|n| id(&n.actor_id).unwrap() == b.id));

    engine.react(a, target, "like").await.unwrap();
    assert_eq!(engine.inbox(a).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_reaction_change_notifies_when_enabled() {
    let engine = TestEngine::with_engagement(EngagementConfig {
        notify_on_reaction_change: true,
        ..EngagementConfig::default()
    });
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let target = ReactionTarget::ShoutOut(engine.shoutout(a, &[]).await.unwrap());

    engine.react(b, target, "like").await.unwrap();
    engine.react(b, target, "clap").await.unwrap();

    let inbox = engine.inbox(a).await.unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(inbox.iter().any(|n| n.message.contains("clap")));
}

#[tokio::test]
async fn test_comment_and_reply_recipients() {
    let engine = TestEngine::start();
    let owner = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let c = engine.member("Eng").await.unwrap();
    let shoutout = engine.shoutout(owner, &[]).await.unwrap();

    let top = engine.comment(b, shoutout, None).await.unwrap();
    engine.comment(c, shoutout, Some(top)).await.unwrap();
    // replying to yourself notifies only the owner
    engine.comment(b, shoutout, Some(top)).await.unwrap();
    // the owner replying hears nothing about their own comment
    engine.comment(owner, shoutout, Some(top)).await.unwrap();

    let owner_inbox = engine.inbox(owner).await.unwrap();
    assert_eq!(owner_inbox.len(), 3);
    assert!(owner_inbox.iter().all(|n| n.kind == NotificationKind::Comment));

    let b_inbox = engine.inbox(b).await.unwrap();
    assert_eq!(b_inbox.len(), 2);
    assert!(b_inbox.iter().all(|n| n.kind == NotificationKind::Reply));

    assert!(engine.inbox(c).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reply_to_owner_is_not_doubled() {
    let engine = TestEngine::start();
    let owner = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let shoutout = engine.shoutout(owner, &[]).await.unwrap();

    let top = engine.comment(owner, shoutout, None).await.unwrap();
    engine.comment(b, shoutout, Some(top)).await.unwrap();

    let inbox = engine.inbox(owner).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::Comment);
}

#[tokio::test]
async fn test_reply_notification_switch() {
    let engine = TestEngine::with_engagement(EngagementConfig {
        notify_reply_author: false,
        ..EngagementConfig::default()
    });
    let owner = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let c = engine.member("Eng").await.unwrap();
    let shoutout = engine.shoutout(owner, &[]).await.unwrap();

    let top = engine.comment(b, shoutout, None).await.unwrap();
    engine.comment(c, shoutout, Some(top)).await.unwrap();

    assert!(engine.inbox(b).await.unwrap().is_empty());
    assert_eq!(engine.inbox(owner).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_notify_is_idempotent_per_event() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let shoutout = engine.shoutout(a, &[]).await.unwrap();

    let request = NotificationRequest::new(
        b.id,
        a.id,
        NotificationKind::Tag,
        EventKey::tag(shoutout),
        "tagged you in a shout-out",
    )
    .shoutout(shoutout);

    let first = engine.notifications().notify(request.clone()).await.unwrap();
    assert!(matches!(first, DispatchOutcome::Created(_)));

    let second = engine.notifications().notify(request.clone()).await.unwrap();
    assert_eq!(second, DispatchOutcome::Duplicate);

    let mut to_self = request;
    to_self.recipient_id = a.id;
    let third = engine.notifications().notify(to_self).await.unwrap();
    assert_eq!(third, DispatchOutcome::SkippedSelf);

    assert_eq!(engine.inbox(b).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_notification_failure_keeps_mutation() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let target = ReactionTarget::ShoutOut(engine.shoutout(a, &[]).await.unwrap());

    engine.store.set_notifications_down(true);

    let toggled = engine.react(b, target, "like").await.unwrap();
    assert_eq!(toggled.state, ToggleState::Added);

    let request = NotificationRequest::new(
        a.id,
        b.id,
        NotificationKind::Reaction,
        EventKey::tag(target.id()),
        "probe",
    );
    let err = engine.notifications().notify(request).await.unwrap_err();
    assert!(matches!(err, NotifyError::Store(_)));

    engine.store.set_notifications_down(false);

    assert!(engine.inbox(a).await.unwrap().is_empty());
    let counts = engine.reactions().reaction_counts(target).await.unwrap();
    assert_eq!(counts[0].count, 1);
    assert_eq!(engine.score(a).await.unwrap(), 7);
}

#[tokio::test]
async fn test_inactive_members_are_skipped() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let admin = engine.admin().await.unwrap();
    let target = ReactionTarget::ShoutOut(engine.shoutout(a, &[]).await.unwrap());

    engine.members().deactivate_member(admin, a.id).await.unwrap();
    engine.react(b, target, "like").await.unwrap();
    assert!(engine.inbox(a).await.unwrap().is_empty());

    let result = engine
        .shoutouts()
        .create_shoutout(b, shoutout_request("Thanks!", &[a.id]))
        .await;
    assert_code(result, "UNKNOWN_MEMBER");

    let result = engine.members().deactivate_member(b, admin.id).await;
    assert_code(result, "ADMIN_REQUIRED");
}

#[tokio::test]
async fn test_inbox_read_state() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let c = engine.member("Eng").await.unwrap();
    let shoutout = engine.shoutout(a, &[]).await.unwrap();
    engine.comment(b, shoutout, None).await.unwrap();
    engine.comment(c, shoutout, None).await.unwrap();

    let inbox = engine.inbox(a).await.unwrap();
    assert_eq!(engine.notifications().unread_count(a).await.unwrap(), 2);
    let first = id(&inbox[0].id).unwrap();

    let result = engine.notifications().mark_read(b, first).await;
    assert_code(result, "NOT_RECIPIENT");

    let result = engine.notifications().mark_read(a, shoutout).await;
    assert_code(result, "UNKNOWN_NOTIFICATION");

    let read = engine.notifications().mark_read(a, first).await.unwrap();
    assert!(read.read);
    assert_eq!(engine.notifications().unread_count(a).await.unwrap(), 1);

    let unread = engine.notifications().list(a, true, 10).await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_ne!(unread[0].id, inbox[0].id);

    assert_eq!(engine.notifications().mark_all_read(a).await.unwrap(), 1);
    assert_eq!(engine.notifications().unread_count(a).await.unwrap(), 0);
    assert_eq!(engine.notifications().mark_all_read(a).await.unwrap(), 0);
}

// ============================================================================
// Shout-out Tests
// ============================================================================

#[tokio::test]
async fn test_shoutout_tags_and_normalises_recipients() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();

    let shoutout = engine
        .shoutouts()
        .create_shoutout(a, shoutout_request("  Shipped it!  ", &[b.id, a.id, b.id]))
        .await
        .unwrap();
    assert_eq!(shoutout.message, "Shipped it!");
    assert_eq!(shoutout.recipient_ids, vec![b.id.to_string()]);

    let inbox = engine.inbox(b).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::Tag);
    assert_eq!(inbox[0].shoutout_id.as_deref(), Some(shoutout.id.as_str()));
    assert!(engine.inbox(a).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_shoutout_edit_limit() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let shoutout = engine.shoutout(a, &[]).await.unwrap();

    let result = engine
        .shoutouts()
        .edit_shoutout(b, shoutout, edit_shoutout_request("mine now"))
        .await;
    assert_code(result, "NOT_AUTHOR");

    for n in 1..=2 {
        let edited = engine
            .shoutouts()
            .edit_shoutout(a, shoutout, edit_shoutout_request(&format!("take {n}")))
            .await
            .unwrap();
        assert_eq!(edited.edit_count, n);
    }

    let result = engine
        .shoutouts()
        .edit_shoutout(a, shoutout, edit_shoutout_request("take 3"))
        .await;
    assert_code(result, "EDIT_LIMIT_REACHED");

    let current = engine.shoutouts().get_shoutout(shoutout).await.unwrap();
    assert_eq!(current.message, "take 2");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_edits_respect_the_limit() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let shoutout = engine.shoutout(a, &[]).await.unwrap();

    let handles: Vec<_> = (0..12)
        .map(|n| {
            let ctx = engine.ctx.clone();
            tokio::spawn(async move {
                ShoutOutService::new(&ctx)
                    .edit_shoutout(a, shoutout, edit_shoutout_request(&format!("take {n}")))
                    .await
            })
        })
        .collect();

    let mut applied = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(edited) => applied.push(edited.edit_count),
            Err(err) => assert_eq!(err.error_code(), "EDIT_LIMIT_REACHED"),
        }
    }
    applied.sort_unstable();
    assert_eq!(applied, vec![1, 2]);

    let current = engine.shoutouts().get_shoutout(shoutout).await.unwrap();
    assert_eq!(current.edit_count, 2);
}

#[tokio::test]
async fn test_shoutout_delete_permissions() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let admin = engine.admin().await.unwrap();
    let shoutout = engine.shoutout(a, &[b]).await.unwrap();

    let result = engine.shoutouts().delete_shoutout(b, shoutout).await;
    assert_status(result, 403);

    let removed = engine.shoutouts().delete_shoutout(admin, shoutout).await.unwrap();
    assert_eq!(removed.notifications_removed, 1);

    let log = engine.moderation().list_admin_actions(admin, 10).await.unwrap();
    assert_eq!(log[0].action, "delete_shoutout");

    let result = engine.shoutouts().get_shoutout(shoutout).await;
    assert_code(result, "UNKNOWN_SHOUTOUT");
}

// ============================================================================
// Moderation Tests
// ============================================================================

#[tokio::test]
async fn test_resolve_remove_then_conflict() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let admin = engine.admin().await.unwrap();
    let shoutout = engine.shoutout(a, &[b]).await.unwrap();
    let target = ReactionTarget::ShoutOut(shoutout);
    engine.comment(b, shoutout, None).await.unwrap();

    let report = engine
        .moderation()
        .create_report(b, report_request(target, "off topic"))
        .await
        .unwrap();
    assert_eq!(report.status, ReportStatus::Pending);
    let report_id = id(&report.id).unwrap();

    let result = engine
        .moderation()
        .create_report(b, report_request(target, "again"))
        .await;
    assert_code(result, "DUPLICATE_REPORT");

    let result = engine
        .moderation()
        .resolve(b, report_id, resolve_request("remove"))
        .await;
    assert_code(result, "ADMIN_REQUIRED");

    let resolved = engine
        .moderation()
        .resolve(admin, report_id, resolve_request("remove"))
        .await
        .unwrap();
    assert_eq!(resolved.status, ReportStatus::Resolved);
    assert_eq!(resolved.resolved_by, Some(admin.id.to_string()));

    assert_code(engine.shoutouts().get_shoutout(shoutout).await, "UNKNOWN_SHOUTOUT");
    assert_code(engine.comments().list_thread(shoutout).await, "UNKNOWN_SHOUTOUT");

    let result = engine
        .moderation()
        .resolve(admin, report_id, resolve_request("dismiss"))
        .await;
    assert_code(result, "REPORT_ALREADY_CLOSED");

    let reports = engine
        .moderation()
        .list_reports(admin, Some("resolved"), 10)
        .await
        .unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].status, ReportStatus::Resolved);

    let inbox = engine.inbox(a).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::Moderation);
    assert!(engine.inbox(b).await.unwrap().is_empty());

    let log = engine.moderation().list_admin_actions(admin, 10).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].action, "resolve_remove");
    assert_eq!(log[0].report_id, Some(report.id));
}

#[tokio::test]
async fn test_dismiss_keeps_content() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let admin = engine.admin().await.unwrap();
    let shoutout = engine.shoutout(a, &[]).await.unwrap();
    let comment = engine.comment(a, shoutout, None).await.unwrap();

    let report = engine
        .moderation()
        .create_report(b, report_request(ReactionTarget::Comment(comment), "rude"))
        .await
        .unwrap();
    let dismissed = engine
        .moderation()
        .resolve(admin, id(&report.id).unwrap(), resolve_request("dismiss"))
        .await
        .unwrap();
    assert_eq!(dismissed.status, ReportStatus::Dismissed);

    assert_eq!(engine.comments().list_thread(shoutout).await.unwrap().len(), 1);
    assert!(engine.inbox(a).await.unwrap().is_empty());

    let stats = engine.moderation().report_stats(admin).await.unwrap();
    assert_eq!((stats.total, stats.pending, stats.dismissed), (1, 0, 1));

    // closed reports do not block a new one
    engine
        .moderation()
        .create_report(b, report_request(ReactionTarget::Comment(comment), "still rude"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_report_validation() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let admin = engine.admin().await.unwrap();
    let shoutout = engine.shoutout(a, &[]).await.unwrap();

    let result = engine
        .moderation()
        .create_report(admin, report_request(ReactionTarget::Comment(shoutout), "spam"))
        .await;
    assert_code(result, "UNKNOWN_COMMENT");

    let result = engine
        .moderation()
        .create_report(admin, report_request(ReactionTarget::ShoutOut(shoutout), "   "))
        .await;
    assert_code(result, "VALIDATION_ERROR");

    let report = engine
        .moderation()
        .create_report(admin, report_request(ReactionTarget::ShoutOut(shoutout), "spam"))
        .await
        .unwrap();
    let result = engine
        .moderation()
        .resolve(admin, id(&report.id).unwrap(), resolve_request("ban"))
        .await;
    assert_status(result, 400);

    let result = engine.moderation().list_reports(a, None, 10).await;
    assert_code(result, "ADMIN_REQUIRED");
}

// ============================================================================
// Scoring Tests
// ============================================================================

#[tokio::test]
async fn test_scenario_reaction_scores_and_cascade() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let shoutout = engine.shoutout(a, &[b]).await.unwrap();
    let target = ReactionTarget::ShoutOut(shoutout);

    let before_a = engine.score(a).await.unwrap();
    let before_b = engine.score(b).await.unwrap();

    engine.react(b, target, "like").await.unwrap();

    let reactions: Vec<_> = engine
        .inbox(a)
        .await
        .unwrap()
        .into_iter()
        .filter(|n| n.kind == NotificationKind::Reaction)
        .collect();
    assert_eq!(reactions.len(), 1);
    assert_eq!(id(&reactions[0].actor_id).unwrap(), b.id);

    assert_eq!(engine.score(a).await.unwrap(), before_a + 2);
    assert_eq!(engine.score(b).await.unwrap(), before_b + 1);

    engine.comment(b, shoutout, None).await.unwrap();
    assert_eq!(engine.score(a).await.unwrap(), before_a + 4);

    let removed = engine.shoutouts().delete_shoutout(a, shoutout).await.unwrap();
    assert_eq!(removed.comments_removed, 1);
    assert_eq!(removed.reactions_removed, 1);
    assert_eq!(removed.notifications_removed, 3);

    assert_code(engine.reactions().reaction_counts(target).await, "UNKNOWN_SHOUTOUT");
    assert_eq!(engine.entry(a).await.unwrap().counts, ActivityCounts::default());
    assert_eq!(engine.entry(b).await.unwrap().counts, ActivityCounts::default());
    assert_eq!(engine.score(a).await.unwrap(), 0);
    assert_eq!(engine.score(b).await.unwrap(), 0);
}

/// Mixed activity touching every counter
async fn play_script(engine: &TestEngine) -> Vec<LeaderboardEntry> {
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let c = engine.member("Ops").await.unwrap();

    let shoutout = engine.shoutout(a, &[b, c]).await.unwrap();
    let target = ReactionTarget::ShoutOut(shoutout);
    engine.react(b, target, "like").await.unwrap();
    engine.react(c, target, "clap").await.unwrap();
    engine.react(c, target, "like").await.unwrap();

    let top = engine.comment(b, shoutout, None).await.unwrap();
    let reply = engine.comment(c, shoutout, Some(top)).await.unwrap();
    engine
        .react(a, ReactionTarget::Comment(top), "star")
        .await
        .unwrap();
    engine
        .react(b, ReactionTarget::Comment(top), "like")
        .await
        .unwrap();
    engine.comments().delete_comment(c, reply).await.unwrap();

    let mut entries = Vec::new();
    for member in [a, b, c] {
        entries.push(engine.entry(member).await.unwrap());
    }
    entries
}

#[tokio::test]
async fn test_lazy_and_eager_recompute_agree() {
    let lazy = TestEngine::start();
    let eager = TestEngine::eager();

    let lazy_entries = play_script(&lazy).await;
    let eager_entries = play_script(&eager).await;

    let scores: Vec<i64> = lazy_entries.iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![12, 4, 1]);

    for (l, e) in lazy_entries.iter().zip(&eager_entries) {
        assert_eq!(l.score, e.score);
        assert_eq!(l.counts, e.counts);
        assert!(!l.is_stale());
        assert!(!e.is_stale());
    }

    assert_eq!(
        lazy_entries[1].counts,
        ActivityCounts {
            shoutouts_sent: 0,
            tags_received: 1,
            reactions_received: 1,
            comments_received: 0,
            reactions_given: 2,
        }
    );
}

#[tokio::test]
async fn test_eager_mode_leaves_no_stale_entries() {
    let engine = TestEngine::eager();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let shoutout = engine.shoutout(a, &[b]).await.unwrap();
    engine
        .react(b, ReactionTarget::ShoutOut(shoutout), "like")
        .await
        .unwrap();

    let repo = engine.ctx.leaderboard_repo();
    for member in [a, b] {
        let entry = repo.ensure(member.id).await.unwrap();
        assert!(!entry.is_stale());
    }
    assert_eq!(repo.ensure(a.id).await.unwrap().score, 7);

    let lazy = TestEngine::start();
    let c = lazy.member("Eng").await.unwrap();
    lazy.shoutout(c, &[]).await.unwrap();
    let entry = lazy.ctx.leaderboard_repo().ensure(c.id).await.unwrap();
    assert!(entry.is_stale());
    assert_eq!(lazy.score(c).await.unwrap(), 5);
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let shoutout = engine.shoutout(a, &[b]).await.unwrap();
    engine
        .react(b, ReactionTarget::ShoutOut(shoutout), "star")
        .await
        .unwrap();

    let first = engine.scores().recompute(a.id).await.unwrap();
    let second = engine.scores().recompute(a.id).await.unwrap();
    assert_eq!(first.score, second.score);
    assert_eq!(first.counts, second.counts);
    assert_eq!(first.revision, second.revision);

    engine.scores().mark_stale(&[a.id]).await.unwrap();
    let third = engine.scores().entry(a.id).await.unwrap();
    assert_eq!(third.score, first.score);
    assert!(third.revision > first.revision);
}

#[tokio::test]
async fn test_leaderboard_order_scope_and_limits() {
    let engine = TestEngine::start();
    let a = engine.member("Eng").await.unwrap();
    let b = engine.member("Eng").await.unwrap();
    let c = engine.member("Ops").await.unwrap();
    let admin = engine.admin().await.unwrap();

    engine.shoutout(c, &[]).await.unwrap();
    engine.shoutout(c, &[]).await.unwrap();
    engine.shoutout(b, &[]).await.unwrap();

    let board = engine
        .scores()
        .leaderboard(LeaderboardScope::Global, 10)
        .await
        .unwrap();
    let order: Vec<_> = board.iter().map(|r| id(&r.member_id).unwrap()).collect();
    assert_eq!(order, vec![c.id, b.id, a.id, admin.id]);
    assert_eq!(board[0].score, 10);
    assert_eq!(board[2].rank, 3);
    assert_eq!(board[3].rank, 4);

    let eng = engine
        .scores()
        .leaderboard(LeaderboardScope::Department("Eng".into()), 10)
        .await
        .unwrap();
    assert_eq!(eng.len(), 2);
    assert_eq!(eng[0].department, "Eng");

    let clamped = engine
        .scores()
        .leaderboard(LeaderboardScope::Global, 0)
        .await
        .unwrap();
    assert_eq!(clamped.len(), 1);

    let standing = engine
        .scores()
        .standing(a.id, LeaderboardScope::Global)
        .await
        .unwrap();
    assert_eq!(standing.rank, 3);
    assert_eq!(standing.score, 0);

    let standing = engine
        .scores()
        .standing(a.id, LeaderboardScope::Department("Eng".into()))
        .await
        .unwrap();
    assert_eq!(standing.rank, 2);

    engine.members().deactivate_member(admin, c.id).await.unwrap();
    let board = engine
        .scores()
        .leaderboard(LeaderboardScope::Global, 10)
        .await
        .unwrap();
    assert!(board.iter().all(|r| r.member_id != c.id.to_string()));
    assert_eq!(id(&board[0].member_id).unwrap(), b.id);

    let json = serde_json::to_value(&board[0]).unwrap();
    assert_eq!(json["member_id"], b.id.to_string());
    assert_eq!(json["counts"]["shoutouts_sent"], 1);
}
