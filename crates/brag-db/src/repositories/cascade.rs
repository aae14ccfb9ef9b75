//! Statements shared by several repositories, run on a caller's transaction
//!
//! Content removal is never a bare `DELETE`: every dependent row is removed
//! explicitly and counted, and every member whose counters read one of those
//! rows gets their leaderboard revision bumped before the caller commits.

use sqlx::PgConnection;

use brag_core::entities::{AdminAction, CommentArena, ContentRemoval, ContentTarget};
use brag_core::traits::RepoResult;
use brag_core::value_objects::Snowflake;

use crate::mappers::raw_ids;
use crate::models::CommentEdgeModel;

use super::error::map_db_error;

/// Bump the leaderboard revision of each member, creating missing entries
pub(crate) async fn bump_revisions(conn: &mut PgConnection, members: &[Snowflake]) -> RepoResult<()> {
    if members.is_empty() {
        return Ok(());
    }
    // Sorted and deduplicated so concurrent bumps lock rows in the same order
    let mut ids = raw_ids(members);
    ids.sort_unstable();
    ids.dedup();

    sqlx::query(
        r#"
        INSERT INTO leaderboard_entries (member_id)
        SELECT UNNEST($1::BIGINT[])
        ON CONFLICT (member_id) DO UPDATE
        SET revision = leaderboard_entries.revision + 1
        "#,
    )
    .bind(&ids)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

/// Author of a shout-out or comment, if it still exists
pub(crate) async fn content_author(
    conn: &mut PgConnection,
    target: ContentTarget,
) -> RepoResult<Option<Snowflake>> {
    let sql = match target {
        ContentTarget::ShoutOut(_) => "SELECT author_id FROM shoutouts WHERE id = $1 FOR SHARE",
        ContentTarget::Comment(_) => "SELECT author_id FROM comments WHERE id = $1 FOR SHARE",
    };
    let author = sqlx::query_scalar::<_, i64>(sql)
        .bind(target.id().into_inner())
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?;

    Ok(author.map(Snowflake::new))
}

/// Record an admin action
pub(crate) async fn insert_admin_action(conn: &mut PgConnection, action: &AdminAction) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO admin_actions (id, admin_id, action, target_type, target_id, report_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(action.id.into_inner())
    .bind(action.admin_id.into_inner())
    .bind(action.action.as_str())
    .bind(action.target.kind_str())
    .bind(action.target.id().into_inner())
    .bind(action.report_id.map(Snowflake::into_inner))
    .bind(action.created_at)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

/// Delete a shout-out with its comments, reactions, notifications, tags,
/// media and pending reports
///
/// Returns the removal summary and the shout-out author, or `None` when the
/// shout-out no longer exists.
pub(crate) async fn delete_shoutout_tree(
    conn: &mut PgConnection,
    id: Snowflake,
) -> RepoResult<Option<(ContentRemoval, Snowflake)>> {
    let author = sqlx::query_scalar::<_, i64>("SELECT author_id FROM shoutouts WHERE id = $1 FOR UPDATE")
        .bind(id.into_inner())
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?;
    let Some(author) = author.map(Snowflake::new) else {
        return Ok(None);
    };

    let mut removal = ContentRemoval::default();
    removal.touch(author);

    let recipients = sqlx::query_scalar::<_, i64>(
        "SELECT member_id FROM shoutout_recipients WHERE shoutout_id = $1",
    )
    .bind(id.into_inner())
    .fetch_all(&mut *conn)
    .await
    .map_err(map_db_error)?;
    for member in recipients {
        removal.touch(Snowflake::new(member));
    }

    let comments = sqlx::query_as::<_, CommentEdgeModel>(
        "SELECT id, parent_id, author_id FROM comments WHERE shoutout_id = $1 FOR UPDATE",
    )
    .bind(id.into_inner())
    .fetch_all(&mut *conn)
    .await
    .map_err(map_db_error)?;
    let comment_ids: Vec<i64> = comments.iter().map(|c| c.id).collect();
    for comment in &comments {
        removal.touch(Snowflake::new(comment.author_id));
    }

    let reactors = sqlx::query_scalar::<_, i64>(
        r#"
        DELETE FROM reactions
        WHERE (target_type = 'shoutout' AND target_id = $1)
           OR (target_type = 'comment' AND target_id = ANY($2))
        RETURNING member_id
        "#,
    )
    .bind(id.into_inner())
    .bind(&comment_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_db_error)?;
    removal.reactions_removed = reactors.len() as u64;
    for member in reactors {
        removal.touch(Snowflake::new(member));
    }

    removal.notifications_removed = sqlx::query(
        "DELETE FROM notifications WHERE shoutout_id = $1 OR comment_id = ANY($2)",
    )
    .bind(id.into_inner())
    .bind(&comment_ids)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?
    .rows_affected();

    removal.reports_removed = sqlx::query(
        r#"
        DELETE FROM reports
        WHERE status = 'pending'
          AND ((target_type = 'shoutout' AND target_id = $1)
            OR (target_type = 'comment' AND target_id = ANY($2)))
        "#,
    )
    .bind(id.into_inner())
    .bind(&comment_ids)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?
    .rows_affected();

    removal.comments_removed = sqlx::query("DELETE FROM comments WHERE shoutout_id = $1")
        .bind(id.into_inner())
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?
        .rows_affected();

    // Tag and media rows go with the shout-out through ON DELETE CASCADE
    removal.shoutouts_removed = sqlx::query("DELETE FROM shoutouts WHERE id = $1")
        .bind(id.into_inner())
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?
        .rows_affected();

    bump_revisions(conn, &removal.affected_members).await?;

    Ok(Some((removal, author)))
}

/// Delete a comment, all of its descendants and their dependents
///
/// Returns the removal summary and the comment author, or `None` when the
/// comment no longer exists.
pub(crate) async fn delete_comment_subtree(
    conn: &mut PgConnection,
    id: Snowflake,
) -> RepoResult<Option<(ContentRemoval, Snowflake)>> {
    let root = sqlx::query_as::<_, (i64, i64)>(
        "SELECT shoutout_id, author_id FROM comments WHERE id = $1",
    )
    .bind(id.into_inner())
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_db_error)?;
    let Some((shoutout_id, author)) = root else {
        return Ok(None);
    };
    let author = Snowflake::new(author);

    let owner = sqlx::query_scalar::<_, i64>("SELECT author_id FROM shoutouts WHERE id = $1")
        .bind(shoutout_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_error)?;

    // Locking the whole thread blocks replies to nodes about to disappear
    let edges = sqlx::query_as::<_, CommentEdgeModel>(
        "SELECT id, parent_id, author_id FROM comments WHERE shoutout_id = $1 ORDER BY id FOR UPDATE",
    )
    .bind(shoutout_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_db_error)?;

    let arena = CommentArena::from_edges(
        edges
            .iter()
            .map(|e| (Snowflake::new(e.id), e.parent_id.map(Snowflake::new))),
    );
    let doomed = arena.subtree(id);
    let doomed_ids = raw_ids(&doomed);

    let mut removal = ContentRemoval::default();
    removal.touch(Snowflake::new(owner));
    for edge in edges.iter().filter(|e| doomed_ids.contains(&e.id)) {
        removal.touch(Snowflake::new(edge.author_id));
    }

    let reactors = sqlx::query_scalar::<_, i64>(
        r#"
        DELETE FROM reactions
        WHERE target_type = 'comment' AND target_id = ANY($1)
        RETURNING member_id
        "#,
    )
    .bind(&doomed_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_db_error)?;
    removal.reactions_removed = reactors.len() as u64;
    for member in reactors {
        removal.touch(Snowflake::new(member));
    }

    removal.notifications_removed =
        sqlx::query("DELETE FROM notifications WHERE comment_id = ANY($1)")
            .bind(&doomed_ids)
            .execute(&mut *conn)
            .await
            .map_err(map_db_error)?
            .rows_affected();

    removal.reports_removed = sqlx::query(
        r#"
        DELETE FROM reports
        WHERE status = 'pending' AND target_type = 'comment' AND target_id = ANY($1)
        "#,
    )
    .bind(&doomed_ids)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?
    .rows_affected();

    removal.comments_removed = sqlx::query("DELETE FROM comments WHERE id = ANY($1)")
        .bind(&doomed_ids)
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?
        .rows_affected();

    bump_revisions(conn, &removal.affected_members).await?;

    Ok(Some((removal, author)))
}
