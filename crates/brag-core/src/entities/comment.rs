//! Comment entity and the per-shout-out comment forest

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Comment entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub shoutout_id: Snowflake,
    pub author_id: Snowflake,
    /// Parent comment within the same shout-out, `None` for top-level
    pub parent_id: Option<Snowflake>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(
        id: Snowflake,
        shoutout_id: Snowflake,
        author_id: Snowflake,
        parent_id: Option<Snowflake>,
        body: String,
    ) -> Self {
        Self {
            id,
            shoutout_id,
            author_id,
            parent_id,
            body,
            created_at: Utc::now(),
            edited_at: None,
        }
    }

    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn edit(&mut self, body: String) {
        self.body = body;
        self.edited_at = Some(Utc::now());
    }
}

/// Child index over `(id, parent_id)` edges
///
/// Nodes are addressed only by id; the walk never follows object references,
/// so a malformed edge set cannot loop forever.
#[derive(Debug, Default)]
pub struct CommentArena {
    children: HashMap<Snowflake, Vec<Snowflake>>,
    roots: Vec<Snowflake>,
}

impl CommentArena {
    pub fn from_edges(edges: impl IntoIterator<Item = (Snowflake, Option<Snowflake>)>) -> Self {
        let edges: Vec<_> = edges.into_iter().collect();
        let known: HashSet<Snowflake> = edges.iter().map(|(id, _)| *id).collect();

        let mut arena = Self::default();
        for (id, parent) in edges {
            match parent {
                Some(parent) if known.contains(&parent) => {
                    arena.children.entry(parent).or_default().push(id);
                }
                _ => arena.roots.push(id),
            }
        }
        arena.roots.sort_unstable();
        for kids in arena.children.values_mut() {
            kids.sort_unstable();
        }
        arena
    }

    pub fn children(&self, id: Snowflake) -> &[Snowflake] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    pub fn roots(&self) -> &[Snowflake] {
        &self.roots
    }

    /// Breadth-first walk from `root`, root first
    pub fn subtree(&self, root: Snowflake) -> Vec<Snowflake> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            out.push(id);
            queue.extend(self.children(id).iter().copied());
        }
        out
    }
}

/// A comment with its nested replies, for thread rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    /// Assemble the forest for one shout-out; siblings are ordered by id
    pub fn build_forest(comments: Vec<Comment>) -> Vec<CommentNode> {
        let arena = CommentArena::from_edges(comments.iter().map(|c| (c.id, c.parent_id)));
        let mut by_id: HashMap<Snowflake, Comment> =
            comments.into_iter().map(|c| (c.id, c)).collect();

        arena
            .roots()
            .iter()
            .filter_map(|id| Self::assemble(*id, &arena, &mut by_id))
            .collect()
    }

    fn assemble(
        id: Snowflake,
        arena: &CommentArena,
        by_id: &mut HashMap<Snowflake, Comment>,
    ) -> Option<CommentNode> {
        let comment = by_id.remove(&id)?;
        let replies = arena
            .children(id)
            .iter()
            .filter_map(|child| Self::assemble(*child, arena, by_id))
            .collect();
        Some(CommentNode { comment, replies })
    }

    /// Number of nodes in this subtree including itself
    pub fn size(&self) -> usize {
        1 + self.replies.iter().map(CommentNode::size).sum::<usize>()
    }
}
