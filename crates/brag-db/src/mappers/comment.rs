//! Comment entity <-> model mapper

use brag_core::entities::Comment;
use brag_core::value_objects::Snowflake;

use crate::models::CommentModel;

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            shoutout_id: Snowflake::new(model.shoutout_id),
            author_id: Snowflake::new(model.author_id),
            parent_id: model.parent_id.map(Snowflake::new),
            body: model.body,
            created_at: model.created_at,
            edited_at: model.edited_at,
        }
    }
}
