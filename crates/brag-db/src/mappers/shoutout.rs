//! ShoutOut entity <-> model mapper

use brag_core::entities::ShoutOut;
use brag_core::value_objects::Snowflake;

use crate::models::ShoutOutModel;

impl From<ShoutOutModel> for ShoutOut {
    fn from(model: ShoutOutModel) -> Self {
        ShoutOut {
            id: Snowflake::new(model.id),
            author_id: Snowflake::new(model.author_id),
            message: model.message,
            media: model.media,
            recipients: model.recipients.into_iter().map(Snowflake::new).collect(),
            created_at: model.created_at,
            edited_at: model.edited_at,
            edit_count: model.edit_count,
        }
    }
}
