//! AdminAction entity <-> model mapper

use brag_core::entities::{AdminAction, ContentTarget};
use brag_core::error::DomainError;
use brag_core::value_objects::Snowflake;

use crate::models::AdminActionModel;

impl TryFrom<AdminActionModel> for AdminAction {
    type Error = DomainError;

    fn try_from(model: AdminActionModel) -> Result<Self, Self::Error> {
        Ok(AdminAction {
            id: Snowflake::new(model.id),
            admin_id: Snowflake::new(model.admin_id),
            action: model.action.parse()?,
            target: ContentTarget::from_parts(&model.target_type, Snowflake::new(model.target_id))?,
            report_id: model.report_id.map(Snowflake::new),
            created_at: model.created_at,
        })
    }
}
