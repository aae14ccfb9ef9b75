//! Member entity <-> model mapper

use brag_core::entities::Member;
use brag_core::error::DomainError;
use brag_core::value_objects::Snowflake;

use crate::models::MemberModel;

impl TryFrom<MemberModel> for Member {
    type Error = DomainError;

    fn try_from(model: MemberModel) -> Result<Self, Self::Error> {
        Ok(Member {
            id: Snowflake::new(model.id),
            display_name: model.display_name,
            email: model.email,
            department: model.department,
            role: model
                .role
                .parse()
                .map_err(|_| DomainError::DatabaseError(format!("unknown role: {}", model.role)))?,
            deleted: model.deleted,
            joined_at: model.joined_at,
        })
    }
}
