//! Reaction entity <-> model mapper

use brag_core::entities::{Reaction, ReactionCount, ReactionKind, ReactionTarget};
use brag_core::error::DomainError;
use brag_core::value_objects::Snowflake;

use crate::models::{ReactionCountModel, ReactionModel};

impl TryFrom<ReactionModel> for Reaction {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        Ok(Reaction {
            id: Snowflake::new(model.id),
            target: ReactionTarget::from_parts(&model.target_type, Snowflake::new(model.target_id))?,
            member_id: Snowflake::new(model.member_id),
            kind: stored_kind(&model.kind)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<ReactionCountModel> for ReactionCount {
    type Error = DomainError;

    fn try_from(model: ReactionCountModel) -> Result<Self, Self::Error> {
        Ok(ReactionCount::new(stored_kind(&model.kind)?, model.count))
    }
}

// A bad value in the table is a store fault, not caller input
fn stored_kind(raw: &str) -> Result<ReactionKind, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::DatabaseError(format!("unknown reaction type: {raw}")))
}
