//! Member service
//!
//! Directory operations the identity layer delegates to the engine:
//! onboarding a member and soft-deleting one.

use brag_core::entities::{Member, Role};
use brag_core::{Actor, DomainError, Snowflake};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{MemberResponse, RegisterMemberRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Member service
pub struct MemberService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MemberService<'a> {
    /// Create a new MemberService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a member record
    #[instrument(skip(self, request))]
    pub async fn register_member(&self, request: RegisterMemberRequest) -> ServiceResult<MemberResponse> {
        request.validate()?;

        let member = Member::new(
            self.ctx.generate_id(),
            request.display_name.trim(),
            request.email.trim().to_ascii_lowercase(),
            request.department.trim(),
            request.role.unwrap_or(Role::Employee),
        );
        self.ctx.member_repo().create(&member).await?;

        info!(member_id = %member.id, department = %member.department, "Member registered");
        Ok(MemberResponse::from(&member))
    }

    #[instrument(skip(self))]
    pub async fn get_member(&self, member_id: Snowflake) -> ServiceResult<MemberResponse> {
        let member = self
            .ctx
            .member_repo()
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Member", member_id.to_string()))?;

        Ok(MemberResponse::from(&member))
    }

    /// Soft-delete a member; their rows stay, they leave the leaderboard
    #[instrument(skip(self))]
    pub async fn deactivate_member(&self, admin: Actor, member_id: Snowflake) -> ServiceResult<()> {
        if !admin.is_admin() {
            return Err(DomainError::AdminRequired.into());
        }

        self.ctx.member_repo().soft_delete(member_id).await?;
        info!(member_id = %member_id, "Member deactivated");
        Ok(())
    }
}
