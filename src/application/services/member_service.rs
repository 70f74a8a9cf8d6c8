//! Member Service
//!
//! Profile lookup and update for the signed-in member.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::application::dto::request::UpdateMemberRequest;
use crate::application::dto::response::MemberResponse;
use crate::domain::{CurrentMember, Member, MemberRepository, RegionRepository};
use crate::shared::error::{AppError, ErrorCode};

/// Member service trait
#[async_trait]
pub trait MemberService: Send + Sync {
    /// Get the caller's profile
    async fn get_member_info(&self, member: CurrentMember) -> Result<MemberResponse, AppError>;

    /// Update the caller's profile; absent fields stay unchanged
    async fn update_member_info(
        &self,
        member: CurrentMember,
        update: UpdateMemberRequest,
    ) -> Result<MemberResponse, AppError>;
}

/// MemberService implementation
pub struct MemberServiceImpl<M, R>
where
    M: MemberRepository,
    R: RegionRepository,
{
    member_repo: Arc<M>,
    region_repo: Arc<R>,
}

impl<M, R> MemberServiceImpl<M, R>
where
    M: MemberRepository,
    R: RegionRepository,
{
    /// Create a new MemberServiceImpl
    pub fn new(member_repo: Arc<M>, region_repo: Arc<R>) -> Self {
        Self {
            member_repo,
            region_repo,
        }
    }

    async fn find_member(&self, id: i64) -> Result<Member, AppError> {
        self.member_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::Code(ErrorCode::MemberNotFound))
    }
}

#[async_trait]
impl<M, R> MemberService for MemberServiceImpl<M, R>
where
    M: MemberRepository + 'static,
    R: RegionRepository + 'static,
{
    #[instrument(skip(self), fields(member_id = member.id))]
    async fn get_member_info(&self, member: CurrentMember) -> Result<MemberResponse, AppError> {
        Ok(MemberResponse::from(self.find_member(member.id).await?))
    }

    #[instrument(skip(self, update), fields(member_id = member.id))]
    async fn update_member_info(
        &self,
        member: CurrentMember,
        update: UpdateMemberRequest,
    ) -> Result<MemberResponse, AppError> {
        let mut stored = self.find_member(member.id).await?;

        if let Some(region_id) = update.region_id {
            self.region_repo
                .find_by_id(region_id)
                .await?
                .ok_or(AppError::Code(ErrorCode::RegionNotFound))?;
            stored.region_id = region_id;
        }
        if let Some(name) = update.name {
            stored.name = name;
        }
        if let Some(favor_drinks) = update.favor_drinks {
            stored.favor_drinks = favor_drinks;
        }
        if let Some(alarm_enabled) = update.alarm_enabled {
            stored.alarm_enabled = alarm_enabled;
        }
        if update.image_url.is_some() {
            stored.image_url = update.image_url;
        }

        let updated = self.member_repo.update(&stored).await?;
        Ok(MemberResponse::from(updated))
    }
}
