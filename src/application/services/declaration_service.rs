//! Declaration Service
//!
//! Abuse reports against posts. Approving a report removes the post and
//! tells both its author and the reporter.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, instrument};

use super::notification_service::NotificationService;
use crate::application::dto::request::DeclarationRequest;
use crate::application::dto::response::DeclarationResponse;
use crate::domain::{CurrentMember, Declaration, DeclarationRepository, PostRepository};
use crate::shared::error::{AppError, ErrorCode};
use crate::shared::snowflake::SnowflakeGenerator;

/// Declaration service trait
#[async_trait]
pub trait DeclarationService: Send + Sync {
    /// Report a post
    async fn declare_post(
        &self,
        member: CurrentMember,
        request: DeclarationRequest,
    ) -> Result<DeclarationResponse, AppError>;

    /// Reports awaiting review; admin only
    async fn get_pending(
        &self,
        member: CurrentMember,
    ) -> Result<Vec<DeclarationResponse>, AppError>;

    /// Uphold a report and remove the post; admin only
    async fn approve(&self, member: CurrentMember, declaration_id: i64) -> Result<(), AppError>;
}

/// DeclarationService implementation
pub struct DeclarationServiceImpl<D, P, N>
where
    D: DeclarationRepository,
    P: PostRepository,
    N: NotificationService,
{
    declaration_repo: Arc<D>,
    post_repo: Arc<P>,
    notifications: Arc<N>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<D, P, N> DeclarationServiceImpl<D, P, N>
where
    D: DeclarationRepository,
    P: PostRepository,
    N: NotificationService,
{
    /// Create a new DeclarationServiceImpl
    pub fn new(
        declaration_repo: Arc<D>,
        post_repo: Arc<P>,
        notifications: Arc<N>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            declaration_repo,
            post_repo,
            notifications,
            id_generator,
        }
    }
}

#[async_trait]
impl<D, P, N> DeclarationService for DeclarationServiceImpl<D, P, N>
where
    D: DeclarationRepository + 'static,
    P: PostRepository + 'static,
    N: NotificationService + 'static,
{
    #[instrument(skip(self, request), fields(member_id = member.id, post_id = request.post_id))]
    async fn declare_post(
        &self,
        member: CurrentMember,
        request: DeclarationRequest,
    ) -> Result<DeclarationResponse, AppError> {
        let post = self
            .post_repo
            .find_by_id(request.post_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::PostNotFound))?;

        let declaration = Declaration {
            id: self.id_generator.generate(),
            post_id: post.id,
            member_id: member.id,
            content: request.content,
            approved: false,
            created_at: Utc::now(),
        };
        let declaration = self.declaration_repo.create(&declaration).await?;

        info!(declaration_id = declaration.id, "Post reported");
        Ok(DeclarationResponse::from(declaration))
    }

    #[instrument(skip(self), fields(member_id = member.id))]
    async fn get_pending(
        &self,
        member: CurrentMember,
    ) -> Result<Vec<DeclarationResponse>, AppError> {
        member.require_admin()?;

        let pending = self.declaration_repo.find_pending().await?;
        Ok(pending.into_iter().map(DeclarationResponse::from).collect())
    }

    #[instrument(skip(self), fields(member_id = member.id))]
    async fn approve(&self, member: CurrentMember, declaration_id: i64) -> Result<(), AppError> {
        member.require_admin()?;

        let declaration = self
            .declaration_repo
            .find_by_id(declaration_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::DeclarationNotFound))?;
        if declaration.approved {
            return Err(ErrorCode::DeclarationAlreadyApproved.into());
        }

        // Read the post first; the author must still be known after removal.
        let post = self
            .post_repo
            .find_by_id(declaration.post_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::PostNotFound))?;

        if !self
            .declaration_repo
            .approve_and_remove_post(declaration.id, post.id)
            .await?
        {
            return Err(ErrorCode::DeclarationAlreadyApproved.into());
        }

        self.notifications
            .post_declaration_notification(&post, &declaration)
            .await?;

        info!(declaration_id, post_id = post.id, "Report upheld");
        Ok(())
    }
}
