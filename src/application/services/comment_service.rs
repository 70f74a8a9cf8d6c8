//! Comment Service

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

use super::notification_service::NotificationService;
use crate::application::dto::request::CreateCommentRequest;
use crate::application::dto::response::CommentResponse;
use crate::domain::{
    Comment, CommentRecord, CommentRepository, CurrentMember, MemberRepository, PostRepository,
};
use crate::shared::error::{AppError, ErrorCode};
use crate::shared::snowflake::SnowflakeGenerator;

/// Comment service trait
#[async_trait]
pub trait CommentService: Send + Sync {
    /// Comment on a post and notify its author
    async fn create_comment(
        &self,
        member: CurrentMember,
        request: CreateCommentRequest,
    ) -> Result<CommentResponse, AppError>;

    /// Comments on a post, oldest first
    async fn get_comments(&self, post_id: i64) -> Result<Vec<CommentResponse>, AppError>;

    /// Delete a comment; author or admin only
    async fn delete_comment(&self, member: CurrentMember, comment_id: i64) -> Result<(), AppError>;
}

/// CommentService implementation
pub struct CommentServiceImpl<C, P, M, N>
where
    C: CommentRepository,
    P: PostRepository,
    M: MemberRepository,
    N: NotificationService,
{
    comment_repo: Arc<C>,
    post_repo: Arc<P>,
    member_repo: Arc<M>,
    notifications: Arc<N>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<C, P, M, N> CommentServiceImpl<C, P, M, N>
where
    C: CommentRepository,
    P: PostRepository,
    M: MemberRepository,
    N: NotificationService,
{
    /// Create a new CommentServiceImpl
    pub fn new(
        comment_repo: Arc<C>,
        post_repo: Arc<P>,
        member_repo: Arc<M>,
        notifications: Arc<N>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            member_repo,
            notifications,
            id_generator,
        }
    }
}

#[async_trait]
impl<C, P, M, N> CommentService for CommentServiceImpl<C, P, M, N>
where
    C: CommentRepository + 'static,
    P: PostRepository + 'static,
    M: MemberRepository + 'static,
    N: NotificationService + 'static,
{
    #[instrument(skip(self, request), fields(member_id = member.id, post_id = request.post_id))]
    async fn create_comment(
        &self,
        member: CurrentMember,
        request: CreateCommentRequest,
    ) -> Result<CommentResponse, AppError> {
        let post = self
            .post_repo
            .find_by_id(request.post_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::PostNotFound))?;
        let author = self
            .member_repo
            .find_by_id(member.id)
            .await?
            .ok_or(AppError::Code(ErrorCode::MemberNotFound))?;

        let comment = Comment {
            id: self.id_generator.generate(),
            post_id: post.id,
            member_id: author.id,
            content: request.content,
            anonymous: request.anonymous,
            created_at: Utc::now(),
        };
        let comment = self.comment_repo.create(&comment).await?;

        self.notifications
            .post_comment_notification(post.id, &author.name, comment.anonymous)
            .await?;

        Ok(CommentResponse::from(CommentRecord {
            comment,
            member_name: author.name,
        }))
    }

    #[instrument(skip(self))]
    async fn get_comments(&self, post_id: i64) -> Result<Vec<CommentResponse>, AppError> {
        self.post_repo
            .find_by_id(post_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::PostNotFound))?;

        let comments = self.comment_repo.find_by_post_id(post_id).await?;
        Ok(comments.into_iter().map(CommentResponse::from).collect())
    }

    #[instrument(skip(self), fields(member_id = member.id))]
    async fn delete_comment(&self, member: CurrentMember, comment_id: i64) -> Result<(), AppError> {
        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::CommentNotFound))?;

        member.require_owner_or_admin(comment.member_id)?;
        self.comment_repo.delete(comment.id).await
    }
}
