//! Notification Service
//!
//! Creates notifications and fans them out to recipients.
//!
//! Every notification is built from a [`NotificationEvent`], so the stored
//! kind and text always agree. Fan-out is sequential: one repository write
//! per recipient, in the order recipients are found.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::application::dto::response::NotificationResponse;
use crate::domain::{
    CurrentMember, Declaration, MemberRepository, Notification, NotificationEvent,
    NotificationRepository, Post, PostRepository, Registration, TagFollowRepository, TagRepository,
    RECENT_NOTIFICATION_LIMIT,
};
use crate::infrastructure::metrics;
use crate::shared::error::{AppError, ErrorCode};
use crate::shared::snowflake::SnowflakeGenerator;

/// Notification service trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Persist one notification for `member_id`.
    async fn create_notification(
        &self,
        member_id: i64,
        post_id: Option<i64>,
        event: NotificationEvent,
    ) -> Result<Notification, AppError>;

    /// The caller's most recent notifications, newest first.
    async fn get_recent_notifications(
        &self,
        member: CurrentMember,
    ) -> Result<Vec<NotificationResponse>, AppError>;

    /// Tell a post's author that someone commented.
    async fn post_comment_notification(
        &self,
        post_id: i64,
        commenter_name: &str,
        is_anonymous: bool,
    ) -> Result<(), AppError>;

    /// Tell every follower of the post's tags about it, the author excepted.
    ///
    /// Returns the number of notifications written.
    async fn tag_follow_post_notification(&self, post_id: i64) -> Result<usize, AppError>;

    /// Tell the post's author it was removed and the reporter their report was upheld.
    async fn post_declaration_notification(
        &self,
        post: &Post,
        declaration: &Declaration,
    ) -> Result<(), AppError>;

    /// Tell a member their drink registration was approved.
    ///
    /// A registration belongs to no post, so the notification carries no post id.
    async fn approve_registration_notification(
        &self,
        member_id: i64,
        registration: &Registration,
    ) -> Result<(), AppError>;
}

/// NotificationService implementation
pub struct NotificationServiceImpl<N, M, P, T, F>
where
    N: NotificationRepository,
    M: MemberRepository,
    P: PostRepository,
    T: TagRepository,
    F: TagFollowRepository,
{
    notification_repo: Arc<N>,
    member_repo: Arc<M>,
    post_repo: Arc<P>,
    tag_repo: Arc<T>,
    follow_repo: Arc<F>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<N, M, P, T, F> NotificationServiceImpl<N, M, P, T, F>
where
    N: NotificationRepository,
    M: MemberRepository,
    P: PostRepository,
    T: TagRepository,
    F: TagFollowRepository,
{
    /// Create a new NotificationServiceImpl
    pub fn new(
        notification_repo: Arc<N>,
        member_repo: Arc<M>,
        post_repo: Arc<P>,
        tag_repo: Arc<T>,
        follow_repo: Arc<F>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            notification_repo,
            member_repo,
            post_repo,
            tag_repo,
            follow_repo,
            id_generator,
        }
    }

    async fn find_post(&self, post_id: i64) -> Result<Post, AppError> {
        self.post_repo
            .find_by_id(post_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::PostNotFound))
    }
}

#[async_trait]
impl<N, M, P, T, F> NotificationService for NotificationServiceImpl<N, M, P, T, F>
where
    N: NotificationRepository + 'static,
    M: MemberRepository + 'static,
    P: PostRepository + 'static,
    T: TagRepository + 'static,
    F: TagFollowRepository + 'static,
{
    #[instrument(skip(self, event), fields(kind = %event.kind()))]
    async fn create_notification(
        &self,
        member_id: i64,
        post_id: Option<i64>,
        event: NotificationEvent,
    ) -> Result<Notification, AppError> {
        let notification =
            Notification::from_event(self.id_generator.generate(), member_id, post_id, &event);

        let created = self.notification_repo.create(&notification).await?;
        metrics::record_notification(created.kind.as_str());
        debug!(notification_id = created.id, "Notification created");

        Ok(created)
    }

    #[instrument(skip(self), fields(member_id = member.id))]
    async fn get_recent_notifications(
        &self,
        member: CurrentMember,
    ) -> Result<Vec<NotificationResponse>, AppError> {
        let member = self
            .member_repo
            .find_by_id(member.id)
            .await?
            .ok_or(AppError::Code(ErrorCode::MemberNotFound))?;

        let notifications = self
            .notification_repo
            .find_recent_by_member(member.id, RECENT_NOTIFICATION_LIMIT)
            .await?;

        Ok(notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect())
    }

    #[instrument(skip(self, commenter_name))]
    async fn post_comment_notification(
        &self,
        post_id: i64,
        commenter_name: &str,
        is_anonymous: bool,
    ) -> Result<(), AppError> {
        let post = self.find_post(post_id).await?;

        let commenter = (!is_anonymous).then(|| commenter_name.to_string());
        self.create_notification(
            post.member_id,
            Some(post.id),
            NotificationEvent::Comment { commenter },
        )
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn tag_follow_post_notification(&self, post_id: i64) -> Result<usize, AppError> {
        let post = self.find_post(post_id).await?;
        let tags = self.tag_repo.find_by_post_id(post.id).await?;

        let mut sent = 0;
        for tag in tags {
            let follows = self.follow_repo.find_by_tag(tag.id).await?;

            for follow in follows
                .into_iter()
                .filter(|f| !post.is_authored_by(f.member_id))
            {
                self.create_notification(
                    follow.member_id,
                    Some(post.id),
                    NotificationEvent::TagFollow {
                        tag_name: tag.tag_name.clone(),
                    },
                )
                .await?;
                sent += 1;
            }
        }

        debug!(sent, "Tag follow fan-out finished");
        Ok(sent)
    }

    #[instrument(
        skip(self, post, declaration),
        fields(post_id = post.id, declaration_id = declaration.id)
    )]
    async fn post_declaration_notification(
        &self,
        post: &Post,
        declaration: &Declaration,
    ) -> Result<(), AppError> {
        self.create_notification(
            post.member_id,
            Some(post.id),
            NotificationEvent::PostRemoved,
        )
        .await?;
        self.create_notification(
            declaration.member_id,
            None,
            NotificationEvent::DeclarationUpheld,
        )
        .await?;

        Ok(())
    }

    #[instrument(skip(self, registration), fields(registration_id = registration.id))]
    async fn approve_registration_notification(
        &self,
        member_id: i64,
        registration: &Registration,
    ) -> Result<(), AppError> {
        self.create_notification(
            member_id,
            None,
            NotificationEvent::RegistrationApproved {
                drink_name: registration.drink_name.clone(),
            },
        )
        .await?;

        Ok(())
    }
}
