//! Post Service
//!
//! Post creation with tagging, lookup and deletion. Publishing a post
//! notifies followers of its tags.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, instrument};

use super::notification_service::NotificationService;
use crate::application::dto::request::CreatePostRequest;
use crate::application::dto::response::PostResponse;
use crate::domain::{
    normalize_tag_names, CurrentMember, DeclarationRepository, DrinkRepository, Post,
    PostRepository, TagRepository,
};
use crate::shared::error::{AppError, ErrorCode};
use crate::shared::snowflake::SnowflakeGenerator;

/// Post service trait
#[async_trait]
pub trait PostService: Send + Sync {
    /// Publish a post and notify followers of its tags
    async fn create_post(
        &self,
        member: CurrentMember,
        request: CreatePostRequest,
    ) -> Result<PostResponse, AppError>;

    /// Read a post; each read counts as a view
    async fn get_post(&self, post_id: i64) -> Result<PostResponse, AppError>;

    /// Delete a post and the reports pending against it; author or admin only
    async fn delete_post(&self, member: CurrentMember, post_id: i64) -> Result<(), AppError>;
}

/// PostService implementation
pub struct PostServiceImpl<P, D, T, R, N>
where
    P: PostRepository,
    D: DrinkRepository,
    T: TagRepository,
    R: DeclarationRepository,
    N: NotificationService,
{
    post_repo: Arc<P>,
    drink_repo: Arc<D>,
    tag_repo: Arc<T>,
    declaration_repo: Arc<R>,
    notifications: Arc<N>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<P, D, T, R, N> PostServiceImpl<P, D, T, R, N>
where
    P: PostRepository,
    D: DrinkRepository,
    T: TagRepository,
    R: DeclarationRepository,
    N: NotificationService,
{
    /// Create a new PostServiceImpl
    pub fn new(
        post_repo: Arc<P>,
        drink_repo: Arc<D>,
        tag_repo: Arc<T>,
        declaration_repo: Arc<R>,
        notifications: Arc<N>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            post_repo,
            drink_repo,
            tag_repo,
            declaration_repo,
            notifications,
            id_generator,
        }
    }

    async fn load(&self, post_id: i64) -> Result<PostResponse, AppError> {
        let record = self
            .post_repo
            .find_record_by_id(post_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::PostNotFound))?;
        let tags = self.tag_repo.find_by_post_id(post_id).await?;

        Ok(PostResponse::from_record(record, tags))
    }
}

#[async_trait]
impl<P, D, T, R, N> PostService for PostServiceImpl<P, D, T, R, N>
where
    P: PostRepository + 'static,
    D: DrinkRepository + 'static,
    T: TagRepository + 'static,
    R: DeclarationRepository + 'static,
    N: NotificationService + 'static,
{
    #[instrument(skip(self, request), fields(member_id = member.id, drink_id = request.drink_id))]
    async fn create_post(
        &self,
        member: CurrentMember,
        request: CreatePostRequest,
    ) -> Result<PostResponse, AppError> {
        self.drink_repo
            .find_by_id(request.drink_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::DrinkNotFound))?;

        let now = Utc::now();
        let post = Post {
            id: self.id_generator.generate(),
            member_id: member.id,
            drink_id: request.drink_id,
            post_type: request.post_type,
            title: request.title,
            content: request.content,
            rating: request.rating,
            view_count: 0,
            created_at: now,
            updated_at: now,
        };
        let post = self.post_repo.create(&post).await?;

        for tag_name in normalize_tag_names(&request.tags) {
            let tag = self
                .tag_repo
                .find_or_create(self.id_generator.generate(), &tag_name)
                .await?;
            self.tag_repo.attach_to_post(post.id, tag.id).await?;
        }

        let notified = self
            .notifications
            .tag_follow_post_notification(post.id)
            .await?;
        info!(post_id = post.id, notified, "Post published");

        self.load(post.id).await
    }

    #[instrument(skip(self))]
    async fn get_post(&self, post_id: i64) -> Result<PostResponse, AppError> {
        self.post_repo.increment_view_count(post_id).await?;
        self.load(post_id).await
    }

    #[instrument(skip(self), fields(member_id = member.id))]
    async fn delete_post(&self, member: CurrentMember, post_id: i64) -> Result<(), AppError> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::PostNotFound))?;

        member.require_owner_or_admin(post.member_id)?;
        if !self.declaration_repo.remove_post(post.id).await? {
            return Err(ErrorCode::PostNotFound.into());
        }

        info!(post_id = post.id, "Post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::notification_service::MockNotificationService;
    use crate::domain::{
        DrinkRecord, MockDeclarationRepository, MockDrinkRepository, MockPostRepository,
        MockTagRepository, PostRecord, PostType, Role, Tag,
    };
    use mockall::predicate::eq;
    use mockall::Sequence;
    use pretty_assertions::assert_eq;

    type Service = PostServiceImpl<
        MockPostRepository,
        MockDrinkRepository,
        MockTagRepository,
        MockDeclarationRepository,
        MockNotificationService,
    >;

    fn service(
        posts: MockPostRepository,
        drinks: MockDrinkRepository,
        tags: MockTagRepository,
        notifications: MockNotificationService,
    ) -> Service {
        with_declarations(
            posts,
            drinks,
            tags,
            MockDeclarationRepository::new(),
            notifications,
        )
    }

    fn with_declarations(
        posts: MockPostRepository,
        drinks: MockDrinkRepository,
        tags: MockTagRepository,
        declarations: MockDeclarationRepository,
        notifications: MockNotificationService,
    ) -> Service {
        PostServiceImpl::new(
            Arc::new(posts),
            Arc::new(drinks),
            Arc::new(tags),
            Arc::new(declarations),
            Arc::new(notifications),
            Arc::new(SnowflakeGenerator::new(1)),
        )
    }

    fn drink_record() -> DrinkRecord {
        DrinkRecord {
            drink: Default::default(),
            place_name: "Andong".into(),
        }
    }

    fn request(tags: Vec<&str>) -> CreatePostRequest {
        CreatePostRequest {
            drink_id: 3,
            post_type: PostType::Review,
            title: "Clean finish".into(),
            content: "Crisp and dry".into(),
            rating: 4.0,
            tags: tags.into_iter().map(String::from).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_post_tags_and_notifies() {
        let mut drinks = MockDrinkRepository::new();
        drinks
            .expect_find_by_id()
            .with(eq(3))
            .returning(|_| Ok(Some(drink_record())));

        let mut posts = MockPostRepository::new();
        posts.expect_create().returning(|p| Ok(p.clone()));
        posts.expect_find_record_by_id().returning(|id| {
            Ok(Some(PostRecord {
                post: Post {
                    id,
                    member_id: 1,
                    ..Post::default()
                },
                member_name: "kim".into(),
                drink: drink_record(),
            }))
        });

        let mut tags = MockTagRepository::new();
        tags.expect_find_or_create()
            .times(2)
            .returning(|id, name| Ok(Tag::new(id, name)));
        tags.expect_attach_to_post()
            .times(2)
            .returning(|_, _| Ok(()));
        tags.expect_find_by_post_id()
            .returning(|_| Ok(vec![Tag::new(1, "makgeolli"), Tag::new(2, "rice-wine")]));

        let mut notifications = MockNotificationService::new();
        notifications
            .expect_tag_follow_post_notification()
            .times(1)
            .returning(|_| Ok(2));

        let response = service(posts, drinks, tags, notifications)
            .create_post(
                CurrentMember::new(1, Role::User),
                request(vec!["rice-wine", " makgeolli", "rice-wine", ""]),
            )
            .await
            .unwrap();

        assert_eq!(
            response.tags,
            vec!["makgeolli".to_string(), "rice-wine".to_string()]
        );
    }

    #[tokio::test]
    async fn test_create_post_for_unknown_drink() {
        let mut drinks = MockDrinkRepository::new();
        drinks.expect_find_by_id().returning(|_| Ok(None));
        let mut posts = MockPostRepository::new();
        posts.expect_create().never();
        let mut notifications = MockNotificationService::new();
        notifications.expect_tag_follow_post_notification().never();

        let err = service(posts, drinks, MockTagRepository::new(), notifications)
            .create_post(CurrentMember::new(1, Role::User), request(vec![]))
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::DrinkNotFound));
    }

    #[tokio::test]
    async fn test_delete_post_by_stranger_is_denied() {
        let mut posts = MockPostRepository::new();
        posts.expect_find_by_id().returning(|id| {
            Ok(Some(Post {
                id,
                member_id: 1,
                ..Post::default()
            }))
        });
        let mut declarations = MockDeclarationRepository::new();
        declarations.expect_remove_post().never();

        let err = with_declarations(
            posts,
            MockDrinkRepository::new(),
            MockTagRepository::new(),
            declarations,
            MockNotificationService::new(),
        )
        .delete_post(CurrentMember::new(2, Role::User), 10)
        .await
        .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::AccessDenied));
    }

    #[tokio::test]
    async fn test_admin_may_delete_any_post() {
        let mut posts = MockPostRepository::new();
        posts.expect_find_by_id().returning(|id| {
            Ok(Some(Post {
                id,
                member_id: 1,
                ..Post::default()
            }))
        });
        let mut declarations = MockDeclarationRepository::new();
        declarations
            .expect_remove_post()
            .with(eq(10))
            .times(1)
            .returning(|_| Ok(true));

        with_declarations(
            posts,
            MockDrinkRepository::new(),
            MockTagRepository::new(),
            declarations,
            MockNotificationService::new(),
        )
        .delete_post(CurrentMember::new(2, Role::Admin), 10)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_author_delete_clears_pending_reports() {
        let mut posts = MockPostRepository::new();
        posts.expect_find_by_id().returning(|id| {
            Ok(Some(Post {
                id,
                member_id: 1,
                ..Post::default()
            }))
        });
        let mut declarations = MockDeclarationRepository::new();
        declarations
            .expect_remove_post()
            .with(eq(10))
            .times(1)
            .returning(|_| Ok(true));
        declarations.expect_approve_and_remove_post().never();

        with_declarations(
            posts,
            MockDrinkRepository::new(),
            MockTagRepository::new(),
            declarations,
            MockNotificationService::new(),
        )
        .delete_post(CurrentMember::new(1, Role::User), 10)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_delete_post_removed_concurrently() {
        let mut posts = MockPostRepository::new();
        posts.expect_find_by_id().returning(|id| {
            Ok(Some(Post {
                id,
                member_id: 1,
                ..Post::default()
            }))
        });
        let mut declarations = MockDeclarationRepository::new();
        declarations.expect_remove_post().returning(|_| Ok(false));

        let err = with_declarations(
            posts,
            MockDrinkRepository::new(),
            MockTagRepository::new(),
            declarations,
            MockNotificationService::new(),
        )
        .delete_post(CurrentMember::new(1, Role::User), 10)
        .await
        .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::PostNotFound));
    }

    #[tokio::test]
    async fn test_get_post_includes_current_view() {
        let mut seq = Sequence::new();
        let mut posts = MockPostRepository::new();
        posts
            .expect_increment_view_count()
            .with(eq(10))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        posts
            .expect_find_record_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id| {
                Ok(Some(PostRecord {
                    post: Post {
                        id,
                        view_count: 5,
                        ..Post::default()
                    },
                    member_name: "kim".into(),
                    drink: drink_record(),
                }))
            });
        let mut tags = MockTagRepository::new();
        tags.expect_find_by_post_id().returning(|_| Ok(vec![]));

        let response = service(
            posts,
            MockDrinkRepository::new(),
            tags,
            MockNotificationService::new(),
        )
        .get_post(10)
        .await
        .unwrap();

        assert_eq!(response.id, "10");
        assert_eq!(response.view_count, 5);
    }
}
