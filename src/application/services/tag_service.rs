//! Tag Service
//!
//! Members follow tags to hear about new posts carrying them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::application::dto::response::TagResponse;
use crate::domain::{CurrentMember, Tag, TagFollow, TagFollowRepository, TagRepository};
use crate::shared::error::{AppError, ErrorCode};
use crate::shared::snowflake::SnowflakeGenerator;

/// Tag service trait
#[async_trait]
pub trait TagService: Send + Sync {
    /// Follow an existing tag
    async fn follow_tag(
        &self,
        member: CurrentMember,
        tag_name: &str,
    ) -> Result<TagResponse, AppError>;

    /// Stop following a tag
    async fn unfollow_tag(&self, member: CurrentMember, tag_name: &str) -> Result<(), AppError>;

    /// Tags the caller follows
    async fn get_followed_tags(&self, member: CurrentMember) -> Result<Vec<TagResponse>, AppError>;
}

/// TagService implementation
pub struct TagServiceImpl<T, F>
where
    T: TagRepository,
    F: TagFollowRepository,
{
    tag_repo: Arc<T>,
    follow_repo: Arc<F>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<T, F> TagServiceImpl<T, F>
where
    T: TagRepository,
    F: TagFollowRepository,
{
    /// Create a new TagServiceImpl
    pub fn new(
        tag_repo: Arc<T>,
        follow_repo: Arc<F>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            tag_repo,
            follow_repo,
            id_generator,
        }
    }

    async fn find_tag(&self, tag_name: &str) -> Result<Tag, AppError> {
        self.tag_repo
            .find_by_name(tag_name.trim())
            .await?
            .ok_or(AppError::Code(ErrorCode::TagNotFound))
    }
}

#[async_trait]
impl<T, F> TagService for TagServiceImpl<T, F>
where
    T: TagRepository + 'static,
    F: TagFollowRepository + 'static,
{
    #[instrument(skip(self), fields(member_id = member.id))]
    async fn follow_tag(
        &self,
        member: CurrentMember,
        tag_name: &str,
    ) -> Result<TagResponse, AppError> {
        let tag = self.find_tag(tag_name).await?;

        let follow = TagFollow::new(self.id_generator.generate(), member.id, tag.id);
        self.follow_repo.create(&follow).await?;

        info!(tag_id = tag.id, "Tag followed");
        Ok(TagResponse::from(tag))
    }

    #[instrument(skip(self), fields(member_id = member.id))]
    async fn unfollow_tag(&self, member: CurrentMember, tag_name: &str) -> Result<(), AppError> {
        let tag = self.find_tag(tag_name).await?;

        if !self.follow_repo.delete(member.id, tag.id).await? {
            return Err(ErrorCode::NotFollowing.into());
        }

        info!(tag_id = tag.id, "Tag unfollowed");
        Ok(())
    }

    #[instrument(skip(self), fields(member_id = member.id))]
    async fn get_followed_tags(&self, member: CurrentMember) -> Result<Vec<TagResponse>, AppError> {
        let tags = self.follow_repo.find_tags_by_member(member.id).await?;
        Ok(tags.into_iter().map(TagResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockTagFollowRepository, MockTagRepository, Role};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn service(
        tags: MockTagRepository,
        follows: MockTagFollowRepository,
    ) -> TagServiceImpl<MockTagRepository, MockTagFollowRepository> {
        TagServiceImpl::new(
            Arc::new(tags),
            Arc::new(follows),
            Arc::new(SnowflakeGenerator::new(1)),
        )
    }

    fn tags_with(name: &'static str) -> MockTagRepository {
        let mut tags = MockTagRepository::new();
        tags.expect_find_by_name()
            .withf(move |n| n == name)
            .returning(move |n| Ok(Some(Tag::new(7, n))));
        tags
    }

    fn caller() -> CurrentMember {
        CurrentMember::new(2, Role::User)
    }

    #[tokio::test]
    async fn test_follow_tag() {
        let mut follows = MockTagFollowRepository::new();
        follows
            .expect_create()
            .withf(|f| f.member_id == 2 && f.tag_id == 7)
            .times(1)
            .returning(|f| Ok(f.clone()));

        let response = service(tags_with("makgeolli"), follows)
            .follow_tag(caller(), " makgeolli ")
            .await
            .unwrap();

        assert_eq!(response.tag_name, "makgeolli");
        assert_eq!(response.id, "7");
    }

    #[tokio::test]
    async fn test_follow_unknown_tag() {
        let mut tags = MockTagRepository::new();
        tags.expect_find_by_name().returning(|_| Ok(None));
        let mut follows = MockTagFollowRepository::new();
        follows.expect_create().never();

        let err = service(tags, follows)
            .follow_tag(caller(), "nope")
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::TagNotFound));
    }

    #[tokio::test]
    async fn test_follow_twice_conflicts() {
        let mut follows = MockTagFollowRepository::new();
        follows
            .expect_create()
            .returning(|_| Err(ErrorCode::AlreadyFollowing.into()));

        let err = service(tags_with("soju"), follows)
            .follow_tag(caller(), "soju")
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::AlreadyFollowing));
    }

    #[tokio::test]
    async fn test_unfollow_when_not_following() {
        let mut follows = MockTagFollowRepository::new();
        follows
            .expect_delete()
            .with(eq(2), eq(7))
            .returning(|_, _| Ok(false));

        let err = service(tags_with("soju"), follows)
            .unfollow_tag(caller(), "soju")
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::NotFollowing));
    }

    #[tokio::test]
    async fn test_get_followed_tags() {
        let mut follows = MockTagFollowRepository::new();
        follows
            .expect_find_tags_by_member()
            .with(eq(2))
            .returning(|_| Ok(vec![Tag::new(1, "beer"), Tag::new(2, "soju")]));

        let tags = service(MockTagRepository::new(), follows)
            .get_followed_tags(caller())
            .await
            .unwrap();

        let names: Vec<_> = tags.into_iter().map(|t| t.tag_name).collect();
        assert_eq!(names, vec!["beer".to_string(), "soju".to_string()]);
    }
}
