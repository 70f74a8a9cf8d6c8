//! Search Service
//!
//! Read-only post searches by tag names and by drink name.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::application::dto::response::PostResponse;
use crate::domain::{normalize_tag_names, PostRecord, PostRepository, PostSort, Tag, TagRepository};
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

/// Search service trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Posts carrying any of `tag_names`. An empty list yields an empty page.
    async fn search_by_tags(
        &self,
        tag_names: Vec<String>,
        page: PageRequest,
    ) -> Result<Page<PostResponse>, AppError>;

    /// Posts whose drink name contains `drink`, case-insensitively.
    async fn search_by_drink(
        &self,
        drink: &str,
        page: PageRequest,
    ) -> Result<Page<PostResponse>, AppError>;
}

/// SearchService implementation
pub struct SearchServiceImpl<P, T>
where
    P: PostRepository,
    T: TagRepository,
{
    post_repo: Arc<P>,
    tag_repo: Arc<T>,
}

impl<P, T> SearchServiceImpl<P, T>
where
    P: PostRepository,
    T: TagRepository,
{
    /// Create a new SearchServiceImpl
    pub fn new(post_repo: Arc<P>, tag_repo: Arc<T>) -> Self {
        Self {
            post_repo,
            tag_repo,
        }
    }

    /// Attach tags to a page of records with one batched lookup.
    async fn to_page(
        &self,
        records: Vec<PostRecord>,
        page: &PageRequest,
        total: i64,
    ) -> Result<Page<PostResponse>, AppError> {
        let post_ids: Vec<i64> = records.iter().map(|r| r.post.id).collect();

        let mut tags_by_post: HashMap<i64, Vec<Tag>> = HashMap::new();
        for (post_id, tag) in self.tag_repo.find_by_post_ids(&post_ids).await? {
            tags_by_post.entry(post_id).or_default().push(tag);
        }

        let content = records
            .into_iter()
            .map(|record| {
                let tags = tags_by_post.remove(&record.post.id).unwrap_or_default();
                PostResponse::from_record(record, tags)
            })
            .collect();

        Ok(Page::new(content, page, total))
    }
}

#[async_trait]
impl<P, T> SearchService for SearchServiceImpl<P, T>
where
    P: PostRepository + 'static,
    T: TagRepository + 'static,
{
    #[instrument(skip(self))]
    async fn search_by_tags(
        &self,
        tag_names: Vec<String>,
        page: PageRequest,
    ) -> Result<Page<PostResponse>, AppError> {
        let sort = PostSort::from_page(&page)?;
        let tag_names = normalize_tag_names(tag_names);
        if tag_names.is_empty() {
            return Ok(Page::empty(&page));
        }

        let (records, total) = self
            .post_repo
            .search_by_tag_names(&tag_names, sort, page.limit(), page.offset())
            .await?;

        self.to_page(records, &page, total).await
    }

    #[instrument(skip(self))]
    async fn search_by_drink(
        &self,
        drink: &str,
        page: PageRequest,
    ) -> Result<Page<PostResponse>, AppError> {
        let sort = PostSort::from_page(&page)?;
        let drink = drink.trim();
        if drink.is_empty() {
            return Err(AppError::Validation("drink: Search term is required".into()));
        }

        let (records, total) = self
            .post_repo
            .search_by_drink_name(drink, sort, page.limit(), page.offset())
            .await?;

        self.to_page(records, &page, total).await
    }
}
