//! Post entity and repository trait.
//!
//! Maps to the `posts` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::drink::DrinkRecord;
use crate::shared::error::{AppError, ErrorCode};
use crate::shared::pagination::PageRequest;

/// Kind of post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostType {
    #[default]
    Review,
    Recommendation,
    Free,
}

impl PostType {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "RECOMMENDATION" => Self::Recommendation,
            "FREE" => Self::Free,
            _ => Self::Review,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Review => "REVIEW",
            Self::Recommendation => "RECOMMENDATION",
            Self::Free => "FREE",
        }
    }
}

/// A member's post about a drink.
///
/// Maps to the `posts` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - member_id: BIGINT NOT NULL REFERENCES members(id)
/// - drink_id: BIGINT NOT NULL REFERENCES drinks(id)
/// - post_type: VARCHAR(20) NOT NULL
/// - title: VARCHAR(200) NOT NULL
/// - content: TEXT NOT NULL
/// - rating: REAL NOT NULL
/// - view_count: INTEGER NOT NULL DEFAULT 0
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// Tags are attached through `post_tags(post_id, tag_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    /// Author
    pub member_id: i64,
    pub drink_id: i64,
    pub post_type: PostType,
    pub title: String,
    pub content: String,
    /// 0.0 to 5.0
    pub rating: f32,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_authored_by(&self, member_id: i64) -> bool {
        self.member_id == member_id
    }
}

impl Default for Post {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            member_id: 0,
            drink_id: 0,
            post_type: PostType::default(),
            title: String::new(),
            content: String::new(),
            rating: 0.0,
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Post joined with author name and drink, the storage shape behind post responses.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub post: Post,
    pub member_name: String,
    pub drink: DrinkRecord,
}

/// Sortable post properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSortField {
    CreatedAt,
    Rating,
    ViewCount,
}

/// Sort order for post listings, parsed from `field[,asc|desc]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostSort {
    pub field: PostSortField,
    pub descending: bool,
}

impl Default for PostSort {
    fn default() -> Self {
        Self {
            field: PostSortField::CreatedAt,
            descending: true,
        }
    }
}

impl PostSort {
    /// Parse a `sort` query parameter; `None` yields newest first.
    pub fn parse(param: Option<&str>) -> Result<Self, AppError> {
        let Some(param) = param.map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(Self::default());
        };

        let mut parts = param.split(',').map(str::trim);
        let field = match parts.next() {
            Some("createdAt") => PostSortField::CreatedAt,
            Some("rating") => PostSortField::Rating,
            Some("viewCount") => PostSortField::ViewCount,
            _ => return Err(ErrorCode::InvalidSort.into()),
        };
        let descending = match parts.next().map(|d| d.to_lowercase()) {
            None => false,
            Some(d) if d == "asc" => false,
            Some(d) if d == "desc" => true,
            Some(_) => return Err(ErrorCode::InvalidSort.into()),
        };

        Ok(Self { field, descending })
    }

    pub fn from_page(page: &PageRequest) -> Result<Self, AppError> {
        Self::parse(page.sort.as_deref())
    }

    /// SQL ORDER BY body over the `p` alias; id breaks ties.
    pub fn order_by(&self) -> &'static str {
        match (self.field, self.descending) {
            (PostSortField::CreatedAt, true) => "p.created_at DESC, p.id DESC",
            (PostSortField::CreatedAt, false) => "p.created_at ASC, p.id ASC",
            (PostSortField::Rating, true) => "p.rating DESC, p.id DESC",
            (PostSortField::Rating, false) => "p.rating ASC, p.id ASC",
            (PostSortField::ViewCount, true) => "p.view_count DESC, p.id DESC",
            (PostSortField::ViewCount, false) => "p.view_count ASC, p.id ASC",
        }
    }
}

/// Repository trait for Post data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError>;

    /// Find a post with its author name and drink.
    async fn find_record_by_id(&self, id: i64) -> Result<Option<PostRecord>, AppError>;

    async fn create(&self, post: &Post) -> Result<Post, AppError>;

    async fn increment_view_count(&self, id: i64) -> Result<(), AppError>;

    /// Posts attached to any of the given tag names, with the total match count.
    async fn search_by_tag_names(
        &self,
        tag_names: &[String],
        sort: PostSort,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostRecord>, i64), AppError>;

    /// Posts whose drink name contains `drink_name`, with the total match count.
    async fn search_by_drink_name(
        &self,
        drink_name: &str,
        sort: PostSort,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostRecord>, i64), AppError>;
}
