//! Tag and TagFollow entities and repository traits.
//!
//! Maps to the `tags`, `post_tags` and `tag_follows` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A label attached to posts.
///
/// Maps to the `tags` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - tag_name: VARCHAR(50) NOT NULL UNIQUE
///
/// Posts link to tags through `post_tags`:
/// - post_id: BIGINT NOT NULL REFERENCES posts(id) ON DELETE CASCADE
/// - tag_id: BIGINT NOT NULL REFERENCES tags(id)
/// - PRIMARY KEY (post_id, tag_id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub tag_name: String,
}

impl Tag {
    pub fn new(id: i64, tag_name: impl Into<String>) -> Self {
        Self {
            id,
            tag_name: tag_name.into(),
        }
    }
}

/// A member's subscription to a tag.
///
/// Maps to the `tag_follows` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - member_id: BIGINT NOT NULL REFERENCES members(id)
/// - tag_id: BIGINT NOT NULL REFERENCES tags(id)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - UNIQUE (member_id, tag_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFollow {
    pub id: i64,
    pub member_id: i64,
    pub tag_id: i64,
    pub created_at: DateTime<Utc>,
}

impl TagFollow {
    pub fn new(id: i64, member_id: i64, tag_id: i64) -> Self {
        Self {
            id,
            member_id,
            tag_id,
            created_at: Utc::now(),
        }
    }
}

/// Normalize user-supplied tag names: trimmed, non-empty, first occurrence kept.
pub fn normalize_tag_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if !name.is_empty() && !seen.iter().any(|s: &String| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

/// Repository trait for Tag data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn find_by_name(&self, tag_name: &str) -> Result<Option<Tag>, AppError>;

    /// Return the tag with this name, inserting it with `new_id` if missing.
    async fn find_or_create(&self, new_id: i64, tag_name: &str) -> Result<Tag, AppError>;

    /// Link a tag to a post; linking twice is a no-op.
    async fn attach_to_post(&self, post_id: i64, tag_id: i64) -> Result<(), AppError>;

    /// Tags attached to a post, ordered by name.
    async fn find_by_post_id(&self, post_id: i64) -> Result<Vec<Tag>, AppError>;

    /// Tags for several posts at once, as (post_id, tag) pairs.
    async fn find_by_post_ids(&self, post_ids: &[i64]) -> Result<Vec<(i64, Tag)>, AppError>;
}

/// Repository trait for TagFollow data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagFollowRepository: Send + Sync {
    /// All subscriptions to a tag.
    async fn find_by_tag(&self, tag_id: i64) -> Result<Vec<TagFollow>, AppError>;

    /// Tags a member follows.
    async fn find_tags_by_member(&self, member_id: i64) -> Result<Vec<Tag>, AppError>;

    /// Fails with `AlreadyFollowing` on a duplicate (member, tag) pair.
    async fn create(&self, follow: &TagFollow) -> Result<TagFollow, AppError>;

    /// Returns whether a row was removed.
    async fn delete(&self, member_id: i64, tag_id: i64) -> Result<bool, AppError>;
}
