//! Comment entity and repository trait.
//!
//! Maps to the `comments` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A comment on a post.
///
/// Maps to the `comments` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - post_id: BIGINT NOT NULL REFERENCES posts(id) ON DELETE CASCADE
/// - member_id: BIGINT NOT NULL REFERENCES members(id)
/// - content: TEXT NOT NULL
/// - anonymous: BOOLEAN NOT NULL DEFAULT FALSE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub member_id: i64,
    pub content: String,
    /// Hide the author's name from readers and from the post author's notification
    pub anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with its author's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub comment: Comment,
    pub member_name: String,
}

/// Repository trait for Comment data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError>;

    /// Comments on a post, oldest first.
    async fn find_by_post_id(&self, post_id: i64) -> Result<Vec<CommentRecord>, AppError>;

    async fn create(&self, comment: &Comment) -> Result<Comment, AppError>;

    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
