//! Declaration (abuse report) entity and repository trait.
//!
//! Maps to the `declarations` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A member's report against a post.
///
/// Maps to the `declarations` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - post_id: BIGINT NOT NULL (kept after the post is removed)
/// - member_id: BIGINT NOT NULL REFERENCES members(id)
/// - content: TEXT NOT NULL
/// - approved: BOOLEAN NOT NULL DEFAULT FALSE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub id: i64,
    pub post_id: i64,
    /// Reporting member
    pub member_id: i64,
    /// Reason given by the reporter
    pub content: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Repository trait for Declaration data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeclarationRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Declaration>, AppError>;

    /// Reports not yet acted on, oldest first.
    async fn find_pending(&self) -> Result<Vec<Declaration>, AppError>;

    async fn create(&self, declaration: &Declaration) -> Result<Declaration, AppError>;

    /// Mark the declaration approved and delete the reported post in one transaction.
    ///
    /// Returns false, changing nothing, if the declaration was already approved.
    async fn approve_and_remove_post(&self, id: i64, post_id: i64) -> Result<bool, AppError>;

    /// Delete a post together with the reports still pending against it.
    ///
    /// Returns false if the post did not exist.
    async fn remove_post(&self, post_id: i64) -> Result<bool, AppError>;
}
