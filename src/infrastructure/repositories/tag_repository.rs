//! Tag & TagFollow Repository Implementation
//!
//! PostgreSQL implementation of tags, post/tag links and tag subscriptions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Tag, TagFollow, TagFollowRepository, TagRepository};
use crate::shared::error::{AppError, ErrorCode};

#[derive(Debug, sqlx::FromRow)]
struct TagRow {
    id: i64,
    tag_name: String,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag {
            id: row.id,
            tag_name: row.tag_name,
        }
    }
}

/// Tag row carrying the post it was looked up for.
#[derive(Debug, sqlx::FromRow)]
struct PostTagRow {
    post_id: i64,
    id: i64,
    tag_name: String,
}

/// PostgreSQL tag repository implementation.
#[derive(Clone)]
pub struct PgTagRepository {
    pool: PgPool,
}

impl PgTagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn find_by_name(&self, tag_name: &str) -> Result<Option<Tag>, AppError> {
        let row = sqlx::query_as::<_, TagRow>("SELECT id, tag_name FROM tags WHERE tag_name = $1")
            .bind(tag_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Tag::from))
    }

    async fn find_or_create(&self, new_id: i64, tag_name: &str) -> Result<Tag, AppError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            INSERT INTO tags (id, tag_name)
            VALUES ($1, $2)
            ON CONFLICT (tag_name) DO UPDATE SET tag_name = EXCLUDED.tag_name
            RETURNING id, tag_name
            "#,
        )
        .bind(new_id)
        .bind(tag_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn attach_to_post(&self, post_id: i64, tag_id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO post_tags (post_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_post_id(&self, post_id: i64) -> Result<Vec<Tag>, AppError> {
        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT t.id, t.tag_name
            FROM tags t
            JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = $1
            ORDER BY t.tag_name
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn find_by_post_ids(&self, post_ids: &[i64]) -> Result<Vec<(i64, Tag)>, AppError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, PostTagRow>(
            r#"
            SELECT pt.post_id, t.id, t.tag_name
            FROM tags t
            JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = ANY($1)
            ORDER BY pt.post_id, t.tag_name
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.post_id, Tag::new(r.id, r.tag_name)))
            .collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TagFollowRow {
    id: i64,
    member_id: i64,
    tag_id: i64,
    created_at: DateTime<Utc>,
}

impl From<TagFollowRow> for TagFollow {
    fn from(row: TagFollowRow) -> Self {
        TagFollow {
            id: row.id,
            member_id: row.member_id,
            tag_id: row.tag_id,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL tag follow repository implementation.
#[derive(Clone)]
pub struct PgTagFollowRepository {
    pool: PgPool,
}

impl PgTagFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagFollowRepository for PgTagFollowRepository {
    async fn find_by_tag(&self, tag_id: i64) -> Result<Vec<TagFollow>, AppError> {
        let rows = sqlx::query_as::<_, TagFollowRow>(
            r#"
            SELECT id, member_id, tag_id, created_at
            FROM tag_follows
            WHERE tag_id = $1
            ORDER BY id
            "#,
        )
        .bind(tag_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TagFollow::from).collect())
    }

    async fn find_tags_by_member(&self, member_id: i64) -> Result<Vec<Tag>, AppError> {
        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT t.id, t.tag_name
            FROM tags t
            JOIN tag_follows tf ON tf.tag_id = t.id
            WHERE tf.member_id = $1
            ORDER BY t.tag_name
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn create(&self, follow: &TagFollow) -> Result<TagFollow, AppError> {
        let row = sqlx::query_as::<_, TagFollowRow>(
            r#"
            INSERT INTO tag_follows (id, member_id, tag_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, member_id, tag_id, created_at
            "#,
        )
        .bind(follow.id)
        .bind(follow.member_id)
        .bind(follow.tag_id)
        .bind(follow.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Code(ErrorCode::AlreadyFollowing)
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into())
    }

    async fn delete(&self, member_id: i64, tag_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tag_follows WHERE member_id = $1 AND tag_id = $2")
            .bind(member_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
