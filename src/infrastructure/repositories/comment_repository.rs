//! Comment Repository Implementation
//!
//! PostgreSQL implementation of the CommentRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Comment, CommentRecord, CommentRepository};
use crate::shared::error::{AppError, ErrorCode};

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    member_id: i64,
    content: String,
    anonymous: bool,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            id: self.id,
            post_id: self.post_id,
            member_id: self.member_id,
            content: self.content,
            anonymous: self.anonymous,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CommentRecordRow {
    id: i64,
    post_id: i64,
    member_id: i64,
    member_name: String,
    content: String,
    anonymous: bool,
    created_at: DateTime<Utc>,
}

impl CommentRecordRow {
    fn into_record(self) -> CommentRecord {
        CommentRecord {
            comment: Comment {
                id: self.id,
                post_id: self.post_id,
                member_id: self.member_id,
                content: self.content,
                anonymous: self.anonymous,
                created_at: self.created_at,
            },
            member_name: self.member_name,
        }
    }
}

/// PostgreSQL comment repository implementation.
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, member_id, content, anonymous, created_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_comment()))
    }

    async fn find_by_post_id(&self, post_id: i64) -> Result<Vec<CommentRecord>, AppError> {
        let rows = sqlx::query_as::<_, CommentRecordRow>(
            r#"
            SELECT c.id, c.post_id, c.member_id, m.name AS member_name,
                   c.content, c.anonymous, c.created_at
            FROM comments c
            JOIN members m ON m.id = c.member_id
            WHERE c.post_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_record()).collect())
    }

    async fn create(&self, comment: &Comment) -> Result<Comment, AppError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (id, post_id, member_id, content, anonymous, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, post_id, member_id, content, anonymous, created_at
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.member_id)
        .bind(&comment.content)
        .bind(comment.anonymous)
        .bind(comment.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_comment())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ErrorCode::CommentNotFound.into());
        }

        Ok(())
    }
}
