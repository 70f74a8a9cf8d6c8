//! Declaration Repository Implementation
//!
//! PostgreSQL implementation of the DeclarationRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Declaration, DeclarationRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct DeclarationRow {
    id: i64,
    post_id: i64,
    member_id: i64,
    content: String,
    approved: bool,
    created_at: DateTime<Utc>,
}

impl From<DeclarationRow> for Declaration {
    fn from(row: DeclarationRow) -> Self {
        Declaration {
            id: row.id,
            post_id: row.post_id,
            member_id: row.member_id,
            content: row.content,
            approved: row.approved,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL declaration repository implementation.
#[derive(Clone)]
pub struct PgDeclarationRepository {
    pool: PgPool,
}

impl PgDeclarationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeclarationRepository for PgDeclarationRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Declaration>, AppError> {
        let row = sqlx::query_as::<_, DeclarationRow>(
            r#"
            SELECT id, post_id, member_id, content, approved, created_at
            FROM declarations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Declaration::from))
    }

    async fn find_pending(&self) -> Result<Vec<Declaration>, AppError> {
        let rows = sqlx::query_as::<_, DeclarationRow>(
            r#"
            SELECT id, post_id, member_id, content, approved, created_at
            FROM declarations
            WHERE approved = FALSE
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Declaration::from).collect())
    }

    async fn create(&self, declaration: &Declaration) -> Result<Declaration, AppError> {
        let row = sqlx::query_as::<_, DeclarationRow>(
            r#"
            INSERT INTO declarations (id, post_id, member_id, content, approved, created_at)
            VALUES ($1, $2, $3, $4, FALSE, $5)
            RETURNING id, post_id, member_id, content, approved, created_at
            "#,
        )
        .bind(declaration.id)
        .bind(declaration.post_id)
        .bind(declaration.member_id)
        .bind(&declaration.content)
        .bind(declaration.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn approve_and_remove_post(&self, id: i64, post_id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let approved = sqlx::query(
            "UPDATE declarations SET approved = TRUE WHERE id = $1 AND approved = FALSE",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if approved.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn remove_post(&self, post_id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM declarations WHERE post_id = $1 AND approved = FALSE")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        let removed = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        if removed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
