//! Post Repository Implementation
//!
//! PostgreSQL implementation of post storage and the two post searches.
//! Search queries return rows joined with author and drink so a page of
//! results is assembled from one query plus one batched tag lookup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::drink_repository::escape_like;
use crate::domain::{
    Drink, DrinkRecord, DrinkType, Post, PostRecord, PostRepository, PostSort, PostType,
};
use crate::shared::error::AppError;

/// Row for plain `posts` queries.
#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    member_id: i64,
    drink_id: i64,
    post_type: String,
    title: String,
    content: String,
    rating: f32,
    view_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            id: self.id,
            member_id: self.member_id,
            drink_id: self.drink_id,
            post_type: PostType::from_str(&self.post_type),
            title: self.title,
            content: self.content,
            rating: self.rating,
            view_count: self.view_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Row for posts joined with `members`, `drinks` and `regions`.
#[derive(Debug, sqlx::FromRow)]
struct PostRecordRow {
    id: i64,
    member_id: i64,
    member_name: String,
    drink_id: i64,
    post_type: String,
    title: String,
    content: String,
    rating: f32,
    view_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    drink_region_id: i64,
    drink_place_name: String,
    drink_name: String,
    drink_type: String,
    drink_degree: i32,
    drink_sweetness: i32,
    drink_cost: i32,
    drink_description: Option<String>,
    drink_image_url: Option<String>,
    drink_created_at: DateTime<Utc>,
}

impl PostRecordRow {
    fn into_record(self) -> PostRecord {
        PostRecord {
            post: Post {
                id: self.id,
                member_id: self.member_id,
                drink_id: self.drink_id,
                post_type: PostType::from_str(&self.post_type),
                title: self.title,
                content: self.content,
                rating: self.rating,
                view_count: self.view_count,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            member_name: self.member_name,
            drink: DrinkRecord {
                drink: Drink {
                    id: self.drink_id,
                    region_id: self.drink_region_id,
                    name: self.drink_name,
                    drink_type: DrinkType::from_str(&self.drink_type),
                    degree: self.drink_degree,
                    sweetness: self.drink_sweetness,
                    cost: self.drink_cost,
                    description: self.drink_description,
                    image_url: self.drink_image_url,
                    created_at: self.drink_created_at,
                },
                place_name: self.drink_place_name,
            },
        }
    }
}

const POST_COLUMNS: &str = "id, member_id, drink_id, post_type, title, content, rating, \
     view_count, created_at, updated_at";

const POST_RECORD_SELECT: &str = r#"
    SELECT p.id, p.member_id, m.name AS member_name, p.drink_id, p.post_type,
           p.title, p.content, p.rating, p.view_count, p.created_at, p.updated_at,
           d.region_id AS drink_region_id, r.place_name AS drink_place_name,
           d.name AS drink_name, d.drink_type, d.degree AS drink_degree,
           d.sweetness AS drink_sweetness, d.cost AS drink_cost,
           d.description AS drink_description, d.image_url AS drink_image_url,
           d.created_at AS drink_created_at
    FROM posts p
    JOIN members m ON m.id = p.member_id
    JOIN drinks d ON d.id = p.drink_id
    JOIN regions r ON r.id = d.region_id
"#;

const TAG_MATCH_FILTER: &str = r#"
    p.id IN (
        SELECT pt.post_id
        FROM post_tags pt
        JOIN tags t ON t.id = pt.tag_id
        WHERE t.tag_name = ANY($1)
    )
"#;

/// PostgreSQL post repository implementation.
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {} FROM posts WHERE id = $1",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_post()))
    }

    async fn find_record_by_id(&self, id: i64) -> Result<Option<PostRecord>, AppError> {
        let row = sqlx::query_as::<_, PostRecordRow>(&format!(
            "{} WHERE p.id = $1",
            POST_RECORD_SELECT
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_record()))
    }

    async fn create(&self, post: &Post) -> Result<Post, AppError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO posts (id, member_id, drink_id, post_type, title, content, rating, view_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 0)
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(post.id)
        .bind(post.member_id)
        .bind(post.drink_id)
        .bind(post.post_type.as_str())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.rating)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_post())
    }

    async fn increment_view_count(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE posts SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn search_by_tag_names(
        &self,
        tag_names: &[String],
        sort: PostSort,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostRecord>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM posts p WHERE {}",
            TAG_MATCH_FILTER
        ))
        .bind(tag_names)
        .fetch_one(&self.pool)
        .await?;

        if total == 0 {
            return Ok((Vec::new(), 0));
        }

        let rows = sqlx::query_as::<_, PostRecordRow>(&format!(
            "{} WHERE {} ORDER BY {} LIMIT $2 OFFSET $3",
            POST_RECORD_SELECT,
            TAG_MATCH_FILTER,
            sort.order_by()
        ))
        .bind(tag_names)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(|r| r.into_record()).collect(), total))
    }

    async fn search_by_drink_name(
        &self,
        drink_name: &str,
        sort: PostSort,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostRecord>, i64), AppError> {
        let pattern = format!("%{}%", escape_like(drink_name));

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM posts p
            JOIN drinks d ON d.id = p.drink_id
            WHERE d.name ILIKE $1
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        if total == 0 {
            return Ok((Vec::new(), 0));
        }

        let rows = sqlx::query_as::<_, PostRecordRow>(&format!(
            "{} WHERE d.name ILIKE $1 ORDER BY {} LIMIT $2 OFFSET $3",
            POST_RECORD_SELECT,
            sort.order_by()
        ))
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(|r| r.into_record()).collect(), total))
    }
}
