//! Drink & Region Repository Implementation
//!
//! PostgreSQL implementation of the drink catalog.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Drink, DrinkRecord, DrinkRepository, DrinkType, Region, RegionRepository};
use crate::shared::error::AppError;

/// Row for drink queries joined with `regions`.
#[derive(Debug, sqlx::FromRow)]
struct DrinkRow {
    id: i64,
    region_id: i64,
    place_name: String,
    name: String,
    drink_type: String,
    degree: i32,
    sweetness: i32,
    cost: i32,
    description: Option<String>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl DrinkRow {
    fn into_record(self) -> DrinkRecord {
        DrinkRecord {
            drink: Drink {
                id: self.id,
                region_id: self.region_id,
                name: self.name,
                drink_type: DrinkType::from_str(&self.drink_type),
                degree: self.degree,
                sweetness: self.sweetness,
                cost: self.cost,
                description: self.description,
                image_url: self.image_url,
                created_at: self.created_at,
            },
            place_name: self.place_name,
        }
    }
}

const DRINK_SELECT: &str = r#"
    SELECT d.id, d.region_id, r.place_name, d.name, d.drink_type, d.degree,
           d.sweetness, d.cost, d.description, d.image_url, d.created_at
    FROM drinks d
    JOIN regions r ON r.id = d.region_id
"#;

/// Escape LIKE wildcards so user input matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// PostgreSQL drink repository implementation.
#[derive(Clone)]
pub struct PgDrinkRepository {
    pool: PgPool,
}

impl PgDrinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_region_matching(
        &self,
        region_id: i64,
        pattern: String,
    ) -> Result<Vec<DrinkRecord>, AppError> {
        let rows = sqlx::query_as::<_, DrinkRow>(&format!(
            "{} WHERE d.region_id = $1 AND d.name LIKE $2 ORDER BY d.name",
            DRINK_SELECT
        ))
        .bind(region_id)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_record()).collect())
    }
}

#[async_trait]
impl DrinkRepository for PgDrinkRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<DrinkRecord>, AppError> {
        let row = sqlx::query_as::<_, DrinkRow>(&format!("{} WHERE d.id = $1", DRINK_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.into_record()))
    }

    async fn find_by_region(&self, region_id: i64) -> Result<Vec<DrinkRecord>, AppError> {
        let rows = sqlx::query_as::<_, DrinkRow>(&format!(
            "{} WHERE d.region_id = $1 ORDER BY d.name",
            DRINK_SELECT
        ))
        .bind(region_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_record()).collect())
    }

    async fn find_by_region_and_name_containing(
        &self,
        region_id: i64,
        name: &str,
    ) -> Result<Vec<DrinkRecord>, AppError> {
        self.find_by_region_matching(region_id, format!("%{}%", escape_like(name)))
            .await
    }

    async fn find_by_region_and_name_starting_with(
        &self,
        region_id: i64,
        name: &str,
    ) -> Result<Vec<DrinkRecord>, AppError> {
        self.find_by_region_matching(region_id, format!("{}%", escape_like(name)))
            .await
    }

    async fn create(&self, drink: &Drink) -> Result<Drink, AppError> {
        sqlx::query(
            r#"
            INSERT INTO drinks (id, region_id, name, drink_type, degree, sweetness,
                                cost, description, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(drink.id)
        .bind(drink.region_id)
        .bind(&drink.name)
        .bind(drink.drink_type.as_str())
        .bind(drink.degree)
        .bind(drink.sweetness)
        .bind(drink.cost)
        .bind(&drink.description)
        .bind(&drink.image_url)
        .bind(drink.created_at)
        .execute(&self.pool)
        .await?;

        Ok(drink.clone())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RegionRow {
    id: i64,
    place_name: String,
}

impl From<RegionRow> for Region {
    fn from(row: RegionRow) -> Self {
        Region {
            id: row.id,
            place_name: row.place_name,
        }
    }
}

/// PostgreSQL region repository implementation.
#[derive(Clone)]
pub struct PgRegionRepository {
    pool: PgPool,
}

impl PgRegionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegionRepository for PgRegionRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Region>, AppError> {
        let row = sqlx::query_as::<_, RegionRow>("SELECT id, place_name FROM regions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Region::from))
    }

    async fn find_all(&self) -> Result<Vec<Region>, AppError> {
        let rows = sqlx::query_as::<_, RegionRow>("SELECT id, place_name FROM regions ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Region::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("makgeolli"), "makgeolli");
    }
}
