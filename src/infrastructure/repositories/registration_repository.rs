//! Registration Repository Implementation
//!
//! PostgreSQL implementation of the RegistrationRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{DrinkType, Registration, RegistrationRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct RegistrationRow {
    id: i64,
    member_id: i64,
    region_id: i64,
    drink_name: String,
    drink_type: String,
    degree: i32,
    sweetness: i32,
    cost: i32,
    description: Option<String>,
    image_url: Option<String>,
    approved: bool,
    created_at: DateTime<Utc>,
}

impl RegistrationRow {
    fn into_registration(self) -> Registration {
        Registration {
            id: self.id,
            member_id: self.member_id,
            region_id: self.region_id,
            drink_name: self.drink_name,
            drink_type: DrinkType::from_str(&self.drink_type),
            degree: self.degree,
            sweetness: self.sweetness,
            cost: self.cost,
            description: self.description,
            image_url: self.image_url,
            approved: self.approved,
            created_at: self.created_at,
        }
    }
}

const REGISTRATION_COLUMNS: &str = "id, member_id, region_id, drink_name, drink_type, degree, \
     sweetness, cost, description, image_url, approved, created_at";

/// PostgreSQL registration repository implementation.
#[derive(Clone)]
pub struct PgRegistrationRepository {
    pool: PgPool,
}

impl PgRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for PgRegistrationRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, AppError> {
        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            "SELECT {} FROM registrations WHERE id = $1",
            REGISTRATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_registration()))
    }

    async fn find_pending(&self) -> Result<Vec<Registration>, AppError> {
        let rows = sqlx::query_as::<_, RegistrationRow>(&format!(
            "SELECT {} FROM registrations WHERE approved = FALSE ORDER BY created_at, id",
            REGISTRATION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_registration()).collect())
    }

    async fn create(&self, registration: &Registration) -> Result<Registration, AppError> {
        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            r#"
            INSERT INTO registrations (id, member_id, region_id, drink_name, drink_type, degree,
                                       sweetness, cost, description, image_url, approved)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE)
            RETURNING {}
            "#,
            REGISTRATION_COLUMNS
        ))
        .bind(registration.id)
        .bind(registration.member_id)
        .bind(registration.region_id)
        .bind(&registration.drink_name)
        .bind(registration.drink_type.as_str())
        .bind(registration.degree)
        .bind(registration.sweetness)
        .bind(registration.cost)
        .bind(&registration.description)
        .bind(&registration.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_registration())
    }

    async fn mark_approved(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE registrations SET approved = TRUE WHERE id = $1 AND approved = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
