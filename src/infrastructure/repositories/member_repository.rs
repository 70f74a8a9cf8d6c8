//! Member Repository Implementation
//!
//! PostgreSQL implementation of the MemberRepository trait.
//! Maps between the database schema and domain Member entity.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::domain::{DrinkType, Member, MemberRepository, Role};
use crate::shared::error::{AppError, ErrorCode};

/// Database row representation of the members table.
#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: i64,
    region_id: i64,
    name: String,
    email: String,
    password_hash: String,
    birth_date: Option<NaiveDate>,
    favor_drinks: Vec<String>,
    role: String,
    alarm_enabled: bool,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemberRow {
    /// Convert database row to domain Member entity.
    fn into_member(self) -> Member {
        Member {
            id: self.id,
            region_id: self.region_id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            birth_date: self.birth_date,
            favor_drinks: self
                .favor_drinks
                .iter()
                .map(|d| DrinkType::from_str(d))
                .collect(),
            role: Role::from_str(&self.role),
            alarm_enabled: self.alarm_enabled,
            image_url: self.image_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn favor_drinks_column(member: &Member) -> Vec<String> {
    member
        .favor_drinks
        .iter()
        .map(|d| d.as_str().to_string())
        .collect()
}

const MEMBER_COLUMNS: &str = "id, region_id, name, email, password_hash, birth_date, \
     favor_drinks, role, alarm_enabled, image_url, created_at, updated_at";

/// PostgreSQL member repository implementation.
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    /// Create a new PgMemberRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Member>, AppError> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {} FROM members WHERE id = $1",
            MEMBER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_member()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, AppError> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {} FROM members WHERE email = $1",
            MEMBER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_member()))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM members WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn create(&self, member: &Member) -> Result<Member, AppError> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            r#"
            INSERT INTO members (id, region_id, name, email, password_hash, birth_date,
                                 favor_drinks, role, alarm_enabled, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            MEMBER_COLUMNS
        ))
        .bind(member.id)
        .bind(member.region_id)
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.password_hash)
        .bind(member.birth_date)
        .bind(favor_drinks_column(member))
        .bind(member.role.as_str())
        .bind(member.alarm_enabled)
        .bind(&member.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Code(ErrorCode::EmailAlreadyExists)
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_member())
    }

    async fn update(&self, member: &Member) -> Result<Member, AppError> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            r#"
            UPDATE members
            SET region_id = $2,
                name = $3,
                favor_drinks = $4,
                alarm_enabled = $5,
                image_url = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            MEMBER_COLUMNS
        ))
        .bind(member.id)
        .bind(member.region_id)
        .bind(&member.name)
        .bind(favor_drinks_column(member))
        .bind(member.alarm_enabled)
        .bind(&member.image_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::Code(ErrorCode::MemberNotFound))?;

        Ok(row.into_member())
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE members SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ErrorCode::MemberNotFound.into());
        }

        Ok(())
    }
}
