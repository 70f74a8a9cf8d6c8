//! Registration entity and repository trait.
//!
//! Maps to the `registrations` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::drink::{Drink, DrinkType};
use crate::shared::error::{AppError, ErrorCode};

/// A member's proposal to add a drink to the catalog.
///
/// Maps to the `registrations` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - member_id: BIGINT NOT NULL REFERENCES members(id)
/// - region_id: BIGINT NOT NULL REFERENCES regions(id)
/// - drink_name: VARCHAR(100) NOT NULL
/// - drink_type: VARCHAR(30) NOT NULL
/// - degree: INTEGER NOT NULL
/// - sweetness: INTEGER NOT NULL
/// - cost: INTEGER NOT NULL
/// - description: TEXT NULL
/// - image_url: TEXT NULL
/// - approved: BOOLEAN NOT NULL DEFAULT FALSE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// `approved` only ever moves from false to true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    /// Submitting member
    pub member_id: i64,
    pub region_id: i64,
    pub drink_name: String,
    pub drink_type: DrinkType,
    pub degree: i32,
    pub sweetness: i32,
    pub cost: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    /// Mark as approved; a second approval is rejected.
    pub fn approve(&mut self) -> Result<(), AppError> {
        if self.approved {
            return Err(ErrorCode::RegistrationAlreadyApproved.into());
        }
        self.approved = true;
        Ok(())
    }

    /// Catalog entry this registration becomes once approved.
    pub fn to_drink(&self, drink_id: i64) -> Drink {
        Drink {
            id: drink_id,
            region_id: self.region_id,
            name: self.drink_name.clone(),
            drink_type: self.drink_type,
            degree: self.degree,
            sweetness: self.sweetness,
            cost: self.cost,
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            created_at: Utc::now(),
        }
    }
}

impl Default for Registration {
    fn default() -> Self {
        Self {
            id: 0,
            member_id: 0,
            region_id: 0,
            drink_name: String::new(),
            drink_type: DrinkType::default(),
            degree: 0,
            sweetness: 0,
            cost: 0,
            description: None,
            image_url: None,
            approved: false,
            created_at: Utc::now(),
        }
    }
}

/// Repository trait for Registration data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, AppError>;

    /// Registrations still waiting for approval, oldest first.
    async fn find_pending(&self) -> Result<Vec<Registration>, AppError>;

    async fn create(&self, registration: &Registration) -> Result<Registration, AppError>;

    /// Flip `approved` to true; returns false if it was already approved.
    async fn mark_approved(&self, id: i64) -> Result<bool, AppError>;
}
