//! Drink and Region entities and repository traits.
//!
//! Maps to the `drinks` and `regions` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Drink category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrinkType {
    Makgeolli,
    YakjuCheongju,
    FruitWine,
    DistilledSpirits,
    Soju,
    Beer,
    #[default]
    Other,
}

impl DrinkType {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "MAKGEOLLI" => Self::Makgeolli,
            "YAKJU_CHEONGJU" => Self::YakjuCheongju,
            "FRUIT_WINE" => Self::FruitWine,
            "DISTILLED_SPIRITS" => Self::DistilledSpirits,
            "SOJU" => Self::Soju,
            "BEER" => Self::Beer,
            _ => Self::Other,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Makgeolli => "MAKGEOLLI",
            Self::YakjuCheongju => "YAKJU_CHEONGJU",
            Self::FruitWine => "FRUIT_WINE",
            Self::DistilledSpirits => "DISTILLED_SPIRITS",
            Self::Soju => "SOJU",
            Self::Beer => "BEER",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for DrinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Province or city a drink comes from.
///
/// Maps to the `regions` table:
/// - id: BIGINT PRIMARY KEY
/// - place_name: VARCHAR(50) NOT NULL UNIQUE
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: i64,
    pub place_name: String,
}

/// A catalog entry.
///
/// Maps to the `drinks` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - region_id: BIGINT NOT NULL REFERENCES regions(id)
/// - name: VARCHAR(100) NOT NULL
/// - drink_type: VARCHAR(30) NOT NULL
/// - degree: INTEGER NOT NULL
/// - sweetness: INTEGER NOT NULL
/// - cost: INTEGER NOT NULL
/// - description: TEXT NULL
/// - image_url: TEXT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drink {
    pub id: i64,
    pub region_id: i64,
    pub name: String,
    pub drink_type: DrinkType,
    /// Alcohol by volume, in percent
    pub degree: i32,
    /// 0 (dry) to 5 (sweet)
    pub sweetness: i32,
    /// Price in KRW
    pub cost: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Default for Drink {
    fn default() -> Self {
        Self {
            id: 0,
            region_id: 0,
            name: String::new(),
            drink_type: DrinkType::default(),
            degree: 0,
            sweetness: 0,
            cost: 0,
            description: None,
            image_url: None,
            created_at: Utc::now(),
        }
    }
}

/// Drink joined with its region name, as shown on posts and catalog pages.
#[derive(Debug, Clone, PartialEq)]
pub struct DrinkRecord {
    pub drink: Drink,
    pub place_name: String,
}

/// Repository trait for Drink data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DrinkRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<DrinkRecord>, AppError>;

    async fn find_by_region(&self, region_id: i64) -> Result<Vec<DrinkRecord>, AppError>;

    /// Drinks in a region whose name contains `name`.
    async fn find_by_region_and_name_containing(
        &self,
        region_id: i64,
        name: &str,
    ) -> Result<Vec<DrinkRecord>, AppError>;

    /// Drinks in a region whose name starts with `name`.
    async fn find_by_region_and_name_starting_with(
        &self,
        region_id: i64,
        name: &str,
    ) -> Result<Vec<DrinkRecord>, AppError>;

    async fn create(&self, drink: &Drink) -> Result<Drink, AppError>;
}

/// Repository trait for Region lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegionRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Region>, AppError>;

    async fn find_all(&self) -> Result<Vec<Region>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drink_type_roundtrip() {
        let types = [
            DrinkType::Makgeolli,
            DrinkType::YakjuCheongju,
            DrinkType::FruitWine,
            DrinkType::DistilledSpirits,
            DrinkType::Soju,
            DrinkType::Beer,
            DrinkType::Other,
        ];

        for t in types {
            assert_eq!(DrinkType::from_str(t.as_str()), t);
        }
    }

    #[test]
    fn test_drink_type_serde_matches_db_representation() {
        let json = serde_json::to_string(&DrinkType::DistilledSpirits).unwrap();
        assert_eq!(json, "\"DISTILLED_SPIRITS\"");
    }

    #[test]
    fn test_unknown_drink_type_is_other() {
        assert_eq!(DrinkType::from_str("WHISKY"), DrinkType::Other);
    }
}
