//! Drink Service
//!
//! Read-only access to the drink catalog and its regions.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::application::dto::response::{DrinkResponse, RegionResponse};
use crate::domain::{DrinkRepository, RegionRepository};
use crate::shared::error::{AppError, ErrorCode};

/// Drink service trait
#[async_trait]
pub trait DrinkService: Send + Sync {
    async fn get_drink(&self, drink_id: i64) -> Result<DrinkResponse, AppError>;

    async fn get_regions(&self) -> Result<Vec<RegionResponse>, AppError>;

    /// Drinks of a region, optionally filtered by name.
    ///
    /// With `prefix` the name must start with the term; otherwise it
    /// only has to contain it.
    async fn search_drinks(
        &self,
        region_id: i64,
        name: Option<String>,
        prefix: bool,
    ) -> Result<Vec<DrinkResponse>, AppError>;
}

/// DrinkService implementation
pub struct DrinkServiceImpl<D, R>
where
    D: DrinkRepository,
    R: RegionRepository,
{
    drink_repo: Arc<D>,
    region_repo: Arc<R>,
}

impl<D, R> DrinkServiceImpl<D, R>
where
    D: DrinkRepository,
    R: RegionRepository,
{
    pub fn new(drink_repo: Arc<D>, region_repo: Arc<R>) -> Self {
        Self {
            drink_repo,
            region_repo,
        }
    }
}

#[async_trait]
impl<D, R> DrinkService for DrinkServiceImpl<D, R>
where
    D: DrinkRepository + 'static,
    R: RegionRepository + 'static,
{
    #[instrument(skip(self))]
    async fn get_drink(&self, drink_id: i64) -> Result<DrinkResponse, AppError> {
        let record = self
            .drink_repo
            .find_by_id(drink_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::DrinkNotFound))?;

        Ok(DrinkResponse::from(record))
    }

    #[instrument(skip(self))]
    async fn get_regions(&self) -> Result<Vec<RegionResponse>, AppError> {
        let regions = self.region_repo.find_all().await?;
        Ok(regions.into_iter().map(RegionResponse::from).collect())
    }

    #[instrument(skip(self))]
    async fn search_drinks(
        &self,
        region_id: i64,
        name: Option<String>,
        prefix: bool,
    ) -> Result<Vec<DrinkResponse>, AppError> {
        self.region_repo
            .find_by_id(region_id)
            .await?
            .ok_or(AppError::Code(ErrorCode::RegionNotFound))?;

        let name = name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let records = match name {
            None => self.drink_repo.find_by_region(region_id).await?,
            Some(name) if prefix => {
                self.drink_repo
                    .find_by_region_and_name_starting_with(region_id, name)
                    .await?
            }
            Some(name) => {
                self.drink_repo
                    .find_by_region_and_name_containing(region_id, name)
                    .await?
            }
        };

        Ok(records.into_iter().map(DrinkResponse::from).collect())
    }
}
