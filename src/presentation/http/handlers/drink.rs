//! Drink Catalog Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::application::dto::request::CatalogQuery;
use crate::application::dto::response::{DrinkResponse, RegionResponse};
use crate::application::services::DrinkService;
use crate::shared::error::AppError;
use crate::startup::AppState;

pub async fn get_regions(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegionResponse>>, AppError> {
    let regions = state.drink_service().get_regions().await?;
    Ok(Json(regions))
}

pub async fn get_drink(
    State(state): State<AppState>,
    Path(drink_id): Path<i64>,
) -> Result<Json<DrinkResponse>, AppError> {
    let drink = state.drink_service().get_drink(drink_id).await?;
    Ok(Json(drink))
}

/// Drinks of a region, filtered by `?name=` and `?prefix=`
pub async fn get_region_drinks(
    State(state): State<AppState>,
    Path(region_id): Path<i64>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<DrinkResponse>>, AppError> {
    let drinks = state
        .drink_service()
        .search_drinks(region_id, query.name, query.prefix)
        .await?;
    Ok(Json(drinks))
}
