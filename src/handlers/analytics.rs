use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    errors::ServiceError,
    services::analytics::{
        CategoryQuantity, DailyRevenue, HourlyOrderCount, ItemQuantity, WeekSplit,
    },
    AppState,
};

/// Build the analytics Router scoped under `/analytics`.
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/top-items", get(get_top_items))
        .route("/peak-hours", get(get_peak_hours))
        .route("/weekend-vs-weekday", get(get_weekend_vs_weekday))
        .route("/category-sales", get(get_category_sales))
        .route("/revenue-per-day", get(get_revenue_per_day))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopItemsQuery {
    /// Number of items to return (default: 10)
    pub limit: Option<usize>,
}

/// Best-selling items by quantity
#[utoipa::path(
    get,
    path = "/analytics/top-items",
    params(TopItemsQuery),
    responses(
        (status = 200, description = "Top items retrieved successfully", body = Vec<ItemQuantity>)
    ),
    tag = "Analytics"
)]
pub async fn get_top_items(
    State(state): State<AppState>,
    Query(params): Query<TopItemsQuery>,
) -> Result<Json<Vec<ItemQuantity>>, ServiceError> {
    let limit = params.limit.unwrap_or(state.config.default_top_items_limit);
    Ok(Json(state.services.analytics.top_items(limit).await?))
}

/// Order count per hour of day
#[utoipa::path(
    get,
    path = "/analytics/peak-hours",
    responses(
        (status = 200, description = "Hourly order counts retrieved successfully", body = Vec<HourlyOrderCount>)
    ),
    tag = "Analytics"
)]
pub async fn get_peak_hours(
    State(state): State<AppState>,
) -> Result<Json<Vec<HourlyOrderCount>>, ServiceError> {
    Ok(Json(state.services.analytics.peak_hours().await?))
}

#[utoipa::path(
    get,
    path = "/analytics/weekend-vs-weekday",
    responses(
        (status = 200, description = "Weekday and weekend order counts", body = WeekSplit)
    ),
    tag = "Analytics"
)]
pub async fn get_weekend_vs_weekday(
    State(state): State<AppState>,
) -> Result<Json<WeekSplit>, ServiceError> {
    Ok(Json(state.services.analytics.weekend_vs_weekday().await?))
}

/// Quantity sold per menu category
#[utoipa::path(
    get,
    path = "/analytics/category-sales",
    responses(
        (status = 200, description = "Category sales retrieved successfully", body = Vec<CategoryQuantity>)
    ),
    tag = "Analytics"
)]
pub async fn get_category_sales(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryQuantity>>, ServiceError> {
    Ok(Json(state.services.analytics.category_sales().await?))
}

/// Revenue per calendar date
#[utoipa::path(
    get,
    path = "/analytics/revenue-per-day",
    responses(
        (status = 200, description = "Daily revenue retrieved successfully", body = Vec<DailyRevenue>)
    ),
    tag = "Analytics"
)]
pub async fn get_revenue_per_day(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyRevenue>>, ServiceError> {
    Ok(Json(state.services.analytics.revenue_per_day().await?))
}
