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
    ml::{ItemDemandReport, PeakHourForecast, SalesTrend, TomorrowForecast},
    AppState,
};

/// Build the forecasting Router scoped under `/ml`.
pub fn ml_routes() -> Router<AppState> {
    Router::new()
        .route("/predict-tomorrow", get(predict_tomorrow))
        .route("/predict-item-demand", get(predict_item_demand))
        .route("/predict-peak-hour", get(predict_peak_hour))
        .route("/sales-trend", get(sales_trend))
}

/// Selects the order history a forecast runs on
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ModeQuery {
    /// `demo` or `production`; anything else uses the configured mode
    pub mode: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemDemandQuery {
    /// `demo` or `production`; anything else uses the configured mode
    pub mode: Option<String>,
    /// Forecast horizon in days (default: 7)
    #[param(value_type = Option<i64>, minimum = 1, maximum = 30)]
    pub n_days: Option<String>,
}

/// Total orders expected the day after the last recorded date
#[utoipa::path(
    get,
    path = "/ml/predict-tomorrow",
    params(ModeQuery),
    responses(
        (status = 200, description = "Forecast computed", body = TomorrowForecast),
        (status = 500, description = "Order history unreadable", body = crate::errors::ErrorResponse)
    ),
    tag = "ML"
)]
pub async fn predict_tomorrow(
    State(state): State<AppState>,
    Query(params): Query<ModeQuery>,
) -> Result<Json<TomorrowForecast>, ServiceError> {
    let service = &state.services.forecasting;
    let mode = service.resolve_mode(params.mode.as_deref());
    Ok(Json(service.predict_tomorrow(mode).await?))
}

/// Per-item demand for the next `n_days` days
#[utoipa::path(
    get,
    path = "/ml/predict-item-demand",
    params(ItemDemandQuery),
    responses(
        (status = 200, description = "Forecasts computed", body = ItemDemandReport),
        (status = 400, description = "Invalid forecast horizon", body = crate::errors::ErrorResponse)
    ),
    tag = "ML"
)]
pub async fn predict_item_demand(
    State(state): State<AppState>,
    Query(params): Query<ItemDemandQuery>,
) -> Result<Json<ItemDemandReport>, ServiceError> {
    let max = i64::from(state.config.max_forecast_days);
    let n_days = match params.n_days.as_deref().map(str::trim) {
        None | Some("") => i64::from(state.config.default_forecast_days),
        Some(raw) => raw.parse::<i64>().map_err(|_| {
            ServiceError::InvalidInput(format!("n_days must be an integer, got '{raw}'"))
        })?,
    };

    if !(1..=max).contains(&n_days) {
        return Err(ServiceError::InvalidInput(format!(
            "n_days must be between 1 and {max}"
        )));
    }

    let service = &state.services.forecasting;
    let mode = service.resolve_mode(params.mode.as_deref());
    Ok(Json(service.predict_item_demand(mode, n_days as usize).await?))
}

/// Hour of day with the highest total quantity
#[utoipa::path(
    get,
    path = "/ml/predict-peak-hour",
    params(ModeQuery),
    responses(
        (status = 200, description = "Peak hour computed", body = PeakHourForecast)
    ),
    tag = "ML"
)]
pub async fn predict_peak_hour(
    State(state): State<AppState>,
    Query(params): Query<ModeQuery>,
) -> Result<Json<PeakHourForecast>, ServiceError> {
    let service = &state.services.forecasting;
    let mode = service.resolve_mode(params.mode.as_deref());
    Ok(Json(service.predict_peak_hour(mode).await?))
}

/// Direction of daily sales volume
#[utoipa::path(
    get,
    path = "/ml/sales-trend",
    params(ModeQuery),
    responses(
        (status = 200, description = "Trend computed", body = SalesTrend)
    ),
    tag = "ML"
)]
pub async fn sales_trend(
    State(state): State<AppState>,
    Query(params): Query<ModeQuery>,
) -> Result<Json<SalesTrend>, ServiceError> {
    let service = &state.services.forecasting;
    let mode = service.resolve_mode(params.mode.as_deref());
    Ok(Json(service.sales_trend(mode).await?))
}
