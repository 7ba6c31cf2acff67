pub mod analytics;
pub mod ml;
pub mod orders;

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    config::{AppConfig, DataMode},
    services::{analytics::AnalyticsService, forecasting::ForecastingService, orders::OrderService},
    store::{CsvOrderStore, OrderSource},
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub forecasting: Arc<ForecastingService>,
    pub analytics: Arc<AnalyticsService>,
    pub orders: Arc<OrderService>,
}

impl AppServices {
    /// Wires every service to the CSV files named in the configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let production = CsvOrderStore::new(config.csv_path(DataMode::Production));
        let demo = CsvOrderStore::new(config.csv_path(DataMode::Demo));
        let configured: Arc<dyn OrderSource> =
            Arc::new(CsvOrderStore::new(config.csv_path(config.data_mode)));

        Self {
            forecasting: Arc::new(ForecastingService::new(
                Arc::new(demo),
                Arc::new(production.clone()),
                config.data_mode,
            )),
            analytics: Arc::new(AnalyticsService::new(configured)),
            orders: Arc::new(OrderService::new(production, config.data_mode)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    #[schema(example = "Restaurant Analytics API")]
    pub message: String,
    pub mode: DataMode,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    pub mode: DataMode,
    pub orders_csv_present: bool,
}

/// Service banner with the configured data mode
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = RootResponse)),
    tag = "Health"
)]
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Restaurant Analytics API".to_string(),
        mode: state.config.data_mode,
    })
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        mode: state.config.data_mode,
        orders_csv_present: state.services.orders.orders_file_present(),
    })
}
