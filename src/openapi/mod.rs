use axum::{response::Json, routing::get, Router};
use utoipa::OpenApi;

use crate::{config::DataMode, errors::ErrorResponse, handlers, ml, models, services};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Restaurant Analytics API",
        version = "0.1.0",
        description = r#"
# Restaurant Analytics API

Read-only analytics and short-horizon forecasts over a restaurant's order history.

## Data modes

Every forecast endpoint accepts `mode=demo|production`. Demo mode reads the bundled
sample history; production mode reads the live order file. An absent or unrecognised
value falls back to the configured mode.

## Forecast methods

- `no_data`: no order carried a parseable timestamp
- `fallback_last_value`: fewer than three distinct dates; the last day's total is repeated
- `fallback_average`: fewer than three distinct dates for an item; its mean daily quantity is repeated
- `numpy_regression`: least-squares trend over ordinal day numbers
- `hourly_grouping`: quantities summed per hour of day
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    tags(
        (name = "ML", description = "Forecasting endpoints"),
        (name = "Analytics", description = "Grouping reports"),
        (name = "Orders", description = "Order intake and export"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        handlers::root,
        handlers::health,
        handlers::ml::predict_tomorrow,
        handlers::ml::predict_item_demand,
        handlers::ml::predict_peak_hour,
        handlers::ml::sales_trend,
        handlers::analytics::get_top_items,
        handlers::analytics::get_peak_hours,
        handlers::analytics::get_weekend_vs_weekday,
        handlers::analytics::get_category_sales,
        handlers::analytics::get_revenue_per_day,
        handlers::orders::add_order,
        handlers::orders::export_orders,
    ),
    components(
        schemas(
            DataMode,
            handlers::RootResponse,
            handlers::HealthResponse,
            ml::ForecastMethod,
            ml::TrendDirection,
            ml::TomorrowForecast,
            ml::ItemDemandForecast,
            ml::ItemDemandReport,
            ml::PeakHourForecast,
            ml::SalesTrend,
            services::analytics::ItemQuantity,
            services::analytics::HourlyOrderCount,
            services::analytics::WeekSplit,
            services::analytics::CategoryQuantity,
            services::analytics::DailyRevenue,
            services::orders::IntakeStatus,
            services::orders::AddOrderResponse,
            models::NewOrder,
            ErrorResponse,
        )
    )
)]
pub struct ApiDoc;

/// Serves the generated document at `/api-docs/openapi.json`.
pub fn openapi_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
