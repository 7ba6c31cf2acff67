use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

use crate::{
    errors::ServiceError, models::NewOrder, services::orders::AddOrderResponse, AppState,
};

const EXPORT_FILENAME: &str = "orders.csv";

/// Build the order intake Router scoped under `/orders`.
pub fn orders_routes() -> Router<AppState> {
    Router::new()
        .route("/add-order", post(add_order))
        .route("/export", get(export_orders))
}

/// Record a new order
#[utoipa::path(
    post,
    path = "/orders/add-order",
    request_body = NewOrder,
    responses(
        (status = 200, description = "Order accepted", body = AddOrderResponse),
        (status = 400, description = "Invalid order", body = crate::errors::ErrorResponse),
        (status = 500, description = "Order could not be saved", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn add_order(
    State(state): State<AppState>,
    Json(payload): Json<NewOrder>,
) -> Result<Json<AddOrderResponse>, ServiceError> {
    Ok(Json(state.services.orders.add_order(payload).await?))
}

/// Download the live order file as CSV
#[utoipa::path(
    get,
    path = "/orders/export",
    responses(
        (status = 200, description = "Order file", content_type = "text/csv", body = String)
    ),
    tag = "Orders"
)]
pub async fn export_orders(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let bytes = state.services.orders.export_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        bytes,
    ))
}
