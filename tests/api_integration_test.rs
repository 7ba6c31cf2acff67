mod common;

use axum::http::{header, Method, StatusCode};
use common::{body_json, body_text, demo_history, TestApp, HEADER};
use restaurant_analytics::config::DataMode;
use serde_json::json;

#[tokio::test]
async fn root_and_health_report_mode() {
    let app = TestApp::new(&[]);

    let (status, body) = app.get_json("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"message": "Restaurant Analytics API", "mode": "production"})
    );

    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["orders_csv_present"], false);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::new(&[]);
    let response = app.request(Method::GET, "/health", None).await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn forecasts_on_empty_production_history_use_fallbacks() {
    let app = TestApp::new(&demo_history());

    let (_, body) = app.get_json("/ml/predict-tomorrow").await;
    assert_eq!(body, json!({"predicted_orders": 0, "method": "no_data"}));

    let (_, body) = app.get_json("/ml/predict-item-demand").await;
    assert_eq!(body, json!({"results": []}));

    let (_, body) = app.get_json("/ml/predict-peak-hour").await;
    assert_eq!(body, json!({"peak_hour": null, "estimate": 0}));

    let (_, body) = app.get_json("/ml/sales-trend").await;
    assert_eq!(body, json!({"trend": "not_enough_data", "slope": 0.0}));
}

#[tokio::test]
async fn mode_query_selects_demo_history() {
    let app = TestApp::new(&demo_history());

    let (status, body) = app.get_json("/ml/predict-tomorrow?mode=demo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"predicted_orders": 12, "method": "numpy_regression"}));

    let (_, body) = app.get_json("/ml/predict-peak-hour?mode=demo").await;
    assert_eq!(
        body,
        json!({"peak_hour": 19, "estimate": 15, "method": "hourly_grouping"})
    );

    let (_, body) = app.get_json("/ml/sales-trend?mode=demo").await;
    assert_eq!(body["trend"], "increasing");
    assert!(body["slope"].as_f64().unwrap() > 2.6);

    // Unknown modes fall back to the configured one.
    let (_, body) = app.get_json("/ml/predict-tomorrow?mode=staging").await;
    assert_eq!(body["method"], "no_data");
}

#[tokio::test]
async fn item_demand_per_item() {
    let app = TestApp::new(&demo_history());

    let (status, body) = app
        .get_json("/ml/predict-item-demand?mode=demo&n_days=2")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"results": [
            {"item": "Biryani", "predictions": [10, 12], "method": "numpy_regression"},
            {"item": "Lassi", "predictions": [1, 1], "method": "fallback_average"}
        ]})
    );

    let (_, body) = app.get_json("/ml/predict-item-demand?mode=demo").await;
    assert_eq!(body["results"][0]["predictions"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn item_demand_rejects_out_of_range_horizon() {
    let app = TestApp::new(&demo_history());

    for uri in [
        "/ml/predict-item-demand?n_days=0",
        "/ml/predict-item-demand?n_days=31",
        "/ml/predict-item-demand?n_days=-4",
    ] {
        let (status, body) = app.get_json(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "Bad Request");
        assert!(body["request_id"].is_string());
    }
}

#[tokio::test]
async fn item_demand_rejects_non_numeric_horizon_with_error_body() {
    let app = TestApp::new(&demo_history());

    let (status, body) = app.get_json("/ml/predict-item-demand?n_days=lots").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].as_str().unwrap().contains("n_days"));
    assert!(body["request_id"].is_string());

    // An empty value means the default horizon.
    let (status, body) = app
        .get_json("/ml/predict-item-demand?mode=demo&n_days=")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["predictions"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn analytics_reports_over_configured_history() {
    let app = TestApp::with_mode(DataMode::Demo, &demo_history(), None);

    let (_, body) = app.get_json("/analytics/top-items?limit=1").await;
    assert_eq!(body, json!([{"item": "Biryani", "quantity": 20}]));

    let (_, body) = app.get_json("/analytics/peak-hours").await;
    assert_eq!(
        body,
        json!([
            {"hour": 8, "order_count": 1},
            {"hour": 12, "order_count": 2},
            {"hour": 19, "order_count": 3}
        ])
    );

    let (_, body) = app.get_json("/analytics/weekend-vs-weekday").await;
    assert_eq!(body, json!({"weekday_orders": 6, "weekend_orders": 0}));

    let (_, body) = app.get_json("/analytics/category-sales").await;
    assert_eq!(
        body,
        json!([
            {"category": "Drinks", "quantity": 3},
            {"category": "Mains", "quantity": 20}
        ])
    );

    let (_, body) = app.get_json("/analytics/revenue-per-day").await;
    assert_eq!(body[0], json!({"date": "2024-01-01", "total_amount": 10.0}));
    assert_eq!(body[3], json!({"date": "2024-01-04", "total_amount": 44.0}));
}

#[tokio::test]
async fn add_order_appends_and_feeds_forecasts() {
    let app = TestApp::new(&[]);

    for (id, day, qty) in [("a", 1, 3), ("b", 2, 5), ("c", 3, 7)] {
        let response = app
            .request(
                Method::POST,
                "/orders/add-order",
                Some(json!({
                    "order_id": id,
                    "timestamp": format!("2024-02-0{day} 13:00:00"),
                    "item": "Thali",
                    "category": "Mains",
                    "quantity": qty,
                    "price_per_item": 6.5,
                    "total_amount": 6.5 * qty as f64
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "success", "saved": true}));
    }

    let contents = std::fs::read_to_string(app.orders_csv()).unwrap();
    assert!(contents.starts_with(HEADER));
    assert_eq!(contents.lines().count(), 4);

    let (_, body) = app.get_json("/ml/predict-tomorrow").await;
    assert_eq!(body, json!({"predicted_orders": 9, "method": "numpy_regression"}));

    let (_, body) = app.get_json("/health").await;
    assert_eq!(body["orders_csv_present"], true);
}

#[tokio::test]
async fn add_order_validates_payload() {
    let app = TestApp::new(&[]);

    let response = app
        .request(
            Method::POST,
            "/orders/add-order",
            Some(json!({
                "order_id": "x",
                "timestamp": "sometime",
                "item": "Thali",
                "category": "Mains",
                "quantity": 1,
                "price_per_item": 1,
                "total_amount": 1
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("timestamp"));
    assert!(!app.orders_csv().exists());
}

#[tokio::test]
async fn demo_mode_does_not_persist_orders() {
    let app = TestApp::with_mode(DataMode::Demo, &demo_history(), None);

    let response = app
        .request(
            Method::POST,
            "/orders/add-order",
            Some(json!({
                "order_id": "d1",
                "timestamp": "2024-02-01 13:00:00",
                "item": "Thali",
                "category": "Mains",
                "quantity": 1,
                "price_per_item": 6.5,
                "total_amount": 6.5
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "demo_mode", "saved": false}));
    assert!(!app.orders_csv().exists());
}

#[tokio::test]
async fn export_downloads_live_file() {
    let rows = ["9,2024-03-01 10:00:00,Chai,Drinks,2,1.00,2.00"];
    let app = TestApp::with_mode(DataMode::Production, &[], Some(&rows));

    let response = app.request(Method::GET, "/orders/export", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .starts_with("attachment"));
    assert_eq!(body_text(response).await, format!("{HEADER}\n{}\n", rows[0]));
}

#[tokio::test]
async fn export_without_file_is_header_only() {
    let app = TestApp::new(&[]);
    let response = app.request(Method::GET, "/orders/export", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, format!("{HEADER}\n"));
}

#[tokio::test]
async fn malformed_rows_do_not_break_forecasts() {
    let rows = [
        "1,2024-01-01 09:00:00,Tea,Drinks,3,1.00,3.00",
        "2,not a time,Tea,Drinks,50,1.00,50.00",
        "3,2024-01-02 09:00:00,Tea,Drinks,lots,1.00,0",
    ];
    let app = TestApp::with_mode(DataMode::Production, &[], Some(&rows));

    let (status, body) = app.get_json("/ml/predict-tomorrow").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"predicted_orders": 0, "method": "fallback_last_value"}));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new(&[]);
    let (status, body) = app.get_json("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/ml/predict-item-demand"].is_object());
    assert!(app.dir().exists());
}
