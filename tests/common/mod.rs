#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    Router,
};
use restaurant_analytics::{
    build_router,
    config::{AppConfig, DataMode},
    AppState,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const HEADER: &str = "order_id,timestamp,item,category,quantity,price_per_item,total_amount";

/// Helper harness for an application backed by CSV files in a temp directory.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    dir: TempDir,
}

impl TestApp {
    /// Production mode with an empty live history and the given demo rows.
    pub fn new(demo_rows: &[&str]) -> Self {
        Self::with_mode(DataMode::Production, demo_rows, None)
    }

    pub fn with_mode(mode: DataMode, demo_rows: &[&str], production_rows: Option<&[&str]>) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let demo_csv = dir.path().join("dummy_orders_menu.csv");
        let orders_csv = dir.path().join("live").join("orders.csv");

        write_csv(&demo_csv, demo_rows);
        if let Some(rows) = production_rows {
            std::fs::create_dir_all(orders_csv.parent().unwrap()).unwrap();
            write_csv(&orders_csv, rows);
        }

        let cfg = AppConfig {
            environment: "test".into(),
            cors_allowed_origins: Some("http://localhost:3000".into()),
            data_mode: mode,
            orders_csv_path: orders_csv,
            demo_csv_path: demo_csv,
            ..AppConfig::default()
        };

        let state = AppState::new(cfg);
        let router = build_router(state.clone()).expect("failed to build router");
        Self { router, state, dir }
    }

    pub fn orders_csv(&self) -> PathBuf {
        self.state.config.orders_csv_path.clone()
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get_json(&self, uri: &str) -> (axum::http::StatusCode, Value) {
        let response = self.request(Method::GET, uri, None).await;
        let status = response.status();
        (status, body_json(response).await)
    }
}

pub fn write_csv(path: &Path, rows: &[&str]) {
    let mut contents = String::from(HEADER);
    contents.push('\n');
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    std::fs::write(path, contents).expect("failed to write csv fixture");
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("body is not utf-8")
}

/// Four days of steadily growing Biryani sales plus a two-day Lassi history.
pub fn demo_history() -> Vec<&'static str> {
    vec![
        "1,2024-01-01 12:00:00,Biryani,Mains,2,5.00,10.00",
        "2,2024-01-02 12:30:00,Biryani,Mains,4,5.00,20.00",
        "3,2024-01-03 19:00:00,Biryani,Mains,6,5.00,30.00",
        "4,2024-01-04 19:15:00,Biryani,Mains,8,5.00,40.00",
        "5,2024-01-03 19:40:00,Lassi,Drinks,1,2.00,2.00",
        "6,2024-01-04 08:05:00,Lassi,Drinks,2,2.00,4.00",
    ]
}
