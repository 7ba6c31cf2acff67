use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    config::DataMode,
    errors::ServiceError,
    models::{NewOrder, OrderRecord},
    store::{CsvOrderStore, OrderSink},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStatus {
    Success,
    DemoMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AddOrderResponse {
    pub status: IntakeStatus,
    pub saved: bool,
}

/// Append-only order intake and export of the live order file
#[derive(Clone)]
pub struct OrderService {
    store: CsvOrderStore,
    mode: DataMode,
}

impl OrderService {
    pub fn new(store: CsvOrderStore, mode: DataMode) -> Self {
        Self { store, mode }
    }

    /// Validates and records one order. Demo mode validates but never writes.
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    pub async fn add_order(&self, order: NewOrder) -> Result<AddOrderResponse, ServiceError> {
        order.validate()?;

        if self.mode == DataMode::Demo {
            info!("demo mode; order not persisted");
            return Ok(AddOrderResponse {
                status: IntakeStatus::DemoMode,
                saved: false,
            });
        }

        self.store.append(&OrderRecord::from(order)).await?;
        Ok(AddOrderResponse {
            status: IntakeStatus::Success,
            saved: true,
        })
    }

    pub async fn export_csv(&self) -> Result<Vec<u8>, ServiceError> {
        let bytes = self.store.export().await?;
        info!(bytes = bytes.len(), "exported order file");
        Ok(bytes)
    }

    pub fn orders_file_present(&self) -> bool {
        self.store.exists()
    }
}
