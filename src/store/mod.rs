//! Order history storage.
//!
//! The forecasting core only ever sees an in-memory snapshot; these traits are
//! the seam between it and wherever orders actually live.

mod csv_store;

pub use csv_store::CsvOrderStore;

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::models::OrderRecord;

/// Produces a full snapshot of the order history.
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Every readable record. A store that does not exist yet is empty, not an
    /// error.
    async fn load(&self) -> Result<Vec<OrderRecord>, ServiceError>;
}

/// Append-only destination for new orders.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn append(&self, record: &OrderRecord) -> Result<(), ServiceError>;
}

#[async_trait]
impl OrderSource for Vec<OrderRecord> {
    async fn load(&self) -> Result<Vec<OrderRecord>, ServiceError> {
        Ok(self.clone())
    }
}
