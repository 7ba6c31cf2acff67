pub mod order;

pub use order::{NewOrder, OrderRecord, ORDER_COLUMNS};
