pub mod analytics;
pub mod forecasting;
pub mod orders;
