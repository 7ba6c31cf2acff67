//! Forecasting core.
//!
//! Everything under this module is synchronous and pure: it takes a snapshot
//! of [`OrderRecord`](crate::models::OrderRecord)s and never touches storage.

pub mod aggregate;
pub mod forecasting;
pub mod normalize;
pub mod regression;

pub use forecasting::{
    predict_item_demand, predict_peak_hour, predict_tomorrow, sales_trend, ForecastMethod,
    ItemDemandForecast, ItemDemandReport, PeakHourForecast, SalesTrend, TomorrowForecast,
    TrendDirection, MIN_REGRESSION_POINTS,
};
pub use regression::LinearTrend;
