use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    config::DataMode,
    errors::ServiceError,
    ml::{self, ItemDemandReport, PeakHourForecast, SalesTrend, TomorrowForecast},
    models::OrderRecord,
    store::OrderSource,
};

/// Runs the forecasting core over a snapshot taken from the demo or the
/// production order history.
#[derive(Clone)]
pub struct ForecastingService {
    demo: Arc<dyn OrderSource>,
    production: Arc<dyn OrderSource>,
    default_mode: DataMode,
}

impl ForecastingService {
    pub fn new(
        demo: Arc<dyn OrderSource>,
        production: Arc<dyn OrderSource>,
        default_mode: DataMode,
    ) -> Self {
        Self {
            demo,
            production,
            default_mode,
        }
    }

    /// An explicit `demo`/`production` wins; anything else means the
    /// configured mode.
    pub fn resolve_mode(&self, requested: Option<&str>) -> DataMode {
        requested
            .and_then(|raw| raw.trim().parse::<DataMode>().ok())
            .unwrap_or(self.default_mode)
    }

    async fn snapshot(&self, mode: DataMode) -> Result<Vec<OrderRecord>, ServiceError> {
        let source = match mode {
            DataMode::Demo => &self.demo,
            DataMode::Production => &self.production,
        };
        let records = source.load().await?;
        debug!(%mode, rows = records.len(), "forecast snapshot");
        Ok(records)
    }

    pub async fn predict_tomorrow(&self, mode: DataMode) -> Result<TomorrowForecast, ServiceError> {
        let forecast = ml::predict_tomorrow(&self.snapshot(mode).await?);
        info!(%mode, predicted = forecast.predicted_orders, method = %forecast.method, "predicted tomorrow");
        Ok(forecast)
    }

    pub async fn predict_item_demand(
        &self,
        mode: DataMode,
        n_days: usize,
    ) -> Result<ItemDemandReport, ServiceError> {
        let report = ml::predict_item_demand(&self.snapshot(mode).await?, n_days);
        info!(%mode, n_days, items = report.results.len(), "predicted item demand");
        Ok(report)
    }

    pub async fn predict_peak_hour(&self, mode: DataMode) -> Result<PeakHourForecast, ServiceError> {
        let forecast = ml::predict_peak_hour(&self.snapshot(mode).await?);
        info!(%mode, peak_hour = ?forecast.peak_hour, "predicted peak hour");
        Ok(forecast)
    }

    pub async fn sales_trend(&self, mode: DataMode) -> Result<SalesTrend, ServiceError> {
        let trend = ml::sales_trend(&self.snapshot(mode).await?);
        info!(%mode, trend = %trend.trend, slope = trend.slope, "computed sales trend");
        Ok(trend)
    }
}
