//! Short-horizon forecasts over order history.
//!
//! Each forecast is a pure function of the record set it is given: records are
//! normalized, aggregated, and, when enough distinct dates exist, fitted with
//! a least-squares trend over ordinal day numbers. Smaller samples fall back to
//! the last observed value or the sample mean. None of these functions fail;
//! missing data is reported through the `method`/`trend` fields instead.

use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::ml::{
    aggregate::{self, DailyPoint},
    normalize, regression,
};
use crate::models::OrderRecord;

/// Minimum number of distinct dates before a trend line is fitted.
pub const MIN_REGRESSION_POINTS: usize = 3;

/// Absorbs float error from fitting on ordinal day numbers (~7e5), so an
/// exact line still lands on its integer. Not rounding: predictions closer
/// than this to an integer are taken as that integer before truncation.
const INTEGER_SNAP_TOLERANCE: f64 = 1e-6;

/// How a forecast value was produced.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ForecastMethod {
    NoData,
    FallbackLastValue,
    FallbackAverage,
    /// Least-squares trend. The wire name predates the Rust service and is
    /// kept for existing dashboards.
    #[serde(rename = "numpy_regression")]
    #[strum(serialize = "numpy_regression")]
    LeastSquares,
    HourlyGrouping,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    NotEnoughData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TomorrowForecast {
    pub predicted_orders: i64,
    pub method: ForecastMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemDemandForecast {
    pub item: String,
    pub predictions: Vec<i64>,
    pub method: ForecastMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemDemandReport {
    pub results: Vec<ItemDemandForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PeakHourForecast {
    pub peak_hour: Option<u32>,
    pub estimate: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<ForecastMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalesTrend {
    pub trend: TrendDirection,
    pub slope: f64,
}

/// Total quantity expected on the day after the last observed date.
pub fn predict_tomorrow(records: &[OrderRecord]) -> TomorrowForecast {
    let orders = normalize::normalize(records);
    let daily = aggregate::daily_volume(&orders);

    let Some(last) = daily.last() else {
        debug!("predict_tomorrow: no dated records");
        return TomorrowForecast {
            predicted_orders: 0,
            method: ForecastMethod::NoData,
        };
    };

    if daily.len() < MIN_REGRESSION_POINTS {
        debug!(days = daily.len(), "predict_tomorrow: falling back to last value");
        return TomorrowForecast {
            predicted_orders: last.quantity.trunc() as i64,
            method: ForecastMethod::FallbackLastValue,
        };
    }

    let trend = regression::fit(&aggregate::regression_points(&daily));
    let tomorrow = (last.ordinal() + 1) as f64;
    TomorrowForecast {
        predicted_orders: clamp_prediction(trend.at(tomorrow)),
        method: ForecastMethod::LeastSquares,
    }
}

/// Per-item demand for each of the `n_days` days after that item's own last
/// observed date.
///
/// Items with fewer than [`MIN_REGRESSION_POINTS`] dates repeat the floor of
/// their mean daily quantity. `n_days == 0` gives empty prediction lists.
pub fn predict_item_demand(records: &[OrderRecord], n_days: usize) -> ItemDemandReport {
    let orders = normalize::normalize(records);
    let results = aggregate::item_daily_volume(&orders)
        .into_iter()
        .map(|item| forecast_item(item.item, &item.series, n_days))
        .collect();

    ItemDemandReport { results }
}

fn forecast_item(item: &str, series: &[DailyPoint], n_days: usize) -> ItemDemandForecast {
    let Some(last) = series.last().filter(|_| series.len() >= MIN_REGRESSION_POINTS) else {
        let average = if series.is_empty() {
            0
        } else {
            let total: f64 = series.iter().map(|point| point.quantity).sum();
            (total / series.len() as f64).floor() as i64
        };
        debug!(item, days = series.len(), average, "item demand: falling back to average");
        return ItemDemandForecast {
            item: item.to_string(),
            predictions: vec![average; n_days],
            method: ForecastMethod::FallbackAverage,
        };
    };

    let trend = regression::fit(&aggregate::regression_points(series));
    let last_ordinal = last.ordinal();
    let predictions = (1..=n_days as i64)
        .map(|offset| clamp_prediction(trend.at((last_ordinal + offset) as f64)))
        .collect();

    ItemDemandForecast {
        item: item.to_string(),
        predictions,
        method: ForecastMethod::LeastSquares,
    }
}

/// Hour of day with the largest total quantity; ties go to the earliest hour.
pub fn predict_peak_hour(records: &[OrderRecord]) -> PeakHourForecast {
    let orders = normalize::normalize(records);
    let hourly = aggregate::hourly_volume(&orders);

    // Points arrive in ascending hour order, so a strict comparison keeps the
    // lowest hour among equal maxima.
    let peak = hourly.iter().fold(None, |best: Option<&aggregate::HourlyPoint>, point| {
        match best {
            Some(current) if point.quantity <= current.quantity => Some(current),
            _ => Some(point),
        }
    });

    match peak {
        Some(point) => PeakHourForecast {
            peak_hour: Some(point.hour),
            estimate: point.quantity.trunc() as i64,
            method: Some(ForecastMethod::HourlyGrouping),
        },
        None => PeakHourForecast {
            peak_hour: None,
            estimate: 0,
            method: None,
        },
    }
}

/// Direction of the daily volume trend, with the raw fitted slope.
pub fn sales_trend(records: &[OrderRecord]) -> SalesTrend {
    let orders = normalize::normalize(records);
    let daily = aggregate::daily_volume(&orders);

    if daily.len() < MIN_REGRESSION_POINTS {
        return SalesTrend {
            trend: TrendDirection::NotEnoughData,
            slope: 0.0,
        };
    }

    let slope = regression::fit(&aggregate::regression_points(&daily)).slope;
    let trend = if slope > 0.0 {
        TrendDirection::Increasing
    } else if slope < 0.0 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    SalesTrend { trend, slope }
}

/// Non-negative whole count from a fitted value.
fn clamp_prediction(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let nearest = value.round();
    let value = if (value - nearest).abs() <= INTEGER_SNAP_TOLERANCE {
        nearest
    } else {
        value
    };
    value.trunc().max(0.0) as i64
}
