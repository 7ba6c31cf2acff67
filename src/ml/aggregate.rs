//! Daily, per-item daily and hour-of-day aggregation of normalized orders.
//!
//! All three aggregations sum `quantity` per group and are independent of the
//! order in which records arrive. Empty input gives empty output.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::ml::normalize::TimedOrder;

/// Total quantity ordered on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub quantity: f64,
}

impl DailyPoint {
    /// Regression abscissa for this point.
    pub fn ordinal(&self) -> i64 {
        ordinal_day(self.date)
    }
}

/// Daily series for a single item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSeries<'a> {
    pub item: &'a str,
    pub series: Vec<DailyPoint>,
}

/// Total quantity ordered within one hour of the day, across all dates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyPoint {
    pub hour: u32,
    pub quantity: f64,
}

/// Days since the proleptic Gregorian epoch; 0001-01-01 is day 1.
pub fn ordinal_day(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// One point per distinct date, ascending by date.
pub fn daily_volume(orders: &[TimedOrder<'_>]) -> Vec<DailyPoint> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for order in orders {
        *by_date.entry(order.date()).or_default() += order.quantity;
    }
    into_series(by_date)
}

/// One daily series per distinct item, items in ascending name order.
pub fn item_daily_volume<'a>(orders: &[TimedOrder<'a>]) -> Vec<ItemSeries<'a>> {
    let mut by_item: BTreeMap<&'a str, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for order in orders {
        *by_item
            .entry(order.item)
            .or_default()
            .entry(order.date())
            .or_default() += order.quantity;
    }

    by_item
        .into_iter()
        .map(|(item, by_date)| ItemSeries {
            item,
            series: into_series(by_date),
        })
        .collect()
}

/// One point per hour that has orders, ascending by hour.
pub fn hourly_volume(orders: &[TimedOrder<'_>]) -> Vec<HourlyPoint> {
    let mut by_hour: BTreeMap<u32, f64> = BTreeMap::new();
    for order in orders {
        *by_hour.entry(order.hour()).or_default() += order.quantity;
    }
    by_hour
        .into_iter()
        .map(|(hour, quantity)| HourlyPoint { hour, quantity })
        .collect()
}

/// `(ordinal_day, quantity)` pairs ready for the trend estimator.
pub fn regression_points(series: &[DailyPoint]) -> Vec<(f64, f64)> {
    series
        .iter()
        .map(|point| (point.ordinal() as f64, point.quantity))
        .collect()
}

fn into_series(by_date: BTreeMap<NaiveDate, f64>) -> Vec<DailyPoint> {
    by_date
        .into_iter()
        .map(|(date, quantity)| DailyPoint { date, quantity })
        .collect()
}
