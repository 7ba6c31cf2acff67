use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::{
    errors::ServiceError,
    ml::normalize::{self, coerce_quantity},
    models::OrderRecord,
    store::OrderSource,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemQuantity {
    pub item: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HourlyOrderCount {
    pub hour: u32,
    pub order_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeekSplit {
    pub weekday_orders: u64,
    pub weekend_orders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryQuantity {
    pub category: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyRevenue {
    /// Calendar date, `YYYY-MM-DD`
    #[schema(value_type = String, example = "2024-03-01")]
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_amount: Decimal,
}

/// Quantity per item, largest first, at most `limit` rows.
///
/// Rows are counted whether or not their timestamp parses.
pub fn top_items(records: &[OrderRecord], limit: usize) -> Vec<ItemQuantity> {
    let mut totals: Vec<(&str, f64)> = sum_quantity_by(records, |r| &r.item).into_iter().collect();
    // Stable sort keeps ascending item names among equal totals.
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    totals
        .into_iter()
        .take(limit)
        .map(|(item, quantity)| ItemQuantity {
            item: item.to_string(),
            quantity: quantity.trunc() as i64,
        })
        .collect()
}

/// Number of rows per hour of day, ascending by hour.
pub fn peak_hours(records: &[OrderRecord]) -> Vec<HourlyOrderCount> {
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for order in normalize::normalize(records) {
        *counts.entry(order.hour()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(hour, order_count)| HourlyOrderCount { hour, order_count })
        .collect()
}

pub fn weekend_vs_weekday(records: &[OrderRecord]) -> WeekSplit {
    normalize::normalize(records)
        .iter()
        .fold(WeekSplit::default(), |mut split, order| {
            match order.date().weekday() {
                Weekday::Sat | Weekday::Sun => split.weekend_orders += 1,
                _ => split.weekday_orders += 1,
            }
            split
        })
}

/// Quantity per category, ascending by category.
pub fn category_sales(records: &[OrderRecord]) -> Vec<CategoryQuantity> {
    sum_quantity_by(records, |r| &r.category)
        .into_iter()
        .map(|(category, quantity)| CategoryQuantity {
            category: category.to_string(),
            quantity: quantity.trunc() as i64,
        })
        .collect()
}

/// Revenue per calendar date, ascending by date.
pub fn revenue_per_day(records: &[OrderRecord]) -> Vec<DailyRevenue> {
    let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for order in normalize::normalize(records) {
        *totals.entry(order.date()).or_default() += order.total_amount;
    }
    totals
        .into_iter()
        .map(|(date, total_amount)| DailyRevenue { date, total_amount })
        .collect()
}

fn sum_quantity_by<'a, F>(records: &'a [OrderRecord], key: F) -> BTreeMap<&'a str, f64>
where
    F: Fn(&'a OrderRecord) -> &'a String,
{
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(key(record).as_str()).or_insert(0.0) += coerce_quantity(&record.quantity);
    }
    totals
}

/// Grouping reports over the configured order history
#[derive(Clone)]
pub struct AnalyticsService {
    source: Arc<dyn OrderSource>,
}

impl AnalyticsService {
    pub fn new(source: Arc<dyn OrderSource>) -> Self {
        Self { source }
    }

    async fn snapshot(&self) -> Result<Vec<OrderRecord>, ServiceError> {
        let records = self.source.load().await?;
        debug!(rows = records.len(), "analytics snapshot");
        Ok(records)
    }

    pub async fn top_items(&self, limit: usize) -> Result<Vec<ItemQuantity>, ServiceError> {
        info!(limit, "Generating top items report");
        Ok(top_items(&self.snapshot().await?, limit))
    }

    pub async fn peak_hours(&self) -> Result<Vec<HourlyOrderCount>, ServiceError> {
        info!("Generating peak hours report");
        Ok(peak_hours(&self.snapshot().await?))
    }

    pub async fn weekend_vs_weekday(&self) -> Result<WeekSplit, ServiceError> {
        info!("Generating weekend vs weekday report");
        Ok(weekend_vs_weekday(&self.snapshot().await?))
    }

    pub async fn category_sales(&self) -> Result<Vec<CategoryQuantity>, ServiceError> {
        info!("Generating category sales report");
        Ok(category_sales(&self.snapshot().await?))
    }

    pub async fn revenue_per_day(&self) -> Result<Vec<DailyRevenue>, ServiceError> {
        info!("Generating revenue per day report");
        Ok(revenue_per_day(&self.snapshot().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(timestamp: &str, item: &str, category: &str, quantity: &str, total: &str) -> OrderRecord {
        OrderRecord {
            order_id: "x".into(),
            timestamp: Some(timestamp.into()),
            item: item.into(),
            category: category.into(),
            quantity: quantity.into(),
            price_per_item: "0".into(),
            total_amount: total.into(),
        }
    }

    fn fixture() -> Vec<OrderRecord> {
        vec![
            // 2024-03-01 is a Friday, 2024-03-02 a Saturday
            row("2024-03-01 12:10:00", "Dosa", "Mains", "2", "8.00"),
            row("2024-03-01 12:50:00", "Chai", "Drinks", "3", "3.00"),
            row("2024-03-02 19:00:00", "Dosa", "Mains", "1", "4.00"),
            row("2024-03-02 19:30:00", "Lassi", "Drinks", "2", "5.50"),
            row("bad timestamp", "Chai", "Drinks", "2", "2.00"),
        ]
    }

    #[test]
    fn top_items_counts_every_row_and_orders_descending() {
        let top = top_items(&fixture(), 10);
        assert_eq!(
            top,
            vec![
                ItemQuantity { item: "Chai".into(), quantity: 5 },
                ItemQuantity { item: "Dosa".into(), quantity: 3 },
                ItemQuantity { item: "Lassi".into(), quantity: 2 },
            ]
        );
        assert_eq!(top_items(&fixture(), 1).len(), 1);
    }

    #[test]
    fn top_items_ties_keep_name_order() {
        let records = vec![
            row("2024-03-01 12:00:00", "Vada", "Snacks", "2", "0"),
            row("2024-03-01 12:00:00", "Idli", "Snacks", "2", "0"),
        ];
        let top = top_items(&records, 5);
        assert_eq!(top[0].item, "Idli");
        assert_eq!(top[1].item, "Vada");
    }

    #[test]
    fn peak_hours_counts_rows_with_valid_timestamps() {
        assert_eq!(
            peak_hours(&fixture()),
            vec![
                HourlyOrderCount { hour: 12, order_count: 2 },
                HourlyOrderCount { hour: 19, order_count: 2 },
            ]
        );
    }

    #[test]
    fn weekend_split() {
        assert_eq!(
            weekend_vs_weekday(&fixture()),
            WeekSplit { weekday_orders: 2, weekend_orders: 2 }
        );
    }

    #[test]
    fn category_sales_sorted_by_category() {
        assert_eq!(
            category_sales(&fixture()),
            vec![
                CategoryQuantity { category: "Drinks".into(), quantity: 7 },
                CategoryQuantity { category: "Mains".into(), quantity: 3 },
            ]
        );
    }

    #[test]
    fn revenue_per_day_sums_amounts() {
        let revenue = revenue_per_day(&fixture());
        assert_eq!(revenue.len(), 2);
        assert_eq!(revenue[0].total_amount, dec!(11.00));
        assert_eq!(revenue[1].total_amount, dec!(9.50));

        let json = serde_json::to_value(&revenue[1]).unwrap();
        assert_eq!(json, serde_json::json!({"date": "2024-03-02", "total_amount": 9.5}));
    }

    #[test]
    fn empty_snapshot_gives_empty_reports() {
        assert!(top_items(&[], 10).is_empty());
        assert!(peak_hours(&[]).is_empty());
        assert_eq!(weekend_vs_weekday(&[]), WeekSplit::default());
        assert!(category_sales(&[]).is_empty());
        assert!(revenue_per_day(&[]).is_empty());
    }

    #[tokio::test]
    async fn service_reads_from_its_source() {
        let service = AnalyticsService::new(Arc::new(fixture()));
        assert_eq!(service.top_items(2).await.unwrap().len(), 2);
        assert_eq!(service.peak_hours().await.unwrap().len(), 2);
    }
}
