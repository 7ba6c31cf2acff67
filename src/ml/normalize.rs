//! Timestamp normalization and numeric coercion.
//!
//! Raw [`OrderRecord`]s are turned into [`TimedOrder`]s: records whose
//! timestamp is missing or unparseable are dropped, and non-numeric quantity
//! or amount cells degrade to zero instead of failing the whole snapshot.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::OrderRecord;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// A record with a valid timestamp and coerced numeric fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedOrder<'a> {
    pub timestamp: NaiveDateTime,
    pub item: &'a str,
    pub category: &'a str,
    pub quantity: f64,
    pub total_amount: Decimal,
}

impl TimedOrder<'_> {
    /// Calendar date of the order, taken as written (no timezone conversion).
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}

/// Parses a timestamp cell into a naive local date-time.
///
/// Offsets are accepted (RFC 3339) but discarded: the wall-clock time as
/// written is kept. A bare date means midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Quantity cell as a number; blanks, garbage and non-finite values become 0.
pub fn coerce_quantity(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Money cell as a decimal; anything unparseable becomes 0.
pub fn coerce_amount(raw: &str) -> Decimal {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .unwrap_or(Decimal::ZERO)
}

/// Keeps only records with a parseable timestamp.
///
/// Input order is preserved. A record set without a timestamp column at all
/// normalizes to an empty set.
pub fn normalize(records: &[OrderRecord]) -> Vec<TimedOrder<'_>> {
    records
        .iter()
        .filter_map(|record| {
            let timestamp = record.timestamp.as_deref().and_then(parse_timestamp)?;
            Some(TimedOrder {
                timestamp,
                item: &record.item,
                category: &record.category,
                quantity: coerce_quantity(&record.quantity),
                total_amount: coerce_amount(&record.total_amount),
            })
        })
        .collect()
}
