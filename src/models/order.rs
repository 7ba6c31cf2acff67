use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Column order of the persisted order log.
pub const ORDER_COLUMNS: [&str; 7] = [
    "order_id",
    "timestamp",
    "item",
    "category",
    "quantity",
    "price_per_item",
    "total_amount",
];

/// One line item as read from the record store.
///
/// Every field is kept in its raw textual form. Rows written by older tools or
/// edited by hand may carry blank or non-numeric cells, and a store without a
/// `timestamp` column yields records whose `timestamp` is `None`. Coercion into
/// typed values happens in [`crate::ml::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderRecord {
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub price_per_item: String,
    #[serde(default)]
    pub total_amount: String,
}

impl OrderRecord {
    /// Builds a well-formed record; `total_amount` is `price_per_item * quantity`.
    pub fn new(
        order_id: impl Into<String>,
        timestamp: impl Into<String>,
        item: impl Into<String>,
        category: impl Into<String>,
        quantity: i64,
        price_per_item: Decimal,
    ) -> Self {
        let total_amount = price_per_item * Decimal::from(quantity);
        Self {
            order_id: order_id.into(),
            timestamp: Some(timestamp.into()),
            item: item.into(),
            category: category.into(),
            quantity: quantity.to_string(),
            price_per_item: price_per_item.to_string(),
            total_amount: total_amount.to_string(),
        }
    }

    /// Cells in [`ORDER_COLUMNS`] order.
    pub fn to_row(&self) -> [&str; 7] {
        [
            self.order_id.as_str(),
            self.timestamp.as_deref().unwrap_or_default(),
            self.item.as_str(),
            self.category.as_str(),
            self.quantity.as_str(),
            self.price_per_item.as_str(),
            self.total_amount.as_str(),
        ]
    }
}

/// Payload accepted by the order intake endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewOrder {
    #[validate(length(min = 1))]
    pub order_id: String,

    /// `YYYY-MM-DD HH:MM:SS`; any format the timestamp normalizer accepts.
    #[validate(custom = "validate_timestamp")]
    pub timestamp: String,

    #[validate(length(min = 1))]
    pub item: String,

    #[validate(length(min = 1))]
    pub category: String,

    #[validate(range(min = 0))]
    pub quantity: i64,

    #[validate(custom = "validate_non_negative_decimal")]
    pub price_per_item: Decimal,

    #[validate(custom = "validate_non_negative_decimal")]
    pub total_amount: Decimal,
}

impl From<NewOrder> for OrderRecord {
    fn from(order: NewOrder) -> Self {
        Self {
            order_id: order.order_id,
            timestamp: Some(order.timestamp),
            item: order.item,
            category: order.category,
            quantity: order.quantity.to_string(),
            price_per_item: order.price_per_item.to_string(),
            total_amount: order.total_amount.to_string(),
        }
    }
}

fn validate_timestamp(value: &str) -> Result<(), ValidationError> {
    if crate::ml::normalize::parse_timestamp(value).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("timestamp");
        err.message = Some("Timestamp must look like YYYY-MM-DD HH:MM:SS".into());
        Err(err)
    }
}

fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("Amount must not be negative".into());
        Err(err)
    } else {
        Ok(())
    }
}
