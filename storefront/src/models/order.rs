// storefront/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::CartLineItem;
use crate::store::Stored;

/// A placed order. Written once at checkout, never touched again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  /// Opaque caller payload, stored as received.
  pub user_info: Value,
  /// The cart snapshot that was billed, line item ids included.
  pub items: Vec<Stored<CartLineItem>>,
  #[serde(with = "rust_decimal::serde::float")]
  pub total_amount: Decimal,
  pub created_at: DateTime<Utc>,
}

impl Order {
  /// Sum of `price × quantity` over `items`; `None` if any product or the
  /// running sum leaves the `Decimal` range.
  pub fn total_of(items: &[Stored<CartLineItem>]) -> Option<Decimal> {
    items
      .iter()
      .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.doc.subtotal()?))
  }
}
