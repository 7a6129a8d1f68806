// storefront/src/models/cart_item.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Product;

/// Name of the field line items are looked up by.
pub const PRODUCT_ID_FIELD: &str = "productId";

/// One product/quantity pairing in the shared cart.
///
/// `name` and `price` are copied from the product when it is first added and
/// are never refreshed: the price is locked at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
  pub product_id: Uuid,
  pub name: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub quantity: i64,
}

impl CartLineItem {
  pub fn from_product(product_id: Uuid, product: &Product, quantity: i64) -> Self {
    Self {
      product_id,
      name: product.name.clone(),
      price: product.price,
      quantity,
    }
  }

  /// `price × quantity`, or `None` when it does not fit in a `Decimal`.
  pub fn subtotal(&self) -> Option<Decimal> {
    self.price.checked_mul(Decimal::from(self.quantity))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(price: &str, quantity: i64) -> CartLineItem {
    CartLineItem {
      product_id: Uuid::new_v4(),
      name: "thing".to_string(),
      price: price.parse().unwrap(),
      quantity,
    }
  }

  #[test]
  fn subtotal_multiplies_exactly() {
    assert_eq!(item("19.99", 3).subtotal(), Some("59.97".parse().unwrap()));
  }

  #[test]
  fn subtotal_out_of_range_is_none() {
    assert_eq!(item("20000000000", i64::MAX).subtotal(), None);
  }
}
