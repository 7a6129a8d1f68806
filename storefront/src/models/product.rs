// storefront/src/models/product.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A catalog entry. Read-only to the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub name: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  /// Whatever else the catalog document carries (description, images, ...).
  #[serde(flatten, default)]
  pub attributes: Map<String, Value>,
}

impl Product {
  pub fn new(name: impl Into<String>, price: Decimal) -> Self {
    Self {
      name: name.into(),
      price,
      attributes: Map::new(),
    }
  }
}
