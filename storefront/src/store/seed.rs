// storefront/src/store/seed.rs

//! Sample catalog for local runs (`SEED_DB=true`).

use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use super::{Collection, StoreResult};
use crate::models::Product;

fn sample_products() -> Vec<Product> {
  let entries: [(&str, i64, u32, Value); 4] = [
    ("Wireless Headphones", 5999, 2, json!("Over-ear, 30h battery")),
    ("Mechanical Keyboard", 8950, 2, json!("Hot-swappable switches")),
    ("USB-C Cable", 999, 2, json!("2m braided")),
    ("Desk Lamp", 2500, 2, json!("Dimmable LED")),
  ];
  entries
    .into_iter()
    .map(|(name, minor_units, scale, description)| {
      let mut attributes = Map::new();
      attributes.insert("description".to_string(), description);
      Product {
        name: name.to_string(),
        price: Decimal::new(minor_units, scale),
        attributes,
      }
    })
    .collect()
}

/// Inserts the sample catalog when the products collection is empty.
/// Returns how many products were inserted.
pub async fn seed_products(products: &dyn Collection<Product>) -> StoreResult<usize> {
  if !products.find_all().await?.is_empty() {
    tracing::info!("Products collection already populated; skipping seed.");
    return Ok(0);
  }
  let mut inserted = 0;
  for product in sample_products() {
    products.insert_one(product).await?;
    inserted += 1;
  }
  tracing::info!(inserted, "Seeded products collection.");
  Ok(inserted)
}
