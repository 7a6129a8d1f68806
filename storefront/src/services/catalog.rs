// storefront/src/services/catalog.rs

use std::sync::Arc;
use tracing::{instrument, warn};

use crate::errors::{AppError, Result};
use crate::models::Product;
use crate::store::{parse_id, Collection, Stored};

/// Read-only product lookups.
#[derive(Clone)]
pub struct Catalog {
  products: Arc<dyn Collection<Product>>,
}

impl Catalog {
  pub fn new(products: Arc<dyn Collection<Product>>) -> Self {
    Self { products }
  }

  #[instrument(name = "catalog::list_products", skip(self))]
  pub async fn list_products(&self) -> Result<Vec<Stored<Product>>> {
    Ok(self.products.find_all().await?)
  }

  /// A malformed identifier is reported the same way as a missing product.
  #[instrument(name = "catalog::get_product", skip(self))]
  pub async fn get_product(&self, raw_id: &str) -> Result<Stored<Product>> {
    let Some(id) = parse_id(raw_id) else {
      warn!("Malformed product identifier.");
      return Err(AppError::product_not_found());
    };
    self
      .products
      .find_by_id(id)
      .await?
      .ok_or_else(AppError::product_not_found)
  }
}
