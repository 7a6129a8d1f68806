// storefront/src/services/cart.rs

use serde_json::json;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::cart_item::{CartLineItem, PRODUCT_ID_FIELD};
use crate::store::{parse_id, Collection, Stored};

/// Held while a multi-step cart mutation is in progress.
pub type CartGuard = OwnedMutexGuard<()>;

/// The one shared cart.
///
/// Every mutation sequence (merge-or-insert, snapshot-then-clear, remove) runs
/// while holding the cart's write gate, so within this process no two of
/// them interleave. Reads do not take the gate.
#[derive(Clone)]
pub struct CartStore {
  items: Arc<dyn Collection<CartLineItem>>,
  gate: Arc<Mutex<()>>,
}

impl CartStore {
  pub fn new(items: Arc<dyn Collection<CartLineItem>>) -> Self {
    Self {
      items,
      gate: Arc::new(Mutex::new(())),
    }
  }

  /// Waits for exclusive use of the cart.
  pub async fn lock(&self) -> CartGuard {
    self.gate.clone().lock_owned().await
  }

  #[instrument(name = "cart::list_cart", skip(self))]
  pub async fn list_cart(&self) -> Result<Vec<Stored<CartLineItem>>> {
    Ok(self.items.find_all().await?)
  }

  // The methods below expect the caller to hold `lock()`.

  pub async fn find_line_for_product(&self, product_id: Uuid) -> Result<Option<Stored<CartLineItem>>> {
    Ok(self.items.find_one_by(PRODUCT_ID_FIELD, &json!(product_id)).await?)
  }

  pub async fn set_quantity(&self, line: Stored<CartLineItem>, quantity: i64) -> Result<Stored<CartLineItem>> {
    let doc = CartLineItem { quantity, ..line.doc };
    if self.items.replace_one(line.id, doc.clone()).await? == 0 {
      warn!(line_item_id = %line.id, "Line item vanished before its quantity could be updated.");
      return Err(AppError::item_not_found());
    }
    Ok(Stored { id: line.id, doc })
  }

  pub async fn insert_line(&self, line: CartLineItem) -> Result<Stored<CartLineItem>> {
    Ok(self.items.insert_one(line).await?)
  }

  /// Deletes exactly `ids`; returns how many were deleted.
  pub async fn remove_lines(&self, ids: &[Uuid]) -> Result<u64> {
    Ok(self.items.delete_many(ids).await?)
  }

  /// Removes one line item. A malformed or unknown id is `NotFound`, also
  /// when the same id is removed twice.
  #[instrument(name = "cart::remove_from_cart", skip(self))]
  pub async fn remove_from_cart(&self, raw_id: &str) -> Result<()> {
    let Some(id) = parse_id(raw_id) else {
      warn!("Malformed cart line item identifier.");
      return Err(AppError::item_not_found());
    };
    let _gate = self.lock().await;
    if self.items.delete_one(id).await? == 0 {
      return Err(AppError::item_not_found());
    }
    info!(line_item_id = %id, "Line item removed from cart.");
    Ok(())
  }
}
