// storefront/src/services/orders.rs

use std::sync::Arc;

use crate::errors::Result;
use crate::models::Order;
use crate::store::{Collection, Stored};

/// Append-only record of placed orders.
#[derive(Clone)]
pub struct OrderBook {
  orders: Arc<dyn Collection<Order>>,
}

impl OrderBook {
  pub fn new(orders: Arc<dyn Collection<Order>>) -> Self {
    Self { orders }
  }

  pub async fn record(&self, order: Order) -> Result<Stored<Order>> {
    Ok(self.orders.insert_one(order).await?)
  }
}
