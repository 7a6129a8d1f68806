// storefront/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines;
use crate::services::{Catalog, CartStore, OrderBook};
use crate::store::Collections;
use conveyor::Conveyor;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub catalog: Catalog,
  pub cart: CartStore,
  pub orders: OrderBook,
  pub conveyor: Arc<Conveyor<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires the services over `collections` and registers every pipeline.
  pub fn new(collections: Collections, config: Arc<AppConfig>) -> Self {
    let conveyor = Arc::new(Conveyor::<AppError>::new());
    pipelines::register_all_pipelines(&conveyor);

    Self {
      catalog: Catalog::new(collections.products),
      cart: CartStore::new(collections.cart),
      orders: OrderBook::new(collections.orders),
      conveyor,
      config,
    }
  }
}
