// storefront/src/pipelines/contexts.rs

//! Context data the pipelines run over. Handlers receive these wrapped in
//! `conveyor::ContextData`.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::models::{CartLineItem, Order, Product};
use crate::services::CartGuard;
use crate::state::AppState;
use crate::store::Stored;

/// What an add-to-cart run wrote.
#[derive(Debug, Clone, PartialEq)]
pub enum CartWrite {
  /// A new line item was inserted.
  Created(Stored<CartLineItem>),
  /// An existing line item's quantity was increased.
  Updated(Stored<CartLineItem>),
}

impl CartWrite {
  pub fn line_item(&self) -> &Stored<CartLineItem> {
    match self {
      CartWrite::Created(item) | CartWrite::Updated(item) => item,
    }
  }
}

pub struct AddToCartCtxData {
  pub app_state: AppState,
  /// As received; may not be a valid identifier.
  pub product_id: String,
  pub quantity: i64,
  pub product: Option<Stored<Product>>,
  pub existing_line: Option<Stored<CartLineItem>>,
  pub cart_guard: Option<CartGuard>,
  pub outcome: Option<CartWrite>,
}

impl AddToCartCtxData {
  pub fn new(app_state: AppState, product_id: String, quantity: i64) -> Self {
    Self {
      app_state,
      product_id,
      quantity,
      product: None,
      existing_line: None,
      cart_guard: None,
      outcome: None,
    }
  }
}

/// Where a checkout run currently is. A failure in any phase returns the
/// flow to `Idle` without undoing earlier phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
  Idle,
  Validating,
  Computing,
  Persisting,
  Clearing,
  Done,
}

pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub user_info: Option<Value>,
  pub phase: CheckoutPhase,
  pub snapshot: Vec<Stored<CartLineItem>>,
  pub total_amount: Decimal,
  pub placed_order: Option<Stored<Order>>,
  pub cleared_count: u64,
  pub cart_guard: Option<CartGuard>,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, user_info: Option<Value>) -> Self {
    Self {
      app_state,
      user_info,
      phase: CheckoutPhase::Idle,
      snapshot: Vec::new(),
      total_amount: Decimal::ZERO,
      placed_order: None,
      cleared_count: 0,
      cart_guard: None,
    }
  }
}
