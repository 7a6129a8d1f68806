// storefront/src/pipelines/checkout_pipeline.rs

use crate::errors::{AppError, Result};
use crate::models::Order;
use crate::pipelines::contexts::{CheckoutCtxData, CheckoutPhase};
use crate::state::AppState;
use crate::store::Stored;
use chrono::Utc;
use conveyor::{ContextData, Conveyor, Pipeline, PipelineControl, PipelineResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

pub fn register_checkout_pipeline(conveyor: &Arc<Conveyor<AppError>>) {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&[
    ("validate_checkout_input", false, None),
    ("snapshot_cart", false, None),
    ("compute_total", false, None),
    ("persist_order", false, None),
    ("clear_billed_items", false, None),
    ("release_cart_gate", false, None),
  ]);

  // Step 1: userInfo is required and may not be null
  p.on_root("validate_checkout_input", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      guard.phase = CheckoutPhase::Validating;
      if matches!(guard.user_info, None | Some(Value::Null)) {
        warn!("Checkout Pipeline: Rejected, no user information supplied.");
        return Err(AppError::Validation("User information is required for checkout.".to_string()));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 2: take the cart gate, then read everything that will be billed
  p.before_root("snapshot_cart", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let cart = ctx_data.read().app_state.cart.clone();
      let gate = cart.lock().await;
      ctx_data.write().cart_guard = Some(gate);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("snapshot_cart", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let cart = ctx_data.read().app_state.cart.clone();
      let snapshot = cart.list_cart().await?;
      if snapshot.is_empty() {
        warn!("Checkout Pipeline: Cart is empty, nothing to bill.");
        return Err(AppError::EmptyCart("Cart is empty. Add items before checkout.".to_string()));
      }
      info!("Checkout Pipeline: Snapshot taken, {} line item(s).", snapshot.len());
      ctx_data.write().snapshot = snapshot;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3
  p.on_root("compute_total", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      guard.phase = CheckoutPhase::Computing;
      let Some(total) = Order::total_of(&guard.snapshot) else {
        warn!("Checkout Pipeline: Cart total is out of range.");
        return Err(AppError::Validation("Order total is too large.".to_string()));
      };
      guard.total_amount = total;
      info!("Checkout Pipeline: Total computed: {}", guard.total_amount);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 4
  p.on_root("persist_order", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (order_book, order) = {
        let mut guard = ctx_data.write();
        guard.phase = CheckoutPhase::Persisting;
        let order = Order {
          user_info: guard.user_info.clone().unwrap_or(Value::Null),
          items: guard.snapshot.clone(),
          total_amount: guard.total_amount,
          created_at: Utc::now(),
        };
        (guard.app_state.orders.clone(), order)
      };

      let placed = order_book.record(order).await?;
      info!(
        "Checkout Pipeline (Order {}): Order persisted. Total: {}",
        placed.id, placed.doc.total_amount
      );
      ctx_data.write().placed_order = Some(placed);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 5: only the snapshot's ids, so lines added afterwards stay in the cart
  p.on_root("clear_billed_items", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (cart, billed_ids, order_id) = {
        let mut guard = ctx_data.write();
        guard.phase = CheckoutPhase::Clearing;
        let ids: Vec<Uuid> = guard.snapshot.iter().map(|line| line.id).collect();
        (guard.app_state.cart.clone(), ids, guard.placed_order.as_ref().map(|o| o.id))
      };

      let cleared = match cart.remove_lines(&billed_ids).await {
        Ok(cleared) => cleared,
        Err(e) => {
          error!(
            order_id = ?order_id,
            "Checkout Pipeline: Order was persisted but the billed cart items could not be cleared: {}",
            e
          );
          return Err(e);
        }
      };

      if cleared != billed_ids.len() as u64 {
        warn!(
          "Checkout Pipeline (Order {:?}): Cleared {} of {} billed line item(s).",
          order_id,
          cleared,
          billed_ids.len()
        );
      }
      ctx_data.write().cleared_count = cleared;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 6
  p.on_root("release_cart_gate", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      guard.cart_guard = None;
      guard.phase = CheckoutPhase::Done;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  conveyor.register_pipeline(p);
  info!("Checkout pipeline registered.");
}

/// Bills the whole cart into a new order and clears the billed line items.
///
/// On failure nothing is rolled back: an order persisted before a failed
/// clear stays persisted.
#[instrument(name = "pipeline::checkout", skip_all)]
pub async fn place_order(app_state: &AppState, user_info: Option<Value>) -> Result<Stored<Order>> {
  let ctx_data = ContextData::new(CheckoutCtxData::new(app_state.clone(), user_info));
  run_checkout(app_state, &ctx_data).await
}

/// Runs the checkout pipeline over a caller-built context. Afterwards the
/// context's `phase` is `Done` on success and back at `Idle` on any failure.
pub async fn run_checkout(app_state: &AppState, ctx_data: &ContextData<CheckoutCtxData>) -> Result<Stored<Order>> {
  let result = app_state.conveyor.run(ctx_data.clone()).await;

  let mut guard = ctx_data.write();
  guard.cart_guard = None;
  let failed_in = guard.phase;

  let outcome = match result {
    Ok(PipelineResult::Completed) => match guard.placed_order.clone() {
      Some(order) => {
        info!(
          "Checkout (Order {}): placed, {} billed line item(s) cleared.",
          order.id, guard.cleared_count
        );
        return Ok(order);
      }
      None => AppError::Internal("Checkout completed, but the order is unavailable.".to_string()),
    },
    Ok(PipelineResult::Stopped) => {
      warn!(phase = ?failed_in, "Checkout pipeline was stopped by a handler.");
      AppError::Internal("Checkout process was halted.".to_string())
    }
    Err(e) => e,
  };

  warn!(phase = ?failed_in, "Checkout failed, returning to idle: {}", outcome);
  guard.phase = CheckoutPhase::Idle;
  Err(outcome)
}
