// storefront/src/pipelines/cart_pipeline.rs

use crate::errors::{AppError, Result};
use crate::models::CartLineItem;
use crate::pipelines::contexts::{AddToCartCtxData, CartWrite};
use crate::state::AppState;
use conveyor::{ContextData, Conveyor, Pipeline, PipelineControl, PipelineResult, SkipCondition};
use std::sync::Arc;
use tracing::{info, instrument, warn};

fn skip_unless_line_exists() -> SkipCondition<AddToCartCtxData> {
  Arc::new(|ctx_data: ContextData<AddToCartCtxData>| ctx_data.read().existing_line.is_none())
}

fn skip_if_line_exists() -> SkipCondition<AddToCartCtxData> {
  Arc::new(|ctx_data: ContextData<AddToCartCtxData>| ctx_data.read().existing_line.is_some())
}

/// A line whose subtotal cannot be represented would make checkout unpayable.
fn ensure_priceable(line: &CartLineItem) -> Result<()> {
  if line.subtotal().is_none() {
    warn!(
      "Add to Cart Pipeline: Subtotal out of range for price {} x quantity {}.",
      line.price, line.quantity
    );
    return Err(AppError::Validation("Resulting quantity is too large.".to_string()));
  }
  Ok(())
}

pub fn register_add_to_cart_pipeline(conveyor: &Arc<Conveyor<AppError>>) {
  let mut p = Pipeline::<AddToCartCtxData, AppError>::new(&[
    ("validate_cart_input", false, None),
    ("fetch_product_for_cart", false, None),
    ("find_existing_line_item", false, None),
    ("merge_into_existing_line_item", false, Some(skip_unless_line_exists())),
    ("insert_new_line_item", false, Some(skip_if_line_exists())),
    ("release_cart_gate", false, None),
  ]);

  // Step 1: quantity must be a positive integer
  p.on_root("validate_cart_input", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let quantity = ctx_data.read().quantity;
      if quantity <= 0 {
        warn!("Add to Cart Pipeline: Invalid quantity ({}). Must be positive.", quantity);
        return Err(AppError::Validation("Quantity must be a positive integer.".to_string()));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 2: the product must exist; nothing is written otherwise
  p.on_root("fetch_product_for_cart", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (catalog, raw_product_id) = {
        let guard = ctx_data.read();
        (guard.app_state.catalog.clone(), guard.product_id.clone())
      };

      let product = catalog.get_product(&raw_product_id).await?;
      info!(
        "Add to Cart Pipeline: Product {} found. Price: {}",
        product.id, product.doc.price
      );
      ctx_data.write().product = Some(product);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3: lookup under the cart gate, which stays held until the last step
  p.before_root("find_existing_line_item", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let cart = ctx_data.read().app_state.cart.clone();
      let gate = cart.lock().await;
      ctx_data.write().cart_guard = Some(gate);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("find_existing_line_item", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (cart, product_id) = {
        let guard = ctx_data.read();
        (guard.app_state.cart.clone(), guard.product.as_ref().map(|p| p.id))
      };
      let product_id = product_id.ok_or_else(|| AppError::Internal("Product was not resolved before cart lookup.".to_string()))?;

      let existing = cart.find_line_for_product(product_id).await?;
      if let Some(line) = &existing {
        info!(
          "Add to Cart Pipeline: Product {} already in cart as line {} (quantity {}).",
          product_id, line.id, line.doc.quantity
        );
      }
      ctx_data.write().existing_line = existing;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 4: merge into the existing line
  p.on_root("merge_into_existing_line_item", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (cart, existing, requested) = {
        let guard = ctx_data.read();
        (guard.app_state.cart.clone(), guard.existing_line.clone(), guard.quantity)
      };
      let existing = existing.ok_or_else(|| AppError::Internal("No existing line item to merge into.".to_string()))?;

      let new_quantity = existing
        .doc
        .quantity
        .checked_add(requested)
        .ok_or_else(|| AppError::Validation("Resulting quantity is too large.".to_string()))?;
      let merged = CartLineItem {
        quantity: new_quantity,
        ..existing.doc.clone()
      };
      ensure_priceable(&merged)?;

      let updated = cart.set_quantity(existing, new_quantity).await?;
      info!(
        "Add to Cart Pipeline: Line {} quantity updated to {}.",
        updated.id, updated.doc.quantity
      );
      ctx_data.write().outcome = Some(CartWrite::Updated(updated));
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 5: or insert a new one, locking in the current name and price
  p.on_root("insert_new_line_item", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (cart, product, quantity) = {
        let guard = ctx_data.read();
        (guard.app_state.cart.clone(), guard.product.clone(), guard.quantity)
      };
      let product = product.ok_or_else(|| AppError::Internal("Product was not resolved before insert.".to_string()))?;

      let line = CartLineItem::from_product(product.id, &product.doc, quantity);
      ensure_priceable(&line)?;
      let created = cart.insert_line(line).await?;
      info!(
        "Add to Cart Pipeline: Line {} created for product {} (quantity {}).",
        created.id, product.id, quantity
      );
      ctx_data.write().outcome = Some(CartWrite::Created(created));
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 6
  p.on_root("release_cart_gate", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      ctx_data.write().cart_guard = None;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  conveyor.register_pipeline(p);
  info!("Add to Cart pipeline registered.");
}

/// Adds `quantity` of the product to the shared cart, merging with an
/// existing line for the same product.
#[instrument(name = "pipeline::add_to_cart", skip(app_state))]
pub async fn add_to_cart(app_state: &AppState, product_id: String, quantity: i64) -> Result<CartWrite> {
  let ctx_data = ContextData::new(AddToCartCtxData::new(app_state.clone(), product_id, quantity));

  let result = app_state.conveyor.run(ctx_data.clone()).await;
  let outcome = {
    let mut guard = ctx_data.write();
    guard.cart_guard = None;
    guard.outcome.take()
  };

  match result? {
    PipelineResult::Completed => {
      outcome.ok_or_else(|| AppError::Internal("Cart update completed, but item details are unavailable.".to_string()))
    }
    PipelineResult::Stopped => {
      warn!("Add to Cart pipeline was stopped by a handler.");
      Err(AppError::Internal("Process to add item to cart was halted.".to_string()))
    }
  }
}
