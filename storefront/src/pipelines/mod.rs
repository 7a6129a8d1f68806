// storefront/src/pipelines/mod.rs

//! Conveyor pipelines for the storefront's multi-step flows.

use crate::errors::AppError;
use conveyor::Conveyor;
use std::sync::Arc;

pub mod contexts;

pub mod cart_pipeline;
pub mod checkout_pipeline;

/// Registers every pipeline with `conveyor`. Called once while building the
/// application state.
pub fn register_all_pipelines(conveyor: &Arc<Conveyor<AppError>>) {
  tracing::info!("Registering pipelines...");

  cart_pipeline::register_add_to_cart_pipeline(conveyor);
  checkout_pipeline::register_checkout_pipeline(conveyor);

  tracing::info!("All application pipelines registered.");
}
