// storefront/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::pipelines::checkout_pipeline;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequestPayload {
  #[serde(default)]
  pub user_info: Option<Value>,
}

#[instrument(name = "handler::checkout", skip(app_state, req_payload))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let order = checkout_pipeline::place_order(app_state.get_ref(), req_payload.into_inner().user_info).await?;

  info!(
    "Order {} placed with {} line item(s), total {}.",
    order.id,
    order.doc.items.len(),
    order.doc.total_amount
  );

  Ok(HttpResponse::Created().json(json!({
    "message": "Order placed successfully",
    "orderId": order.id,
    "order": order,
  })))
}
