// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::pipelines::cart_pipeline;
use crate::pipelines::contexts::CartWrite;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequestPayload {
  /// Kept as text; the catalog lookup decides whether it names a product.
  pub product_id: String,
  pub quantity: i64,
}

#[instrument(name = "handler::list_cart", skip(app_state))]
pub async fn list_cart_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let items = app_state.cart.list_cart().await?;
  Ok(HttpResponse::Ok().json(items))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload),
    fields(product_id = %req_payload.product_id, quantity = %req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let AddToCartRequestPayload { product_id, quantity } = req_payload.into_inner();

  let written = cart_pipeline::add_to_cart(app_state.get_ref(), product_id, quantity).await?;
  info!("Cart line item {} written.", written.line_item().id);

  Ok(match written {
    CartWrite::Updated(item) => HttpResponse::Ok().json(json!({
      "message": "Cart updated",
      "cartItem": item,
    })),
    CartWrite::Created(item) => HttpResponse::Created().json(json!({
      "message": "Added to cart",
      "cartItem": item,
    })),
  })
}

#[instrument(name = "handler::remove_from_cart", skip(app_state, path), fields(line_item_id = %path.as_str()))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  app_state.cart.remove_from_cart(&path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Item removed from cart" })))
}
