// storefront/src/web/routes.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::web::handlers::{cart_handlers, checkout_handlers, product_handlers};

async fn index_handler() -> HttpResponse {
  HttpResponse::Ok().body("E-commerce API is running")
}

// Liveness only; the store is not probed.
async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/", web::get().to(index_handler))
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/products")
        .route("", web::get().to(product_handlers::list_products_handler))
        .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
    )
    .service(
      web::scope("/cart")
        .route("", web::get().to(cart_handlers::list_cart_handler))
        .route("", web::post().to(cart_handlers::add_to_cart_handler))
        .route("/{line_item_id}", web::delete().to(cart_handlers::remove_from_cart_handler)),
    )
    .route("/checkout", web::post().to(checkout_handlers::checkout_handler));
}
