// storefront/src/web/mod.rs

pub mod handlers;
pub mod routes;

use actix_cors::Cors;
use actix_web::{error, web, HttpResponse};
use serde_json::json;
use tracing::warn;

use crate::config::AppConfig;

pub use routes::configure_app_routes;

/// Everything the application serves: routes, plus JSON error bodies for
/// undecodable requests and unknown paths.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
  cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
    let message = err.to_string();
    warn!("Rejected request body: {}", message);
    error::InternalError::from_response(err, HttpResponse::BadRequest().json(json!({ "error": message }))).into()
  }));
  configure_app_routes(cfg);
  cfg.default_service(web::to(not_found_handler));
}

/// CORS for every route. With no configured origins any origin is accepted
/// and answered with `*`.
pub fn cors_layer(config: &AppConfig) -> Cors {
  let cors = Cors::default().allow_any_method().allow_any_header().max_age(3600);
  if config.cors_allowed_origins.is_empty() {
    return cors.allow_any_origin().send_wildcard();
  }
  config
    .cors_allowed_origins
    .iter()
    .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

async fn not_found_handler() -> HttpResponse {
  HttpResponse::NotFound().json(json!({ "error": "Route not found" }))
}
