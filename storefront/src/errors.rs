// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;
use conveyor::ConveyorError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Empty Cart: {0}")]
  EmptyCart(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Store Unavailable: {0}")]
  StoreUnavailable(#[from] StoreError),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: ConveyorError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  pub fn product_not_found() -> Self {
    AppError::NotFound("Product not found".to_string())
  }

  pub fn item_not_found() -> Self {
    AppError::NotFound("Item not found".to_string())
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::EmptyCart(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Config(_) | AppError::StoreUnavailable(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with server error");
    } else {
      tracing::warn!(application_error = %self, "Responding with client error");
    }
    // Server-side detail stays in the log.
    let message = match self {
      AppError::Validation(m) | AppError::NotFound(m) | AppError::EmptyCart(m) => m.as_str(),
      AppError::StoreUnavailable(_) => "Database operation failed",
      AppError::Config(_) | AppError::Workflow { .. } | AppError::Internal(_) => "An internal error occurred",
    };
    HttpResponse::build(status).json(json!({ "error": message }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn client_errors_map_to_4xx() {
    assert_eq!(AppError::product_not_found().status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
      AppError::EmptyCart("Cart is empty. Add items before checkout.".into()).error_response().status(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      AppError::Validation("bad".into()).error_response().status(),
      StatusCode::BAD_REQUEST
    );
  }

  #[test]
  fn store_failures_are_generic_500s() {
    let err = AppError::from(StoreError::Unavailable("connection reset".into()));
    assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
