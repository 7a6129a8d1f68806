// storefront/src/store/mod.rs

//! Document store adapter.
//!
//! Every entity lives in a named collection of schema-flexible documents,
//! each addressed by a store-generated identifier. A [`Collection`] is the
//! only way the rest of the service touches persistence; the PostgreSQL and
//! in-memory backends both implement it.

pub mod memory;
pub mod postgres;
pub mod seed;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{AppConfig, StoreBackend};
use crate::models::{CartLineItem, Order, Product};

pub const PRODUCTS: &str = "products";
pub const CART: &str = "cart";
pub const ORDERS: &str = "orders";

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Document (de)serialization failed: {0}")]
  Serde(#[from] serde_json::Error),

  #[error("Store unavailable: {0}")]
  Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Anything that can be kept in a collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> Document for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

/// A document together with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
  #[serde(rename = "_id")]
  pub id: Uuid,
  #[serde(flatten)]
  pub doc: T,
}

/// Parses a caller-supplied identifier. `None` means it cannot name any
/// document, which callers report as "not found".
pub fn parse_id(raw: &str) -> Option<Uuid> {
  Uuid::parse_str(raw.trim()).ok()
}

/// Collection-scoped operations. Iteration order is the store's natural
/// (insertion) order.
#[async_trait]
pub trait Collection<T: Document>: Send + Sync {
  fn name(&self) -> &str;

  async fn find_all(&self) -> StoreResult<Vec<Stored<T>>>;

  async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Stored<T>>>;

  /// First document whose top-level `field` equals `value`.
  async fn find_one_by(&self, field: &str, value: &Value) -> StoreResult<Option<Stored<T>>>;

  async fn insert_one(&self, doc: T) -> StoreResult<Stored<T>>;

  /// Replaces the document body; returns the number of documents matched.
  async fn replace_one(&self, id: Uuid, doc: T) -> StoreResult<u64>;

  /// Returns the number of documents deleted.
  async fn delete_one(&self, id: Uuid) -> StoreResult<u64>;

  /// Deletes exactly the given ids; returns the number deleted.
  async fn delete_many(&self, ids: &[Uuid]) -> StoreResult<u64>;
}

/// Handles for the three collections the service works with.
#[derive(Clone)]
pub struct Collections {
  pub products: Arc<dyn Collection<Product>>,
  pub cart: Arc<dyn Collection<CartLineItem>>,
  pub orders: Arc<dyn Collection<Order>>,
}

impl Collections {
  pub fn in_memory() -> Self {
    Self {
      products: Arc::new(memory::MemoryCollection::new(PRODUCTS)),
      cart: Arc::new(memory::MemoryCollection::new(CART)),
      orders: Arc::new(memory::MemoryCollection::new(ORDERS)),
    }
  }

  /// Opens the PostgreSQL-backed collections, creating their tables if needed.
  pub async fn postgres(pool: sqlx::PgPool) -> StoreResult<Self> {
    for table in [PRODUCTS, CART, ORDERS] {
      postgres::ensure_collection_table(&pool, table).await?;
    }
    Ok(Self {
      products: Arc::new(postgres::PgCollection::new(pool.clone(), PRODUCTS)),
      cart: Arc::new(postgres::PgCollection::new(pool.clone(), CART)),
      orders: Arc::new(postgres::PgCollection::new(pool, ORDERS)),
    })
  }

  pub async fn from_config(config: &AppConfig) -> StoreResult<Self> {
    match config.store_backend {
      StoreBackend::Memory => {
        tracing::warn!("Using the in-memory store; data is lost on restart.");
        Ok(Self::in_memory())
      }
      StoreBackend::Postgres => {
        let url = config
          .database_url
          .as_deref()
          .ok_or_else(|| StoreError::Unavailable("DATABASE_URL is not set".to_string()))?;
        let pool = PgPoolOptions::new()
          .max_connections(config.database_max_connections)
          .connect(url)
          .await?;
        tracing::info!("Successfully connected to the database.");
        Self::postgres(pool).await
      }
    }
  }
}
