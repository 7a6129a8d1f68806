// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

use storefront::config::AppConfig;
use storefront::models::Product;
use storefront::state::AppState;
use storefront::store::{Collection, Collections, Document, StoreError, StoreResult, Stored};

static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

pub fn memory_config() -> Arc<AppConfig> {
  let config = AppConfig::from_lookup(|name| match name {
    "STORE_BACKEND" => Some("memory".to_string()),
    _ => None,
  })
  .unwrap();
  Arc::new(config)
}

/// App state plus direct handles on the collections behind it.
pub struct TestApp {
  pub state: AppState,
  pub collections: Collections,
}

impl TestApp {
  pub fn in_memory() -> Self {
    Self::with_collections(Collections::in_memory())
  }

  pub fn with_collections(collections: Collections) -> Self {
    setup_tracing();
    let state = AppState::new(collections.clone(), memory_config());
    Self { state, collections }
  }

  pub async fn add_product(&self, name: &str, price: &str) -> Stored<Product> {
    let product = Product::new(name, price.parse::<Decimal>().unwrap());
    self.collections.products.insert_one(product).await.unwrap()
  }
}

pub fn dec(s: &str) -> Decimal {
  s.parse().unwrap()
}

/// Wraps a collection and fails the selected operations on demand.
pub struct FailingCollection<T: Document> {
  inner: Arc<dyn Collection<T>>,
  pub fail_reads: AtomicBool,
  pub fail_writes: AtomicBool,
  pub fail_deletes: AtomicBool,
}

impl<T: Document> FailingCollection<T> {
  pub fn wrap(inner: Arc<dyn Collection<T>>) -> Arc<Self> {
    Arc::new(Self {
      inner,
      fail_reads: AtomicBool::new(false),
      fail_writes: AtomicBool::new(false),
      fail_deletes: AtomicBool::new(false),
    })
  }

  fn check(&self, flag: &AtomicBool, op: &str) -> StoreResult<()> {
    if flag.load(Ordering::SeqCst) {
      return Err(StoreError::Unavailable(format!("{} on '{}' refused", op, self.inner.name())));
    }
    Ok(())
  }
}

#[async_trait]
impl<T: Document> Collection<T> for FailingCollection<T> {
  fn name(&self) -> &str {
    self.inner.name()
  }

  async fn find_all(&self) -> StoreResult<Vec<Stored<T>>> {
    self.check(&self.fail_reads, "find_all")?;
    self.inner.find_all().await
  }

  async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Stored<T>>> {
    self.check(&self.fail_reads, "find_by_id")?;
    self.inner.find_by_id(id).await
  }

  async fn find_one_by(&self, field: &str, value: &Value) -> StoreResult<Option<Stored<T>>> {
    self.check(&self.fail_reads, "find_one_by")?;
    self.inner.find_one_by(field, value).await
  }

  async fn insert_one(&self, doc: T) -> StoreResult<Stored<T>> {
    self.check(&self.fail_writes, "insert_one")?;
    self.inner.insert_one(doc).await
  }

  async fn replace_one(&self, id: Uuid, doc: T) -> StoreResult<u64> {
    self.check(&self.fail_writes, "replace_one")?;
    self.inner.replace_one(id, doc).await
  }

  async fn delete_one(&self, id: Uuid) -> StoreResult<u64> {
    self.check(&self.fail_deletes, "delete_one")?;
    self.inner.delete_one(id).await
  }

  async fn delete_many(&self, ids: &[Uuid]) -> StoreResult<u64> {
    self.check(&self.fail_deletes, "delete_many")?;
    self.inner.delete_many(ids).await
  }
}
