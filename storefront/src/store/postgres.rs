// storefront/src/store/postgres.rs

//! PostgreSQL backend: one table per collection, each row a JSONB document.
//!
//! Table names only ever come from the collection constants in `store`, never
//! from request data, so they are interpolated into the SQL text directly.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::marker::PhantomData;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{Collection, Document, StoreResult, Stored};

pub async fn ensure_collection_table(pool: &PgPool, table: &str) -> StoreResult<()> {
  let ddl = format!(
    "CREATE TABLE IF NOT EXISTS {table} (
       seq BIGSERIAL UNIQUE,
       id UUID PRIMARY KEY,
       doc JSONB NOT NULL,
       created_at TIMESTAMPTZ NOT NULL DEFAULT now()
     )"
  );
  sqlx::query(&ddl).execute(pool).await?;
  debug!(%table, "Collection table ready.");
  Ok(())
}

#[derive(FromRow)]
struct DocumentRow {
  id: Uuid,
  doc: Json<Value>,
}

impl DocumentRow {
  fn into_stored<T: Document>(self) -> StoreResult<Stored<T>> {
    Ok(Stored {
      id: self.id,
      doc: serde_json::from_value(self.doc.0)?,
    })
  }
}

pub struct PgCollection<T> {
  pool: PgPool,
  table: &'static str,
  _doc: PhantomData<fn() -> T>,
}

impl<T: Document> PgCollection<T> {
  pub fn new(pool: PgPool, table: &'static str) -> Self {
    Self {
      pool,
      table,
      _doc: PhantomData,
    }
  }
}

#[async_trait]
impl<T: Document> Collection<T> for PgCollection<T> {
  fn name(&self) -> &str {
    self.table
  }

  #[instrument(name = "store::find_all", skip(self), fields(collection = self.table), err(Display))]
  async fn find_all(&self) -> StoreResult<Vec<Stored<T>>> {
    let sql = format!("SELECT id, doc FROM {} ORDER BY seq", self.table);
    let rows: Vec<DocumentRow> = sqlx::query_as::<_, DocumentRow>(&sql).fetch(&self.pool).try_collect().await?;
    rows.into_iter().map(DocumentRow::into_stored).collect()
  }

  #[instrument(name = "store::find_by_id", skip(self), fields(collection = self.table), err(Display))]
  async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Stored<T>>> {
    let sql = format!("SELECT id, doc FROM {} WHERE id = $1", self.table);
    let row: Option<DocumentRow> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
    row.map(DocumentRow::into_stored).transpose()
  }

  #[instrument(name = "store::find_one_by", skip(self, value), fields(collection = self.table), err(Display))]
  async fn find_one_by(&self, field: &str, value: &Value) -> StoreResult<Option<Stored<T>>> {
    let sql = format!(
      "SELECT id, doc FROM {} WHERE doc -> $1 = $2 ORDER BY seq LIMIT 1",
      self.table
    );
    let row: Option<DocumentRow> = sqlx::query_as(&sql)
      .bind(field)
      .bind(Json(value))
      .fetch_optional(&self.pool)
      .await?;
    row.map(DocumentRow::into_stored).transpose()
  }

  #[instrument(name = "store::insert_one", skip(self, doc), fields(collection = self.table), err(Display))]
  async fn insert_one(&self, doc: T) -> StoreResult<Stored<T>> {
    let id = Uuid::new_v4();
    let body = serde_json::to_value(&doc)?;
    let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", self.table);
    sqlx::query(&sql).bind(id).bind(Json(body)).execute(&self.pool).await?;
    Ok(Stored { id, doc })
  }

  #[instrument(name = "store::replace_one", skip(self, doc), fields(collection = self.table), err(Display))]
  async fn replace_one(&self, id: Uuid, doc: T) -> StoreResult<u64> {
    let body = serde_json::to_value(&doc)?;
    let sql = format!("UPDATE {} SET doc = $2 WHERE id = $1", self.table);
    let result = sqlx::query(&sql).bind(id).bind(Json(body)).execute(&self.pool).await?;
    Ok(result.rows_affected())
  }

  #[instrument(name = "store::delete_one", skip(self), fields(collection = self.table), err(Display))]
  async fn delete_one(&self, id: Uuid) -> StoreResult<u64> {
    let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
    let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
    Ok(result.rows_affected())
  }

  #[instrument(name = "store::delete_many", skip(self, ids), fields(collection = self.table, count = ids.len()), err(Display))]
  async fn delete_many(&self, ids: &[Uuid]) -> StoreResult<u64> {
    if ids.is_empty() {
      return Ok(0);
    }
    let sql = format!("DELETE FROM {} WHERE id = ANY($1)", self.table);
    let result = sqlx::query(&sql).bind(ids).execute(&self.pool).await?;
    Ok(result.rows_affected())
  }
}
