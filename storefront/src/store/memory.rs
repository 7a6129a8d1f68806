// storefront/src/store/memory.rs

//! In-process collection used by tests and `STORE_BACKEND=memory` runs.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use super::{Collection, Document, StoreResult, Stored};

pub struct MemoryCollection<T> {
  name: String,
  docs: RwLock<Vec<Stored<T>>>,
}

impl<T: Document> MemoryCollection<T> {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      docs: RwLock::new(Vec::new()),
    }
  }
}

#[async_trait]
impl<T: Document> Collection<T> for MemoryCollection<T> {
  fn name(&self) -> &str {
    &self.name
  }

  async fn find_all(&self) -> StoreResult<Vec<Stored<T>>> {
    Ok(self.docs.read().clone())
  }

  async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Stored<T>>> {
    Ok(self.docs.read().iter().find(|d| d.id == id).cloned())
  }

  async fn find_one_by(&self, field: &str, value: &Value) -> StoreResult<Option<Stored<T>>> {
    let docs = self.docs.read();
    for stored in docs.iter() {
      if serde_json::to_value(&stored.doc)?.get(field) == Some(value) {
        return Ok(Some(stored.clone()));
      }
    }
    Ok(None)
  }

  async fn insert_one(&self, doc: T) -> StoreResult<Stored<T>> {
    let stored = Stored { id: Uuid::new_v4(), doc };
    self.docs.write().push(stored.clone());
    Ok(stored)
  }

  async fn replace_one(&self, id: Uuid, doc: T) -> StoreResult<u64> {
    let mut docs = self.docs.write();
    match docs.iter_mut().find(|d| d.id == id) {
      Some(existing) => {
        existing.doc = doc;
        Ok(1)
      }
      None => Ok(0),
    }
  }

  async fn delete_one(&self, id: Uuid) -> StoreResult<u64> {
    let mut docs = self.docs.write();
    match docs.iter().position(|d| d.id == id) {
      Some(idx) => {
        docs.remove(idx);
        Ok(1)
      }
      None => Ok(0),
    }
  }

  async fn delete_many(&self, ids: &[Uuid]) -> StoreResult<u64> {
    let mut docs = self.docs.write();
    let before = docs.len();
    docs.retain(|d| !ids.contains(&d.id));
    Ok((before - docs.len()) as u64)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::{Deserialize, Serialize};
  use serde_json::json;

  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  struct Note {
    tag: String,
    body: String,
  }

  fn note(tag: &str, body: &str) -> Note {
    Note {
      tag: tag.to_string(),
      body: body.to_string(),
    }
  }

  #[tokio::test]
  async fn keeps_insertion_order_and_assigns_ids() {
    let notes = MemoryCollection::new("notes");
    let a = notes.insert_one(note("x", "first")).await.unwrap();
    let b = notes.insert_one(note("y", "second")).await.unwrap();
    assert_ne!(a.id, b.id);

    let all = notes.find_all().await.unwrap();
    assert_eq!(all, vec![a.clone(), b]);
    assert_eq!(notes.find_by_id(a.id).await.unwrap(), Some(a));
    assert_eq!(notes.name(), "notes");
  }

  #[tokio::test]
  async fn finds_by_top_level_field() {
    let notes = MemoryCollection::new("notes");
    notes.insert_one(note("x", "first")).await.unwrap();
    let y = notes.insert_one(note("y", "second")).await.unwrap();

    assert_eq!(notes.find_one_by("tag", &json!("y")).await.unwrap(), Some(y));
    assert_eq!(notes.find_one_by("tag", &json!("z")).await.unwrap(), None);
  }

  #[tokio::test]
  async fn replace_and_delete_report_matches() {
    let notes = MemoryCollection::new("notes");
    let a = notes.insert_one(note("x", "first")).await.unwrap();
    let b = notes.insert_one(note("y", "second")).await.unwrap();
    let c = notes.insert_one(note("z", "third")).await.unwrap();

    assert_eq!(notes.replace_one(a.id, note("x", "edited")).await.unwrap(), 1);
    assert_eq!(notes.replace_one(Uuid::new_v4(), note("q", "nope")).await.unwrap(), 0);
    assert_eq!(notes.find_by_id(a.id).await.unwrap().unwrap().doc.body, "edited");

    assert_eq!(notes.delete_one(b.id).await.unwrap(), 1);
    assert_eq!(notes.delete_one(b.id).await.unwrap(), 0);

    assert_eq!(notes.delete_many(&[a.id, Uuid::new_v4()]).await.unwrap(), 1);
    let remaining = notes.find_all().await.unwrap();
    assert_eq!(remaining, vec![c]);
  }
}
