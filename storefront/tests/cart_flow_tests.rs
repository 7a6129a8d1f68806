// tests/cart_flow_tests.rs
mod common;

use common::*;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use storefront::errors::AppError;
use storefront::models::Product;
use storefront::pipelines::cart_pipeline::add_to_cart;
use storefront::pipelines::contexts::CartWrite;
use storefront::pipelines::contexts::AddToCartCtxData;
use storefront::store::{Collection, Collections};

#[tokio::test]
async fn test_first_add_creates_line_item_with_product_snapshot() {
  let app = TestApp::in_memory();
  let keyboard = app.add_product("Keyboard", "89.50").await;

  let written = add_to_cart(&app.state, keyboard.id.to_string(), 2).await.unwrap();

  let CartWrite::Created(line) = written else {
    panic!("expected a new line item, got {:?}", written);
  };
  assert_eq!(line.doc.product_id, keyboard.id);
  assert_eq!(line.doc.name, "Keyboard");
  assert_eq!(line.doc.price, dec("89.50"));
  assert_eq!(line.doc.quantity, 2);
  assert_eq!(app.state.cart.list_cart().await.unwrap(), vec![line]);
}

#[tokio::test]
async fn test_adding_same_product_twice_merges_quantities() {
  let app = TestApp::in_memory();
  let cable = app.add_product("Cable", "9.99").await;

  let first = add_to_cart(&app.state, cable.id.to_string(), 2).await.unwrap();
  let second = add_to_cart(&app.state, cable.id.to_string(), 3).await.unwrap();

  assert!(matches!(first, CartWrite::Created(_)));
  let CartWrite::Updated(merged) = second else {
    panic!("expected the existing line to be updated, got {:?}", second);
  };
  assert_eq!(merged.id, first.line_item().id);
  assert_eq!(merged.doc.quantity, 5);

  let cart = app.state.cart.list_cart().await.unwrap();
  assert_eq!(cart.len(), 1);
  assert_eq!(cart[0].doc.quantity, 5);
}

#[tokio::test]
async fn test_distinct_products_get_distinct_lines() {
  let app = TestApp::in_memory();
  let a = app.add_product("A", "1").await;
  let b = app.add_product("B", "2").await;

  add_to_cart(&app.state, a.id.to_string(), 1).await.unwrap();
  add_to_cart(&app.state, b.id.to_string(), 1).await.unwrap();

  let cart = app.state.cart.list_cart().await.unwrap();
  let product_ids: Vec<_> = cart.iter().map(|l| l.doc.product_id).collect();
  assert_eq!(product_ids, vec![a.id, b.id]);
}

#[tokio::test]
async fn test_non_positive_quantity_is_rejected_without_writing() {
  let app = TestApp::in_memory();
  let lamp = app.add_product("Lamp", "25").await;

  for quantity in [0, -4] {
    let err = add_to_cart(&app.state, lamp.id.to_string(), quantity).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "Quantity must be a positive integer."));
  }
  assert!(app.state.cart.list_cart().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_or_malformed_product_is_not_found() {
  let app = TestApp::in_memory();

  for raw in [uuid::Uuid::new_v4().to_string(), "not-an-id".to_string(), String::new()] {
    let err = add_to_cart(&app.state, raw, 1).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Product not found"));
  }
  assert!(app.state.cart.list_cart().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_price_is_locked_at_add_time() {
  let app = TestApp::in_memory();
  let headphones = app.add_product("Headphones", "59.99").await;
  add_to_cart(&app.state, headphones.id.to_string(), 1).await.unwrap();

  let repriced = Product::new("Headphones v2", dec("79.99"));
  app.collections.products.replace_one(headphones.id, repriced).await.unwrap();
  let merged = add_to_cart(&app.state, headphones.id.to_string(), 1).await.unwrap();

  assert_eq!(merged.line_item().doc.name, "Headphones");
  assert_eq!(merged.line_item().doc.price, dec("59.99"));
  assert_eq!(merged.line_item().doc.quantity, 2);
}

#[tokio::test]
async fn test_merge_overflow_is_a_validation_error() {
  let app = TestApp::in_memory();
  let bolt = app.add_product("Bolt", "0.10").await;
  add_to_cart(&app.state, bolt.id.to_string(), i64::MAX).await.unwrap();

  let err = add_to_cart(&app.state, bolt.id.to_string(), 1).await.unwrap_err();

  assert!(matches!(err, AppError::Validation(_)));
  assert_eq!(app.state.cart.list_cart().await.unwrap()[0].doc.quantity, i64::MAX);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_of_one_product_never_duplicate_lines() {
  let app = TestApp::in_memory();
  let pen = app.add_product("Pen", "1.25").await;

  let mut tasks = Vec::new();
  for _ in 0..16 {
    let state = app.state.clone();
    let product_id = pen.id.to_string();
    tasks.push(tokio::spawn(async move { add_to_cart(&state, product_id, 1).await }));
  }
  for task in tasks {
    task.await.unwrap().unwrap();
  }

  let cart = app.state.cart.list_cart().await.unwrap();
  assert_eq!(cart.len(), 1);
  assert_eq!(cart[0].doc.quantity, 16);
}

#[tokio::test]
async fn test_failed_add_releases_the_cart_gate() {
  let base = Collections::in_memory();
  let cart = FailingCollection::wrap(base.cart.clone());
  cart.fail_writes.store(true, Ordering::SeqCst);
  let app = TestApp::with_collections(Collections {
    cart: cart.clone(),
    ..base
  });
  let mug = app.add_product("Mug", "8").await;

  let err = add_to_cart(&app.state, mug.id.to_string(), 1).await.unwrap_err();
  assert!(matches!(err, AppError::StoreUnavailable(_)));

  // A held gate would hang here.
  cart.fail_writes.store(false, Ordering::SeqCst);
  let written = add_to_cart(&app.state, mug.id.to_string(), 1).await.unwrap();
  assert!(matches!(written, CartWrite::Created(_)));
}

#[tokio::test]
async fn test_add_to_cart_pipeline_is_registered() {
  let app = TestApp::in_memory();
  assert!(app.state.conveyor.is_registered::<AddToCartCtxData>());
}

#[tokio::test]
async fn test_remove_deletes_line_and_repeat_is_not_found() {
  let app = TestApp::in_memory();
  let a = app.add_product("A", "3").await;
  let b = app.add_product("B", "4").await;
  let line_a = add_to_cart(&app.state, a.id.to_string(), 1).await.unwrap();
  add_to_cart(&app.state, b.id.to_string(), 1).await.unwrap();
  let raw_id = line_a.line_item().id.to_string();

  app.state.cart.remove_from_cart(&raw_id).await.unwrap();
  let again = app.state.cart.remove_from_cart(&raw_id).await.unwrap_err();

  assert!(matches!(again, AppError::NotFound(ref m) if m == "Item not found"));
  let cart = app.state.cart.list_cart().await.unwrap();
  assert_eq!(cart.len(), 1);
  assert_eq!(cart[0].doc.product_id, b.id);
}

#[tokio::test]
async fn test_remove_unknown_or_malformed_id_leaves_cart_unchanged() {
  let app = TestApp::in_memory();
  let a = app.add_product("A", "3").await;
  add_to_cart(&app.state, a.id.to_string(), 2).await.unwrap();
  let before = app.state.cart.list_cart().await.unwrap();

  for raw in [uuid::Uuid::new_v4().to_string(), "garbage".to_string()] {
    let err = app.state.cart.remove_from_cart(&raw).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
  }
  assert_eq!(app.state.cart.list_cart().await.unwrap(), before);
}

#[tokio::test]
async fn test_store_failure_surfaces_as_store_unavailable() {
  let base = Collections::in_memory();
  let products = FailingCollection::wrap(base.products.clone());
  products.fail_reads.store(true, Ordering::SeqCst);
  let app = TestApp::with_collections(Collections {
    products: products as Arc<dyn Collection<Product>>,
    ..base
  });

  let err = app.state.catalog.list_products().await.unwrap_err();
  assert!(matches!(err, AppError::StoreUnavailable(_)));
}

#[tokio::test]
async fn test_line_whose_subtotal_cannot_be_represented_is_rejected() {
  let app = TestApp::in_memory();
  let estate = app.add_product("Estate", "20000000000").await;

  let err = add_to_cart(&app.state, estate.id.to_string(), i64::MAX).await.unwrap_err();
  assert!(matches!(err, AppError::Validation(_)));
  assert!(app.state.cart.list_cart().await.unwrap().is_empty());

  add_to_cart(&app.state, estate.id.to_string(), 1).await.unwrap();
  let err = add_to_cart(&app.state, estate.id.to_string(), i64::MAX - 1).await.unwrap_err();
  assert!(matches!(err, AppError::Validation(_)));
  assert_eq!(app.state.cart.list_cart().await.unwrap()[0].doc.quantity, 1);
}
