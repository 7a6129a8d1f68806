// storefront/src/services/mod.rs

//! Collection-backed accessors the pipelines and handlers build on.

pub mod cart;
pub mod catalog;
pub mod orders;

pub use cart::{CartGuard, CartStore};
pub use catalog::Catalog;
pub use orders::OrderBook;
