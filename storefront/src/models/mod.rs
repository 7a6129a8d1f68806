// storefront/src/models/mod.rs

//! Documents kept in the store's collections.

pub mod cart_item;
pub mod order;
pub mod product;

pub use cart_item::CartLineItem;
pub use order::Order;
pub use product::Product;
