// storefront/src/lib.rs

//! A small storefront backend: product catalog, one shared cart, and
//! checkout into orders, served over actix-web.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod web;
