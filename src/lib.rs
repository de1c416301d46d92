//! medvault: a small medication catalog.
//!
//! - [`store`]: durable records keyed uniquely by name
//! - [`loader`]: idempotent bulk load from a JSON dataset
//! - [`server`]: list / insert-if-absent HTTP API
//! - [`lookup`]: client-side exact-name search over the API

pub mod commands;
pub mod config;
pub mod error;
pub mod loader;
pub mod lookup;
pub mod models;
pub mod server;
pub mod store;
