//! Disco Catalog Server Library
//!
//! Flattens artists' discographies into a priced album catalog and serves it
//! over HTTP. The modules are exposed for the binaries and integration tests.

pub mod catalog;
pub mod catalog_store;
pub mod config;
pub mod server;
pub mod sqlite_persistence;

pub use catalog::{CatalogEntry, CatalogError, CatalogIndex, PricingEngine};
pub use catalog_store::{CatalogStore, InMemoryCatalogStore, SqliteCatalogStore};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
