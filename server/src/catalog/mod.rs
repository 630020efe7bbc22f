//! Book catalog
//!
//! This module provides:
//! - `BookCatalog` trait for abstracting the book store
//! - `InMemoryCatalog`, the process-local store seeded at startup
//! - HTTP routes for catalog lookups

mod memory;
pub mod routes;
mod seed;
mod service;
mod types;

pub use memory::InMemoryCatalog;
pub use routes::catalog_routes;
pub use seed::{SeedError, default_books, load_seed};
pub use service::{BookCatalog, EMPTY_SEARCH_IS_NOT_FOUND};
pub use types::{Book, CatalogError, Review, ReviewRemoval, ReviewsResponse};
