//! Bookstore Server Library
//!
//! This module exports the catalog, session and HTTP components for use in
//! integration tests and external tooling.

pub mod catalog;
pub mod config;
pub mod server;
pub mod session;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use catalog::{Book, BookCatalog, CatalogError, InMemoryCatalog, Review};
pub use server::{AppState, build_router};
pub use session::{SessionError, SessionManager};
