//! Catalog record types and error definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when querying the catalog
///
/// Every variant belongs to the not-found class: the requested book or the
/// requested filter matched nothing in the current catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("No books found by author: {0}")]
    NoBooksByAuthor(String),

    #[error("No books found with title: {0}")]
    NoBooksWithTitle(String),
}

/// A reader review attached to one book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Username the review is attributed to
    pub reviewer: String,
    pub text: String,
    pub rating: u8,
}

impl Review {
    pub fn new(reviewer: impl Into<String>, text: impl Into<String>, rating: u8) -> Self {
        Self {
            reviewer: reviewer.into(),
            text: text.into(),
            rating,
        }
    }
}

/// A catalog entry keyed by isbn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique, immutable key
    pub isbn: String,
    pub title: String,
    pub author: String,
    /// Reviews in insertion order
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Outcome of removing one reviewer's reviews from a book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRemoval {
    /// Reviews left on the book, in order
    pub reviews: Vec<Review>,
    /// How many reviews were dropped
    pub removed: usize,
}

/// Response body for GET /books/:isbn/review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewsResponse {
    pub reviews: Vec<Review>,
}
