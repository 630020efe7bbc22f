//! BookCatalog trait definition

use async_trait::async_trait;

use super::types::{Book, CatalogError, Review, ReviewRemoval};

/// Author/title filters that match nothing report `NotFound` instead of an
/// empty list.
pub const EMPTY_SEARCH_IS_NOT_FOUND: bool = true;

/// Trait for book catalogs
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// List all books in seed order
    async fn list_books(&self) -> Vec<Book>;

    /// Get the book with exactly this isbn
    async fn get_book(&self, isbn: &str) -> Result<Book, CatalogError>;

    /// All books whose author matches exactly (case-sensitive)
    async fn books_by_author(&self, author: &str) -> Result<Vec<Book>, CatalogError>;

    /// All books whose title matches exactly (case-sensitive)
    async fn books_by_title(&self, title: &str) -> Result<Vec<Book>, CatalogError>;

    /// Reviews of a book, in insertion order
    async fn get_reviews(&self, isbn: &str) -> Result<Vec<Review>, CatalogError> {
        self.get_book(isbn).await.map(|book| book.reviews)
    }

    /// Append a review to a book and return the updated review list
    async fn append_review(&self, isbn: &str, review: Review) -> Result<Vec<Review>, CatalogError>;

    /// Drop every review written by `reviewer`, reporting what remains and
    /// how many were removed
    async fn remove_reviews_by(
        &self,
        isbn: &str,
        reviewer: &str,
    ) -> Result<ReviewRemoval, CatalogError>;

    /// Number of books in the catalog
    async fn book_count(&self) -> usize {
        self.list_books().await.len()
    }
}
