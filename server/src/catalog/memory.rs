//! In-memory catalog backed by an insertion-ordered map

use std::time::Instant;

use async_trait::async_trait;
use indexmap::IndexMap;
use metrics::histogram;
use tokio::sync::RwLock;
use tracing::debug;

use super::seed::{SeedError, check_unique_isbns, default_books};
use super::service::{BookCatalog, EMPTY_SEARCH_IS_NOT_FOUND};
use super::types::{Book, CatalogError, Review, ReviewRemoval};

/// Catalog holding every book in process memory
///
/// Books are keyed by isbn and iterate in seed order. All review mutations
/// take the write lock for their whole read-modify-write.
pub struct InMemoryCatalog {
    books: RwLock<IndexMap<String, Book>>,
}

impl InMemoryCatalog {
    /// Build a catalog from seed books, rejecting duplicate isbns
    pub fn from_books(books: Vec<Book>) -> Result<Self, SeedError> {
        check_unique_isbns(&books)?;
        let books = books
            .into_iter()
            .map(|book| (book.isbn.clone(), book))
            .collect();
        Ok(Self {
            books: RwLock::new(books),
        })
    }

    /// Catalog over the built-in seed books
    pub fn with_default_seed() -> Self {
        let books = default_books()
            .into_iter()
            .map(|book| (book.isbn.clone(), book))
            .collect();
        Self {
            books: RwLock::new(books),
        }
    }

    /// Filter books by a field, applying the empty-search policy
    async fn search<F>(
        &self,
        matches: F,
        not_found: CatalogError,
    ) -> Result<Vec<Book>, CatalogError>
    where
        F: Fn(&Book) -> bool + Send + Sync,
    {
        let start = Instant::now();
        let found: Vec<Book> = {
            let books = self.books.read().await;
            books.values().filter(|&b| matches(b)).cloned().collect()
        };
        histogram!("bookstore_catalog_search_duration_seconds").record(start.elapsed());

        debug!("Catalog search matched {} books", found.len());
        if found.is_empty() && EMPTY_SEARCH_IS_NOT_FOUND {
            return Err(not_found);
        }
        Ok(found)
    }
}

#[async_trait]
impl BookCatalog for InMemoryCatalog {
    async fn list_books(&self) -> Vec<Book> {
        self.books.read().await.values().cloned().collect()
    }

    async fn get_book(&self, isbn: &str) -> Result<Book, CatalogError> {
        self.books
            .read()
            .await
            .get(isbn)
            .cloned()
            .ok_or_else(|| CatalogError::BookNotFound(isbn.to_string()))
    }

    async fn books_by_author(&self, author: &str) -> Result<Vec<Book>, CatalogError> {
        self.search(
            |b| b.author == author,
            CatalogError::NoBooksByAuthor(author.to_string()),
        )
        .await
    }

    async fn books_by_title(&self, title: &str) -> Result<Vec<Book>, CatalogError> {
        self.search(
            |b| b.title == title,
            CatalogError::NoBooksWithTitle(title.to_string()),
        )
        .await
    }

    async fn get_reviews(&self, isbn: &str) -> Result<Vec<Review>, CatalogError> {
        self.books
            .read()
            .await
            .get(isbn)
            .map(|book| book.reviews.clone())
            .ok_or_else(|| CatalogError::BookNotFound(isbn.to_string()))
    }

    async fn append_review(&self, isbn: &str, review: Review) -> Result<Vec<Review>, CatalogError> {
        let mut books = self.books.write().await;
        let book = books
            .get_mut(isbn)
            .ok_or_else(|| CatalogError::BookNotFound(isbn.to_string()))?;

        book.reviews.push(review);
        Ok(book.reviews.clone())
    }

    async fn remove_reviews_by(
        &self,
        isbn: &str,
        reviewer: &str,
    ) -> Result<ReviewRemoval, CatalogError> {
        let mut books = self.books.write().await;
        let book = books
            .get_mut(isbn)
            .ok_or_else(|| CatalogError::BookNotFound(isbn.to_string()))?;

        let before = book.reviews.len();
        book.reviews.retain(|r| r.reviewer != reviewer);
        let removed = before - book.reviews.len();
        debug!("Removed {} reviews by {} from {}", removed, reviewer, isbn);

        Ok(ReviewRemoval {
            reviews: book.reviews.clone(),
            removed,
        })
    }

    async fn book_count(&self) -> usize {
        self.books.read().await.len()
    }
}
