//! Initial catalog contents

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::types::{Book, Review};

/// Errors raised while loading the initial catalog
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse seed file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate isbn in seed: {0}")]
    DuplicateIsbn(String),
}

/// Built-in catalog used when no seed file is configured
pub fn default_books() -> Vec<Book> {
    vec![
        Book {
            isbn: "12345".to_string(),
            title: "The Great Gatsby".to_string(),
            author: "F. Scott Fitzgerald".to_string(),
            reviews: vec![Review::new(
                "Alice",
                "A fascinating glimpse into the Jazz Age.",
                5,
            )],
        },
        Book {
            isbn: "67890".to_string(),
            title: "To Kill a Mockingbird".to_string(),
            author: "Harper Lee".to_string(),
            reviews: vec![
                Review::new("Charlie", "A powerful message about justice.", 4),
                Review::new("Diana", "A beautifully written story.", 5),
            ],
        },
        Book {
            isbn: "54321".to_string(),
            title: "1984".to_string(),
            author: "George Orwell".to_string(),
            reviews: vec![Review::new("Eve", "Chilling and thought-provoking.", 5)],
        },
        Book {
            isbn: "09876".to_string(),
            title: "Pride and Prejudice".to_string(),
            author: "Jane Austen".to_string(),
            reviews: vec![
                Review::new("Frank", "A delightful romance.", 4),
                Review::new("Grace", "A bit too slow for my taste.", 3),
            ],
        },
        Book {
            isbn: "11111".to_string(),
            title: "The Catcher in the Rye".to_string(),
            author: "J.D. Salinger".to_string(),
            reviews: vec![Review::new(
                "Hank",
                "A relatable story about teenage angst.",
                4,
            )],
        },
    ]
}

/// Load a JSON array of books from disk
pub fn load_seed_file(path: &Path) -> Result<Vec<Book>, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let books: Vec<Book> = serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    check_unique_isbns(&books)?;
    info!("Loaded {} books from {:?}", books.len(), path);
    Ok(books)
}

/// Seed books from `path` if given, otherwise the built-in set
pub fn load_seed(path: Option<&Path>) -> Result<Vec<Book>, SeedError> {
    match path {
        Some(path) => load_seed_file(path),
        None => Ok(default_books()),
    }
}

/// isbn is the catalog key, so a seed must not repeat one
pub fn check_unique_isbns(books: &[Book]) -> Result<(), SeedError> {
    let mut seen = HashSet::with_capacity(books.len());
    for book in books {
        if !seen.insert(book.isbn.as_str()) {
            return Err(SeedError::DuplicateIsbn(book.isbn.clone()));
        }
    }
    Ok(())
}
