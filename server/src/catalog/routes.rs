//! HTTP route handlers for catalog lookups

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use super::types::{Book, CatalogError, ReviewsResponse};
use crate::server::AppState;

/// Error response for catalog API
#[derive(Debug, Serialize)]
pub struct CatalogErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<CatalogError> for CatalogErrorResponse {
    fn from(e: CatalogError) -> Self {
        let code = match &e {
            CatalogError::BookNotFound(_)
            | CatalogError::NoBooksByAuthor(_)
            | CatalogError::NoBooksWithTitle(_) => "not_found",
        };
        Self {
            error: e.to_string(),
            code: code.to_string(),
        }
    }
}

impl IntoResponse for CatalogErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// GET / - Welcome banner
pub async fn welcome() -> &'static str {
    "Welcome to the Book Store API!"
}

/// GET /books - List every book
pub async fn list_books(State(state): State<AppState>) -> Json<Vec<Book>> {
    Json(state.catalog.list_books().await)
}

/// GET /books/:isbn - Get a single book
pub async fn get_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Json<Book>, CatalogErrorResponse> {
    let book = state.catalog.get_book(&isbn).await.map_err(|e| {
        tracing::debug!("Book lookup failed: {}", e);
        CatalogErrorResponse::from(e)
    })?;

    Ok(Json(book))
}

/// GET /books/author/:author - Books by exact author
pub async fn books_by_author(
    State(state): State<AppState>,
    Path(author): Path<String>,
) -> Result<Json<Vec<Book>>, CatalogErrorResponse> {
    let books = state.catalog.books_by_author(&author).await.map_err(|e| {
        tracing::debug!("Author search failed: {}", e);
        CatalogErrorResponse::from(e)
    })?;

    Ok(Json(books))
}

/// GET /books/title/:title - Books by exact title
pub async fn books_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<Vec<Book>>, CatalogErrorResponse> {
    let books = state.catalog.books_by_title(&title).await.map_err(|e| {
        tracing::debug!("Title search failed: {}", e);
        CatalogErrorResponse::from(e)
    })?;

    Ok(Json(books))
}

/// GET /books/:isbn/review - Reviews of a book
pub async fn get_reviews(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Json<ReviewsResponse>, CatalogErrorResponse> {
    let reviews = state.catalog.get_reviews(&isbn).await.map_err(|e| {
        tracing::debug!("Review lookup failed: {}", e);
        CatalogErrorResponse::from(e)
    })?;

    Ok(Json(ReviewsResponse { reviews }))
}

/// Build catalog read routes
///
/// The `/async` and `/promise` prefixes serve the same handlers as their
/// plain counterparts.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/books", get(list_books))
        .route("/books/:isbn", get(get_book))
        .route("/books/author/:author", get(books_by_author))
        .route("/books/title/:title", get(books_by_title))
        .route("/async/books", get(list_books))
        .route("/promise/books/:isbn", get(get_book))
        .route("/async/books/author/:author", get(books_by_author))
        .route("/async/books/title/:title", get(books_by_title))
}
