//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bookstore_server::catalog::{Book, InMemoryCatalog, Review};
use bookstore_server::server::{AppState, build_router};
use bookstore_server::session::SessionConfig;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt;

/// Create a test application router with state over the built-in seed
pub fn create_test_app_with_state() -> (Router, AppState) {
    let app_state = AppState::new();
    (build_router(app_state.clone()), app_state)
}

/// Create a test application router with all routes configured
pub fn create_test_app() -> Router {
    create_test_app_with_state().0
}

/// Create a test application with a custom catalog and session config
pub fn create_test_app_with(books: Vec<Book>, config: SessionConfig) -> Router {
    let catalog = InMemoryCatalog::from_books(books).expect("test books have unique isbns");
    build_router(AppState::from_catalog(Arc::new(catalog), config))
}

/// A small catalog with two books sharing an author
pub fn create_test_books() -> Vec<Book> {
    vec![
        Book {
            isbn: "111".to_string(),
            title: "Emma".to_string(),
            author: "Jane Austen".to_string(),
            reviews: vec![Review::new("ann", "Witty.", 4)],
        },
        Book {
            isbn: "222".to_string(),
            title: "Persuasion".to_string(),
            author: "Jane Austen".to_string(),
            reviews: Vec::new(),
        },
    ]
}

/// Send a request and decode the JSON response body (Null when empty)
pub async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Register over HTTP and return the response status
pub async fn register(app: &Router, username: &str, password: &str) -> StatusCode {
    call(
        app,
        "POST",
        "/register",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await
    .0
}

/// Log in over HTTP and return the session token on success
pub async fn login(app: &Router, username: &str, password: &str) -> Option<String> {
    let (status, body) = call(
        app,
        "POST",
        "/login",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;
    if status != StatusCode::OK {
        return None;
    }
    body["token"].as_str().map(str::to_string)
}

/// Reviewer names of a book, in order
pub async fn reviewers(app: &Router, isbn: &str) -> Vec<String> {
    let (_, body) = call(app, "GET", &format!("/books/{}/review", isbn), None, None).await;
    body["reviews"]
        .as_array()
        .map(|reviews| {
            reviews
                .iter()
                .filter_map(|r| r["reviewer"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Initialize test logging for detailed output
#[allow(dead_code)]
pub fn init_test_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookstore_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
