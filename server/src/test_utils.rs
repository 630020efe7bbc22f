//! Test Utilities Module
//!
//! Provides a router-backed test context for exercising the HTTP surface.
//! This module is only compiled when running tests.

#![cfg(test)]

use crate::server::{AppState, build_router};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde::de::DeserializeOwned;
use tower::util::ServiceExt;

/// Test context that holds the application state and its router
pub struct TestContext {
    pub app_state: AppState,
    pub router: Router,
}

impl TestContext {
    /// Create a new test context over the built-in seed catalog
    pub fn new() -> Self {
        Self::with_state(AppState::new())
    }

    pub fn with_state(app_state: AppState) -> Self {
        let router = build_router(app_state.clone());
        Self { app_state, router }
    }

    /// Send a request through a clone of the router
    pub async fn request(&self, request: Request<Body>) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// GET a path and decode the JSON body, if any
    pub async fn get_json<T: DeserializeOwned>(&self, uri: &str) -> (StatusCode, Option<T>) {
        let response = self
            .request(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        decode(response).await
    }

    /// GET a path and return the raw body as text
    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .request(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    /// Send a JSON body with an optional bearer token
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> (StatusCode, Option<T>) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = self
            .request(builder.body(Body::from(body.to_string())).unwrap())
            .await;
        decode(response).await
    }

    /// Register an account directly through the session manager
    pub async fn register(&self, username: &str, password: &str) {
        self.app_state
            .session_manager
            .register(username, password)
            .await
            .expect("Failed to register test account");
    }

    /// Register an account and return a session token for it
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        self.register(username, password).await;
        self.app_state
            .session_manager
            .login(username, password)
            .await
            .expect("Failed to log in test account")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

async fn decode<T: DeserializeOwned>(response: axum::response::Response) -> (StatusCode, Option<T>) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_context_creation() {
        let ctx = TestContext::new();
        assert_eq!(ctx.app_state.session_manager.account_count().await, 0);
    }

    #[tokio::test]
    async fn test_register_and_login_helper() {
        let ctx = TestContext::new();
        let token = ctx.register_and_login("bob", "pw").await;
        let account = ctx.app_state.session_manager.resolve(&token).await;
        assert_eq!(account.unwrap().username, "bob");
    }
}
