use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::catalog::{BookCatalog, InMemoryCatalog, catalog_routes};
use crate::session::routes::session_routes;
use crate::session::{SessionConfig, SessionManager};

/// Ratings accepted when the configuration does not say otherwise
pub const DEFAULT_RATING_RANGE: RangeInclusive<u8> = 1..=5;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn BookCatalog>,
    pub session_manager: Arc<SessionManager>,
    /// Inclusive bounds for review ratings accepted over HTTP
    pub rating_range: RangeInclusive<u8>,
    pub started_at: Instant,
}

impl AppState {
    /// State over the built-in seed catalog with default session settings
    pub fn new() -> Self {
        Self::from_catalog(
            Arc::new(InMemoryCatalog::with_default_seed()),
            SessionConfig::default(),
        )
    }

    pub fn from_catalog(catalog: Arc<dyn BookCatalog>, session_config: SessionConfig) -> Self {
        let session_manager = Arc::new(SessionManager::with_config(
            catalog.clone(),
            session_config,
        ));
        Self {
            catalog,
            session_manager,
            rating_range: DEFAULT_RATING_RANGE,
            started_at: Instant::now(),
        }
    }

    pub fn with_rating_range(mut self, rating_range: RangeInclusive<u8>) -> Self {
        self.rating_range = rating_range;
        self
    }

    /// Returns (books, accounts, sessions)
    pub async fn get_stats(&self) -> (usize, usize, usize) {
        (
            self.catalog.book_count().await,
            self.session_manager.account_count().await,
            self.session_manager.session_count(),
        )
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub books: usize,
    pub accounts: usize,
    pub sessions: usize,
    pub uptime_seconds: u64,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (books, accounts, sessions) = state.get_stats().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        books,
        accounts,
        sessions,
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// Build the full HTTP router over `state`
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(catalog_routes())
        .merge(session_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestContext;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_reports_counts() {
        let ctx = TestContext::new();
        ctx.register_and_login("bob", "pw").await;

        let (status, body) = ctx.get_json::<HealthResponse>("/health").await;
        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.books, 5);
        assert_eq!(body.accounts, 1);
        assert_eq!(body.sessions, 1);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let ctx = TestContext::new();
        let (status, _) = ctx.get_text("/nope/at/all").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_default_rating_range() {
        let state = AppState::new();
        assert_eq!(state.rating_range, 1..=5);
    }
}
