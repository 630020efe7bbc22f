mod app;

pub use app::{AppState, DEFAULT_RATING_RANGE, HealthResponse, build_router, health};
