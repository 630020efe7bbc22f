use axum::{response::IntoResponse, routing::get};
use bookstore_server::catalog::{InMemoryCatalog, load_seed};
use bookstore_server::config::Config;
use bookstore_server::server::{AppState, build_router};
use bookstore_server::session::SessionConfig;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prometheus metrics handle for exposing metrics in Prometheus format
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Endpoint to expose metrics in Prometheus format
async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Update gauge metrics for catalog and sessions (called periodically)
async fn update_gauge_metrics(state: &AppState) {
    let (books, accounts, sessions) = state.get_stats().await;

    metrics::gauge!("bookstore_books").set(books as f64);
    metrics::gauge!("bookstore_accounts").set(accounts as f64);
    metrics::gauge!("bookstore_sessions_active").set(sessions as f64);
    metrics::gauge!("bookstore_uptime_seconds").set(state.started_at.elapsed().as_secs() as f64);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Must be installed before any metric is recorded
    let prometheus_handle = PrometheusBuilder::new().install_recorder()?;
    PROMETHEUS_HANDLE.set(prometheus_handle).ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookstore=debug,bookstore_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Loaded configuration: host={}, port={}, reviewer_policy={:?}",
        config.host, config.port, config.review.reviewer_policy
    );

    let books = load_seed(config.catalog.seed_path.as_deref())?;
    let catalog = InMemoryCatalog::from_books(books)?;

    let session_config = SessionConfig {
        reviewer_policy: config.review.reviewer_policy,
        session_ttl: config.session_ttl,
    };
    let app_state = AppState::from_catalog(Arc::new(catalog), session_config)
        .with_rating_range(config.review.rating_range());
    let (books, _, _) = app_state.get_stats().await;
    info!("Catalog ready with {} books", books);

    // Periodic cleanup for expired sessions
    let cleanup_state = app_state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            cleanup_state.session_manager.cleanup_expired();
        }
    });

    // Periodic update of gauge metrics (every 5 seconds)
    let metrics_state = app_state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(5));
        loop {
            interval.tick().await;
            update_gauge_metrics(&metrics_state).await;
        }
    });

    let app = build_router(app_state).route("/metrics/prometheus", get(prometheus_metrics));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Bookstore server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
