// HTTP routes of the persistence service
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_favicon, get_state, get_wallpaper, health_check, post_state,
};
use axum::{Router, routing::get};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// API routes, the wallpaper, and static assets from `static_dir` for everything else.
pub fn build_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/state", get(get_state).post(post_state))
        .route("/api/favicon", get(get_favicon))
        .route("/wp.png", get(get_wallpaper))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves once `signal` fires. If the signal cannot be installed the server
/// keeps running instead of shutting down straight away.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("Shutting down server"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for the shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
