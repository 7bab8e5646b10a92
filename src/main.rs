// Main entry point - Dependency injection and server setup
use std::sync::Arc;

use anyhow::Context;
use homepage::application::favicon_service::FaviconResolver;
use homepage::application::state_repository::StateRepository;
use homepage::domain::dashboard::DashboardState;
use homepage::infrastructure::config::{Backend, load_app_config};
use homepage::infrastructure::http_probe::HttpFaviconProbe;
use homepage::infrastructure::local_store::LocalStore;
use homepage::infrastructure::remote_store::RemoteStore;
use homepage::presentation::app_state::AppState;
use homepage::presentation::router::{build_router, shutdown_on};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = load_app_config()?;

    if !config.assets.static_dir.is_dir() {
        anyhow::bail!(
            "Static directory not found: {} (it must contain index.html and the page assets)",
            config.assets.static_dir.display()
        );
    }

    // Local store always holds the favicon cache; the document lives wherever the backend says
    let local = Arc::new(LocalStore::new(&config.storage.data_dir));
    let repository: Arc<dyn StateRepository<DashboardState>> = match config.storage.backend {
        Backend::Local => local.clone(),
        Backend::Remote => Arc::new(RemoteStore::new(config.storage.remote_endpoint()?)),
    };

    let favicons = FaviconResolver::new(Arc::new(HttpFaviconProbe::new()))
        .with_repository(local.clone())
        .with_window(config.favicon.ttl_ms);
    favicons.warm().await;

    let state = Arc::new(AppState {
        repository,
        favicons,
        wallpaper_path: config.assets.wallpaper_path.clone(),
    });

    let router = build_router(state, &config.assets.static_dir);

    tracing::info!("Serving homepage assets from {}", config.assets.static_dir.display());
    tracing::info!("Serving wallpaper from {}", config.assets.wallpaper_path.display());
    tracing::info!("State directory: {}", config.storage.data_dir.display());

    let (host, port) = (config.server.host.as_str(), config.server.port);
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await?;

    Ok(())
}
