// Application state for HTTP handlers
use crate::application::favicon_service::FaviconResolver;
use crate::application::state_repository::StateRepository;
use crate::domain::dashboard::DashboardState;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn StateRepository<DashboardState>>,
    pub favicons: FaviconResolver,
    pub wallpaper_path: PathBuf,
}
