//! albumcat-cms library - catalog host and Local CMS API
//!
//! Serves the public directory and the uploaded covers. In development mode
//! it also mounts the Local CMS API that edits the catalog file; production
//! mode has no write path at all.

use std::sync::Arc;

use albumcat_common::asset::COVERS_URL_PREFIX;
use albumcat_common::config::ServerConfig;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod api;
pub mod error;
pub mod store;

pub use crate::error::{ApiError, ApiResult};
use crate::store::{AssetStore, CatalogStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved server configuration
    pub config: Arc<ServerConfig>,
    /// Catalog Store (album JSON file)
    pub catalog: CatalogStore,
    /// Asset Store (covers directory)
    pub assets: AssetStore,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Open both stores, creating their directories. Runs once at startup.
    pub async fn init(config: ServerConfig) -> albumcat_common::Result<Self> {
        let catalog = CatalogStore::init(config.catalog_path.clone()).await?;
        let assets = AssetStore::init(config.covers_dir.clone())?;

        Ok(Self {
            config: Arc::new(config),
            catalog,
            assets,
            startup_time: Utc::now(),
        })
    }
}

/// Build application router
///
/// Unmatched requests (and unmatched methods on CMS paths) go to the static
/// file service over the public directory.
pub fn build_router(state: AppState) -> Router {
    let host = ServeDir::new(&state.config.public_dir);

    let mut router = Router::new().merge(api::health_routes());

    if state.config.mode.is_dev() {
        router = router.merge(api::cms_routes(host.clone()));
    } else {
        info!("Production mode: Local CMS API not mounted, catalog is read-only");
    }

    router
        .nest_service(COVERS_URL_PREFIX, ServeDir::new(state.assets.dir()))
        .fallback_service(host)
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
