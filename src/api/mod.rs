use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::SearchService;
use crate::state::SharedState;

mod error;
pub mod search;
pub mod system;
pub mod validation;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn search_service(&self) -> &Arc<SearchService> {
        &self.shared.search_service
    }
}

pub fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config)?);

    Ok(Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    // Every response carries permissive CORS; callers are browser UIs on
    // arbitrary origins holding their own upstream token.
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route(
            "/search",
            get(search::search_posts)
                .options(search::preflight)
                .fallback(search::method_not_allowed),
        )
        .route("/system/status", get(system::get_status))
        .with_state(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}
