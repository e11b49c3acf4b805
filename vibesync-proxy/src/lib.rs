//! vibesync-proxy library
//!
//! Stateless HTTP proxies in front of the vision model, the weather
//! provider and the music catalog. Credentials are resolved once into
//! `ProxyConfig` and carried to handlers in `AppState`.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod api;
pub mod config;
pub mod error;
pub mod services;

pub use config::ProxyConfig;
pub use error::{ApiResult, ProxyError};

use services::{GeminiClient, ItunesClient, OpenWeatherClient};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// `None` when no vision credential is configured
    pub gemini: Option<Arc<GeminiClient>>,
    /// `None` when no weather credential is configured
    pub weather: Option<Arc<OpenWeatherClient>>,
    pub catalog: Arc<ItunesClient>,
}

impl AppState {
    /// Create application state from resolved configuration
    pub fn new(config: &ProxyConfig) -> anyhow::Result<Self> {
        let upstream = &config.upstream;

        let gemini = match &config.gemini_api_key {
            Some(key) => Some(Arc::new(GeminiClient::new(
                &upstream.gemini_base_url,
                &upstream.gemini_model,
                key.clone(),
            )?)),
            None => {
                warn!("GEMINI_API_KEY missing: /api/analyze will answer 500");
                None
            }
        };

        let weather = match &config.openweather_api_key {
            Some(key) => Some(Arc::new(OpenWeatherClient::new(
                &upstream.openweather_base_url,
                key.clone(),
            )?)),
            None => {
                warn!("OPENWEATHER_API_KEY missing: /api/weather will answer 500");
                None
            }
        };

        let catalog = Arc::new(ItunesClient::new(&upstream.itunes_base_url)?);

        Ok(Self {
            gemini,
            weather,
            catalog,
        })
    }
}

/// Build application router
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/analyze", post(api::analyze_image))
        .route("/api/weather", get(api::current_weather))
        .route("/api/music/search", get(api::search_music))
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
