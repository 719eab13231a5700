//! ccos-cg library interface
//!
//! Content generation service: four-stage generative pipeline, rule-based
//! compliance audit, publication gate and WordPress publishing, served over
//! a JSON HTTP API.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use ccos_common::config::TomlConfig;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::{GeminiClient, GenerativeService, WordPressPublisher};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Bootstrap configuration (Gemini model, WordPress fallback credentials)
    pub config: Arc<TomlConfig>,
    /// WordPress REST client
    pub publisher: Arc<WordPressPublisher>,
    /// Fixed generative service; when None a Gemini client is built per
    /// request from the resolved API key
    pub generative_service: Option<Arc<dyn GenerativeService>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: TomlConfig, publisher: WordPressPublisher) -> Self {
        Self {
            db,
            config: Arc::new(config),
            publisher: Arc::new(publisher),
            generative_service: None,
            startup_time: Utc::now(),
        }
    }

    /// Use `service` for every generative call instead of Gemini
    pub fn with_generative_service(mut self, service: Arc<dyn GenerativeService>) -> Self {
        self.generative_service = Some(service);
        self
    }

    /// Generative service for one request
    ///
    /// The API key is resolved on every call so a key stored through the
    /// settings endpoint takes effect without a restart.
    pub async fn generative_service(&self) -> ApiResult<Arc<dyn GenerativeService>> {
        if let Some(service) = &self.generative_service {
            return Ok(Arc::clone(service));
        }

        let api_key = config::resolve_gemini_api_key(&self.db, &self.config).await?;
        let client = GeminiClient::new(
            api_key,
            self.config.gemini.model.clone(),
            Duration::from_secs(self.config.gemini.timeout_secs),
        )
        .map_err(|e| ApiError::Config(format!("Gemini client setup failed: {}", e)))?;

        Ok(Arc::new(client))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::generate_routes())
        .merge(api::post_routes())
        .merge(api::product_routes())
        .merge(api::keyword_routes())
        .merge(api::settings_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
