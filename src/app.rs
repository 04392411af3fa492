use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::assets::StaticAssets;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::headers::SecurityHeaders;
use crate::jwt::JwtConfig;
use crate::router;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: Arc<JwtConfig>,
    pub headers: Arc<SecurityHeaders>,
    pub assets: Option<StaticAssets>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig) -> Result<Self, AppError> {
        Ok(Self {
            pool,
            jwt: Arc::new(config.jwt),
            headers: Arc::new(SecurityHeaders::new(config.cors)?),
            assets: config.assets_dir.map(StaticAssets::new),
        })
    }
}

pub async fn create_app(pool: SqlitePool) -> Result<Router, AppError> {
    let config = AppConfig::from_env()?;
    create_app_with_config(pool, config).await
}

/// Every request, whatever its method or path, goes through the dispatcher.
pub async fn create_app_with_config(pool: SqlitePool, config: AppConfig) -> Result<Router, AppError> {
    let state = AppState::new(pool, config)?;

    let router = Router::new()
        .fallback(router::dispatch)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
